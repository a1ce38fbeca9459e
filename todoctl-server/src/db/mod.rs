//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - One explicitly constructed pool, passed by reference - no global state
//! - Parameterized queries only
//! - Every repository call is bounded by a fixed ceiling
//! - No retries - backend failures surface to the caller

pub mod pool;
pub mod repos;

pub use pool::{
    HealthProbe, PoolError, PoolSettings, StorePool, CONNECT_TIMEOUT, DEFAULT_MAX_CONNECTIONS,
};
pub use repos::*;
