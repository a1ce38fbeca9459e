//! Request-side domain models
//!
//! Input is checked at the HTTP boundary; anything that fails here
//! returns ValidationError and never reaches the database.

pub mod todo;
pub mod validation;

pub use todo::{TodoDraft, TodoId};
pub use validation::ValidationError;
