//! To-do identifiers and drafts

use std::fmt;

use serde::Deserialize;

use super::ValidationError;

/// Store-assigned to-do identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId(i64);

impl TodoId {
    /// Parse a path segment as a 64-bit id.
    ///
    /// # Example
    /// ```
    /// use todoctl_server::models::TodoId;
    ///
    /// assert_eq!(TodoId::parse("42").unwrap().get(), 42);
    /// assert!(TodoId::parse("abc").is_err());
    /// assert!(TodoId::parse("").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidId { raw: s.to_owned() })
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for TodoId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied payload for create and update.
///
/// Store-assigned fields (`id`, timestamps) are ignored if present.
/// `title` must be present but may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TodoDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: bool,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: bool) -> Self {
        self.status = status;
        self
    }
}
