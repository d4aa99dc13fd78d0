//! Error types for the desk.

use crate::types::RequestKind;
use std::fmt;
use thiserror::Error;

/// A message attached to one form field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending field (`title`, `end_date`, ...)
    pub field: &'static str,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    /// Creates a field error
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A form submission was rejected
///
/// Carries every field that failed, not only the first one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub struct ValidationError {
    /// Field-level messages, in form order
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Collects field errors; `Ok(())` if there are none
    ///
    /// # Errors
    ///
    /// Returns the collected errors when `errors` is not empty.
    pub fn check(errors: Vec<FieldError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self { errors })
        }
    }

    /// Message for `field`, if that field failed
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// Whether `field` failed
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.message_for(field).is_some()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed")?;
        for (i, error) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{error}")?;
        }
        Ok(())
    }
}

/// Login failures
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email/password pair is not a known demo account
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The operation needs a signed-in user
    #[error("you must be logged in")]
    NotLoggedIn,
}

/// Errors surfaced by the desk facade and the lifecycle reducer
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeskError {
    /// Form input was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No entity with that id
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of entity looked up
        kind: RequestKind,
        /// Requested id
        id: String,
    },

    /// The requester lacks the capability for this operation
    #[error("operation requires review rights")]
    Forbidden,

    /// The configured transition policy does not allow this move
    #[error("cannot move from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Login failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The reducer did not settle
    #[error("store error: {0}")]
    Store(#[from] deskflow_core::store::StoreError),
}

impl DeskError {
    /// Shorthand for [`DeskError::NotFound`]
    #[must_use]
    pub fn not_found(kind: RequestKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// The validation error, if this is one
    #[must_use]
    pub const fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            _ => None,
        }
    }
}

/// Errors while loading seed data
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read
    #[error("failed to read seed file {path}: {source}")]
    Io {
        /// Path of the seed file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The seed file is not valid seed JSON
    #[error("failed to parse seed file {path}: {source}")]
    Json {
        /// Path of the seed file
        path: String,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The seed references a user that does not exist
    #[error("{kind} {id} is owned by unknown user {user_id}")]
    UnknownOwner {
        /// Kind of the orphaned request
        kind: RequestKind,
        /// Id of the orphaned request
        id: String,
        /// Missing user
        user_id: String,
    },
}

/// Invalid configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds an unrecognized value
    #[error("invalid value {value:?} for {key}, expected one of: {expected}")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// Value found
        value: String,
        /// Accepted values
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_field() {
        let error = ValidationError {
            errors: vec![
                FieldError::new("title", "Title is required"),
                FieldError::new("description", "Description must be at least 10 characters"),
            ],
        };
        assert_eq!(
            error.to_string(),
            "validation failed: title: Title is required; description: Description must be at least 10 characters"
        );
        assert!(error.has_field("description"));
        assert!(!error.has_field("priority"));
    }

    #[test]
    fn check_passes_without_errors() {
        assert!(ValidationError::check(Vec::new()).is_ok());
        assert!(ValidationError::check(vec![FieldError::new("reason", "x")]).is_err());
    }

    #[test]
    fn not_found_names_the_kind() {
        let error = DeskError::not_found(RequestKind::LeaveRequest, "L-00000001");
        assert_eq!(error.to_string(), "leave request L-00000001 not found");
    }
}
