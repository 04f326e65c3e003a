use crate::core::domain::error::ValidationError;
use std::fmt;

/// A vCenter API session identifier, sent as `vmware-api-session-id`.
///
/// Creating and destroying sessions is the job of the session driver; this
/// crate only carries the token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Validates and wraps a session identifier.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        validate_session_token(&token)?;
        Ok(Self(token))
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Validates a session identifier.
pub(crate) fn validate_session_token(token: &str) -> Result<(), ValidationError> {
    if token.trim().is_empty() {
        return Err(ValidationError::Field {
            field: "session_id".to_string(),
            message: "Session identifier cannot be empty".to_string(),
        });
    }
    if !token.chars().all(|c| c.is_ascii_graphic()) {
        return Err(ValidationError::Format(
            "Session identifier contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
