use crate::core::domain::error::ValidationError;
use regex::Regex;

/// A compiled name filter with substring semantics.
///
/// The expression is unanchored: `web` matches `my-web-1`. Use `^` and `$`
/// to match the whole name, e.g. `^[^_]+$` keeps names without underscores.
#[derive(Debug, Clone)]
pub struct NameRegex(Regex);

impl NameRegex {
    /// Compiles the expression, failing with a configuration error.
    pub fn new(expression: &str) -> Result<Self, ValidationError> {
        validate_name_regex(expression).map(Self)
    }

    /// Returns the original expression.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns true when the expression matches anywhere in `name`.
    #[must_use]
    pub fn is_match(&self, name: &str) -> bool {
        self.0.is_match(name)
    }
}

impl PartialEq for NameRegex {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for NameRegex {}

/// Validates a regular expression and returns it compiled.
pub(crate) fn validate_name_regex(expression: &str) -> Result<Regex, ValidationError> {
    Regex::new(expression).map_err(|e| ValidationError::InvalidRegex {
        pattern: expression.to_string(),
        message: e.to_string(),
    })
}
