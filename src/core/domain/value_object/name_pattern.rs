use crate::core::domain::error::ValidationError;
use globset::{GlobBuilder, GlobMatcher};

/// Glob used when no name pattern is configured.
pub const DEFAULT_NAME_PATTERN: &str = "*";

/// A validated shell-style glob matched against virtual machine names.
///
/// This is the first level of filtering: the inventory returns every machine
/// whose name matches the glob and fails when none does.
///
/// The syntax follows the inventory finder of vCenter clients: `*` and `?`
/// never cross a `/`, character classes are negated with either `[!...]` or
/// `[^...]`, and a backslash escapes the next character (`web\*` matches the
/// literal name `web*`).
#[derive(Debug, Clone)]
pub struct NamePattern {
    raw: String,
    matcher: GlobMatcher,
}

impl NamePattern {
    /// Compiles `pattern`, substituting `*` when it is empty.
    pub fn new(pattern: impl Into<String>) -> Result<Self, ValidationError> {
        let mut raw = pattern.into();
        if raw.is_empty() {
            raw = DEFAULT_NAME_PATTERN.to_string();
        }
        let matcher = validate_name_pattern(&raw)?;
        Ok(Self { raw, matcher })
    }

    /// Returns the glob as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true when `name` matches the glob.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.matcher.is_match(name)
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for NamePattern {}

impl Default for NamePattern {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_PATTERN).expect("'*' is a valid glob")
    }
}

/// Validates a glob and returns it compiled.
pub(crate) fn validate_name_pattern(pattern: &str) -> Result<GlobMatcher, ValidationError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| ValidationError::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.kind().to_string(),
        })
}
