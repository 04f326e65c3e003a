use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The main error type for vSphere virtual machine discovery.
///
/// Every failure aborts the selection; there is no partial success. The
/// `Display` output of each variant is shown to users verbatim, so the
/// wording is kept stable.
#[derive(Error, Debug)]
pub enum VsphereError {
    /// An inventory lookup found nothing: the glob matched no virtual machine,
    /// or a named host or datacenter does not exist.
    #[error("{0}")]
    Lookup(String),

    /// A remote property, tag or category fetch failed in the middle of a
    /// filter stage.
    ///
    /// # Fields
    /// * `stage` - The stage that was running
    /// * `message` - What the stage was fetching
    /// * `source` - The underlying failure
    #[error("{stage}: {message}: {source}")]
    PropertyFetch {
        stage: FilterStage,
        message: &'static str,
        source: Box<VsphereError>,
    },

    /// No candidate survived the configured filters.
    #[error("no virtual machine matches the configured filters")]
    NoMatch,

    /// Several candidates survived and `latest` was not requested.
    #[error("more than one virtual machine matched the filters")]
    AmbiguousMatch,

    /// The datasource configuration is invalid. All problems found in one
    /// validation pass are reported together.
    #[error("{0}")]
    Configuration(ConfigErrors),

    /// Represents errors that occur while talking to vCenter
    #[error("Connection error: {0}")]
    Connection(String),

    /// The session token was rejected
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The requested API resource does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Any other non-success API status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered with a body that could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// The whole selection exceeded its deadline
    #[error("virtual machine selection timed out after {0:?}")]
    Timeout(Duration),
}

impl VsphereError {
    /// Wraps a failure raised by the inventory while `stage` was running.
    ///
    /// Lookup failures are user-facing and pass through untouched; everything
    /// else is annotated with the stage and the property being fetched.
    pub(crate) fn in_stage(self, stage: FilterStage, message: &'static str) -> Self {
        match self {
            lookup @ VsphereError::Lookup(_) => lookup,
            other => VsphereError::PropertyFetch {
                stage,
                message,
                source: Box::new(other),
            },
        }
    }

    /// Returns true for failures that come from the inventory lookup itself.
    pub fn is_lookup(&self) -> bool {
        matches!(self, VsphereError::Lookup(_))
    }
}

impl From<ValidationError> for VsphereError {
    fn from(error: ValidationError) -> Self {
        VsphereError::Configuration(ConfigErrors(vec![error]))
    }
}

impl From<ConfigErrors> for VsphereError {
    fn from(errors: ConfigErrors) -> Self {
        VsphereError::Configuration(errors)
    }
}

/// Identifies the pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    NameGlob,
    Template,
    Host,
    Tags,
    Latest,
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FilterStage::NameGlob => "failed to retrieve virtual machines list",
            FilterStage::Template => "failed to filter by template attribute",
            FilterStage::Host => "failed to filter by host attribute",
            FilterStage::Tags => "failed to filter by tags",
            FilterStage::Latest => "failed to find the latest virtual machine",
        };
        f.write_str(text)
    }
}

/// Specialized error type for configuration validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A mandatory setting was left empty
    #[error("'{0}' is required")]
    Required(String),

    /// A `tag` block is missing its name or its category
    ///
    /// # Fields
    /// * `index` - Position of the block in the configuration
    #[error("both name and category are required for tag")]
    IncompleteTag { index: usize },

    /// `name_regex` does not compile
    #[error("invalid name_regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// `name` is not a valid glob
    #[error("invalid name pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    #[error("Format error: {0}")]
    Format(String),
}

/// A non-empty collection of validation errors gathered in a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErrors(pub Vec<ValidationError>);

impl ConfigErrors {
    /// Returns the individual validation errors.
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Turns a list of collected errors into a result.
    pub(crate) fn into_result(errors: Vec<ValidationError>) -> Result<(), ConfigErrors> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigErrors(errors))
        }
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [single] = self.0.as_slice() {
            return write!(f, "{}", single);
        }
        write!(f, "{} errors occurred:", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n* {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

/// Type alias for Results that may fail with a VsphereError
pub type VsphereResult<T> = Result<T, VsphereError>;
