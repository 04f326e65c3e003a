//! Typed filter configuration consumed by the selector.

use crate::core::domain::{
    error::{ConfigErrors, ValidationError, VsphereResult},
    model::tag::Tag,
    value_object::{NamePattern, NameRegex},
};

/// An immutable, validated set of optional predicates.
///
/// Every field except the name pattern is optional; a stage whose field is
/// left at its default is skipped entirely.
///
/// # Examples
///
/// ```
/// use leeca_vsphere::{FilterConfig, Tag};
///
/// let filters = FilterConfig::builder()
///     .name("web-*")
///     .name_regex("^web-[0-9]+$")
///     .tag(Tag::new("ops", "team"))
///     .latest(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(filters.name_pattern().as_str(), "web-*");
/// assert!(filters.prefer_latest());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    name_pattern: NamePattern,
    name_regex: Option<NameRegex>,
    template_only: bool,
    host: Option<String>,
    required_tags: Vec<Tag>,
    prefer_latest: bool,
}

impl FilterConfig {
    /// Creates a new builder for FilterConfig
    pub fn builder() -> FilterConfigBuilder {
        FilterConfigBuilder::default()
    }

    pub fn name_pattern(&self) -> &NamePattern {
        &self.name_pattern
    }

    pub fn name_regex(&self) -> Option<&NameRegex> {
        self.name_regex.as_ref()
    }

    pub fn template_only(&self) -> bool {
        self.template_only
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn required_tags(&self) -> &[Tag] {
        &self.required_tags
    }

    pub fn prefer_latest(&self) -> bool {
        self.prefer_latest
    }
}

/// Builder for FilterConfig.
///
/// Setters never fail; [`FilterConfigBuilder::build`] validates everything in
/// one pass and reports all problems together.
#[derive(Debug, Default, Clone)]
pub struct FilterConfigBuilder {
    name: Option<String>,
    name_regex: Option<String>,
    template: bool,
    host: Option<String>,
    tags: Vec<Tag>,
    latest: bool,
}

impl FilterConfigBuilder {
    /// Glob matched against machine names. Defaults to `*`.
    pub fn name(mut self, pattern: impl Into<String>) -> Self {
        self.name = Some(pattern.into());
        self
    }

    /// Regular expression with substring semantics. Empty means unset.
    pub fn name_regex(mut self, expression: impl Into<String>) -> Self {
        self.name_regex = Some(expression.into());
        self
    }

    /// Keep only templates.
    pub fn template(mut self, template: bool) -> Self {
        self.template = template;
        self
    }

    /// Keep only machines placed on this ESX host. Empty means unset.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Adds a required tag. All added tags must be attached.
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Pick the most recently created machine when several match.
    pub fn latest(mut self, latest: bool) -> Self {
        self.latest = latest;
        self
    }

    /// Validates the settings and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `VsphereError::Configuration` listing every invalid setting:
    /// an unparsable glob, a regular expression that does not compile, or a
    /// tag missing its name or category.
    pub fn build(self) -> VsphereResult<FilterConfig> {
        let mut errors = Vec::new();
        let filters = self.build_collecting(&mut errors);
        ConfigErrors::into_result(errors)?;
        Ok(filters)
    }

    /// Builds as much as possible, appending every problem to `errors`.
    pub(crate) fn build_collecting(self, errors: &mut Vec<ValidationError>) -> FilterConfig {
        let name_pattern = match NamePattern::new(self.name.unwrap_or_default()) {
            Ok(pattern) => pattern,
            Err(e) => {
                errors.push(e);
                NamePattern::default()
            }
        };

        let name_regex = match self.name_regex.filter(|r| !r.is_empty()) {
            Some(expression) => NameRegex::new(&expression)
                .map_err(|e| errors.push(e))
                .ok(),
            None => None,
        };

        for (index, tag) in self.tags.iter().enumerate() {
            if !tag.is_complete() {
                errors.push(ValidationError::IncompleteTag { index });
            }
        }

        FilterConfig {
            name_pattern,
            name_regex,
            template_only: self.template,
            host: self.host.filter(|h| !h.is_empty()),
            required_tags: self.tags,
            prefer_latest: self.latest,
        }
    }
}
