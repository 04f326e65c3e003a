//! Domain models for vSphere tags.
//!
//! Tag identity for filtering is the pair of tag name and category name.
//! Categories can be renamed independently of their tags, so an attached tag
//! only carries its category ID, which has to be resolved before comparing.

use serde::{Deserialize, Serialize};

/// A tag the selected machine must carry, as written in the `tag` blocks.
///
/// ```hcl
/// tag {
///   category = "team"
///   name     = "operations"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct Tag {
    /// Name of the tag attached to the virtual machine.
    pub name: String,
    /// Name of the category that contains the tag.
    pub category: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }

    /// Both the name and the category must be set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.category.is_empty()
    }
}

/// A tag attached to a virtual machine as reported by the tagging service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttachedTag {
    /// Tag identifier (e.g., "urn:vmomi:InventoryServiceTag:...").
    pub id: String,
    /// Tag name.
    pub name: String,
    /// Identifier of the category the tag belongs to.
    pub category_id: String,
}
