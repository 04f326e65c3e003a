//! Domain model for virtual machine candidates.
//!
//! A candidate is an opaque handle to a machine in the inventory. Only the
//! identifier and the name travel with it; every other property is fetched
//! through the inventory when a filter stage needs it.

use serde::{Deserialize, Serialize};

/// A virtual machine under consideration during selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct VmCandidate {
    /// Managed object identifier (e.g., "vm-42").
    pub id: String,
    /// Inventory name. Unique within a datacenter but not globally.
    pub name: String,
}

impl VmCandidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
