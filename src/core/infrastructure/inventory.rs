//! The inventory accessor consumed by the selection pipeline.

use crate::core::domain::{
    error::VsphereResult,
    model::{tag::AttachedTag, vm_candidate::VmCandidate},
    value_object::NamePattern,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read-only access to a vSphere inventory.
///
/// Implementations hold whatever session or connection state they need; the
/// selector never sees it. Every method is a single remote lookup and must
/// not retry on failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Returns every virtual machine whose name matches `pattern`.
    ///
    /// # Errors
    ///
    /// Fails with `VsphereError::Lookup` when nothing matches, so a successful
    /// call never returns an empty list.
    async fn list_by_glob(&self, pattern: &NamePattern) -> VsphereResult<Vec<VmCandidate>>;

    /// Whether the machine is marked as a template.
    async fn is_template(&self, vm: &VmCandidate) -> VsphereResult<bool>;

    /// Creation time of the machine, if vCenter recorded one.
    async fn creation_time(&self, vm: &VmCandidate) -> VsphereResult<Option<DateTime<Utc>>>;

    /// Tags attached to the machine.
    async fn attached_tags(&self, vm: &VmCandidate) -> VsphereResult<Vec<AttachedTag>>;

    /// Resolves a tag category identifier to its current name.
    async fn resolve_category_name(&self, category_id: &str) -> VsphereResult<String>;

    /// Machines placed on the ESX host called `host`.
    ///
    /// # Errors
    ///
    /// Fails with `VsphereError::Lookup` when the host does not exist.
    async fn host_members(&self, host: &str) -> VsphereResult<Vec<VmCandidate>>;
}
