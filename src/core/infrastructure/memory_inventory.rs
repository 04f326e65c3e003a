//! An in-memory inventory for tests and offline demos.

use crate::core::{
    domain::{
        error::{VsphereError, VsphereResult},
        model::{
            tag::{AttachedTag, Tag},
            vm_candidate::VmCandidate,
        },
        value_object::NamePattern,
    },
    infrastructure::inventory::Inventory,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Description of a virtual machine placed in an [`InMemoryInventory`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatedVm {
    pub name: String,
    pub template: bool,
    pub creation_time: Option<DateTime<Utc>>,
    pub tags: Vec<Tag>,
    pub host: Option<String>,
}

impl SimulatedVm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn template(mut self, template: bool) -> Self {
        self.template = template;
        self
    }

    pub fn created_at(mut self, time: DateTime<Utc>) -> Self {
        self.creation_time = Some(time);
        self
    }

    pub fn tag(mut self, name: impl Into<String>, category: impl Into<String>) -> Self {
        self.tags.push(Tag::new(name, category));
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
}

#[derive(Debug, Clone)]
struct StoredVm {
    candidate: VmCandidate,
    template: bool,
    creation_time: Option<DateTime<Utc>>,
    tags: Vec<AttachedTag>,
    host: Option<String>,
}

/// A deterministic [`Inventory`] that never touches the network.
///
/// Machines get identifiers `vm-1`, `vm-2`, ... in insertion order and are
/// listed in that order. Tags and categories are created on first use, the
/// same way the tagging service would find or create them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    vms: Vec<StoredVm>,
    categories: BTreeMap<String, String>,
    tag_ids: BTreeMap<(String, String), String>,
    hosts: BTreeSet<String>,
}

impl InMemoryInventory {
    pub fn new(vms: impl IntoIterator<Item = SimulatedVm>) -> Self {
        let mut inventory = Self::default();
        for vm in vms {
            inventory.add_vm(vm);
        }
        inventory
    }

    /// Registers an ESX host, even one without machines.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.hosts.insert(host.into());
        self
    }

    /// Adds a machine and returns its handle.
    pub fn add_vm(&mut self, vm: SimulatedVm) -> VmCandidate {
        let candidate = VmCandidate::new(format!("vm-{}", self.vms.len() + 1), vm.name);
        let tags = vm
            .tags
            .iter()
            .map(|tag| self.find_or_create_tag(tag))
            .collect();
        if let Some(host) = &vm.host {
            self.hosts.insert(host.clone());
        }
        self.vms.push(StoredVm {
            candidate: candidate.clone(),
            template: vm.template,
            creation_time: vm.creation_time,
            tags,
            host: vm.host,
        });
        candidate
    }

    /// Renames a tag category in place. Tags keep pointing at the category.
    pub fn rename_category(&mut self, from: &str, to: impl Into<String>) {
        let to = to.into();
        for name in self.categories.values_mut() {
            if name == from {
                *name = to.clone();
            }
        }
    }

    fn find_or_create_category(&mut self, name: &str) -> String {
        if let Some((id, _)) = self.categories.iter().find(|(_, n)| *n == name) {
            return id.clone();
        }
        let id = format!(
            "urn:vmomi:InventoryServiceCategory:{}:GLOBAL",
            self.categories.len() + 1
        );
        self.categories.insert(id.clone(), name.to_string());
        id
    }

    fn find_or_create_tag(&mut self, tag: &Tag) -> AttachedTag {
        let category_id = self.find_or_create_category(&tag.category);
        let key = (tag.name.clone(), category_id.clone());
        let next = self.tag_ids.len() + 1;
        let id = self
            .tag_ids
            .entry(key)
            .or_insert_with(|| format!("urn:vmomi:InventoryServiceTag:{}:GLOBAL", next))
            .clone();
        AttachedTag {
            id,
            name: tag.name.clone(),
            category_id,
        }
    }

    fn stored(&self, vm: &VmCandidate) -> VsphereResult<&StoredVm> {
        self.vms
            .iter()
            .find(|stored| stored.candidate.id == vm.id)
            .ok_or_else(|| VsphereError::NotFound(format!("virtual machine '{}'", vm.id)))
    }
}

#[async_trait]
impl Inventory for InMemoryInventory {
    async fn list_by_glob(&self, pattern: &NamePattern) -> VsphereResult<Vec<VmCandidate>> {
        let matched: Vec<VmCandidate> = self
            .vms
            .iter()
            .filter(|vm| pattern.matches(&vm.candidate.name))
            .map(|vm| vm.candidate.clone())
            .collect();
        if matched.is_empty() {
            return Err(VsphereError::Lookup(format!(
                "vm '{}' not found",
                pattern.as_str()
            )));
        }
        Ok(matched)
    }

    async fn is_template(&self, vm: &VmCandidate) -> VsphereResult<bool> {
        Ok(self.stored(vm)?.template)
    }

    async fn creation_time(&self, vm: &VmCandidate) -> VsphereResult<Option<DateTime<Utc>>> {
        Ok(self.stored(vm)?.creation_time)
    }

    async fn attached_tags(&self, vm: &VmCandidate) -> VsphereResult<Vec<AttachedTag>> {
        Ok(self.stored(vm)?.tags.clone())
    }

    async fn resolve_category_name(&self, category_id: &str) -> VsphereResult<String> {
        self.categories
            .get(category_id)
            .cloned()
            .ok_or_else(|| VsphereError::NotFound(format!("category '{}'", category_id)))
    }

    async fn host_members(&self, host: &str) -> VsphereResult<Vec<VmCandidate>> {
        if !self.hosts.contains(host) {
            return Err(VsphereError::Lookup(format!("host '{}' not found", host)));
        }
        Ok(self
            .vms
            .iter()
            .filter(|vm| vm.host.as_deref() == Some(host))
            .map(|vm| vm.candidate.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tags_and_categories_are_shared() {
        let mut inventory = InMemoryInventory::default();
        let a = inventory.add_vm(SimulatedVm::new("a").tag("ops", "team"));
        let b = inventory.add_vm(SimulatedVm::new("b").tag("ops", "team").tag("gold", "sla"));

        let a_tags = inventory.attached_tags(&a).await.unwrap();
        let b_tags = inventory.attached_tags(&b).await.unwrap();
        assert_eq!(a_tags[0], b_tags[0]);
        assert_ne!(b_tags[0].category_id, b_tags[1].category_id);
        assert_eq!(
            inventory
                .resolve_category_name(&b_tags[1].category_id)
                .await
                .unwrap(),
            "sla"
        );
    }

    #[tokio::test]
    async fn test_rename_category() {
        let mut inventory = InMemoryInventory::default();
        let vm = inventory.add_vm(SimulatedVm::new("a").tag("ops", "team"));
        inventory.rename_category("team", "squad");

        let tags = inventory.attached_tags(&vm).await.unwrap();
        assert_eq!(
            inventory
                .resolve_category_name(&tags[0].category_id)
                .await
                .unwrap(),
            "squad"
        );
    }

    #[tokio::test]
    async fn test_glob_lookup_failure() {
        let inventory = InMemoryInventory::new([SimulatedVm::new("web-1")]);
        let err = inventory
            .list_by_glob(&NamePattern::new("db-*").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "vm 'db-*' not found");
    }

    #[tokio::test]
    async fn test_host_members() {
        let inventory = InMemoryInventory::new([
            SimulatedVm::new("a").host("esx-01"),
            SimulatedVm::new("b").host("esx-02"),
        ])
        .with_host("esx-03");

        let members = inventory.host_members("esx-01").await.unwrap();
        assert_eq!(members, vec![VmCandidate::new("vm-1", "a")]);
        assert!(inventory.host_members("esx-03").await.unwrap().is_empty());
        assert!(inventory.host_members("esx-09").await.unwrap_err().is_lookup());
    }
}
