//! Inventory backed by the vCenter REST and VI/JSON APIs.

use crate::core::{
    domain::{
        error::{VsphereError, VsphereResult},
        model::{tag::AttachedTag, vm_candidate::VmCandidate},
        value_object::NamePattern,
    },
    infrastructure::{
        api_client::ApiClient,
        inventory::Inventory,
        response::vcenter_response::{
            CategoryModel, DatacenterSummary, DynamicId, HostSummary, ListAttachedTagsRequest,
            TagModel, VmConfigInfo, VmSummary,
        },
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

/// An [`Inventory`] that queries vCenter over HTTP.
///
/// The virtual machine list is scoped to the configured datacenter, or to
/// the only datacenter when none is configured. Nothing is cached: each
/// call performs its own requests.
///
/// `GET /api/vcenter/vm` is capped server side (4000 machines per call on
/// current vCenter releases) and does not page. A datacenter holding more
/// machines than the cap makes [`Inventory::list_by_glob`] fail with
/// `VsphereError::Api` instead of returning a partial list; scope the search
/// with a smaller `datacenter` in that case.
#[derive(Debug)]
pub struct RestInventory {
    client: ApiClient,
}

impl RestInventory {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Resolves the datacenter that scopes the VM list.
    async fn datacenter(&self) -> VsphereResult<DatacenterSummary> {
        match self.client.connection().datacenter() {
            Some(name) => {
                let found: Vec<DatacenterSummary> = self
                    .client
                    .get_with_query("/api/vcenter/datacenter", &[("names", name)])
                    .await?;
                found
                    .into_iter()
                    .next()
                    .ok_or_else(|| VsphereError::Lookup(format!("datacenter '{}' not found", name)))
            }
            None => {
                let mut all: Vec<DatacenterSummary> =
                    self.client.get("/api/vcenter/datacenter").await?;
                match all.len() {
                    0 => Err(VsphereError::Lookup("no datacenter found".to_string())),
                    1 => Ok(all.remove(0)),
                    _ => Err(VsphereError::Lookup(
                        "default datacenter resolves to multiple instances, please specify"
                            .to_string(),
                    )),
                }
            }
        }
    }

    async fn vm_config(&self, vm: &VmCandidate) -> VsphereResult<VmConfigInfo> {
        let path = format!(
            "/sdk/vim25/{}/VirtualMachine/{}/config",
            self.client.config().vim_release,
            vm.id
        );
        self.client.get(&path).await
    }
}

fn into_candidates(summaries: Vec<VmSummary>) -> Vec<VmCandidate> {
    summaries
        .into_iter()
        .map(|s| VmCandidate::new(s.vm, s.name))
        .collect()
}

#[async_trait]
impl Inventory for RestInventory {
    async fn list_by_glob(&self, pattern: &NamePattern) -> VsphereResult<Vec<VmCandidate>> {
        let datacenter = self.datacenter().await?;
        debug!(datacenter = %datacenter.name, pattern = pattern.as_str(), "listing virtual machines");

        let summaries: Vec<VmSummary> = self
            .client
            .get_with_query(
                "/api/vcenter/vm",
                &[("datacenters", datacenter.datacenter.as_str())],
            )
            .await?;

        let matched: Vec<VmCandidate> = into_candidates(summaries)
            .into_iter()
            .filter(|vm| pattern.matches(&vm.name))
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
        Ok(self.vm_config(vm).await?.template)
    }

    async fn creation_time(&self, vm: &VmCandidate) -> VsphereResult<Option<DateTime<Utc>>> {
        Ok(self.vm_config(vm).await?.create_date)
    }

    async fn attached_tags(&self, vm: &VmCandidate) -> VsphereResult<Vec<AttachedTag>> {
        let body = ListAttachedTagsRequest {
            object_id: DynamicId {
                id: &vm.id,
                kind: "VirtualMachine",
            },
        };
        let tag_ids: Vec<String> = self
            .client
            .post(
                "/api/cis/tagging/tag-association",
                &[("action", "list-attached-tags")],
                &body,
            )
            .await?;

        let mut tags = Vec::with_capacity(tag_ids.len());
        for tag_id in tag_ids {
            let tag: TagModel = self
                .client
                .get(&format!("/api/cis/tagging/tag/{}", tag_id))
                .await?;
            tags.push(AttachedTag {
                id: tag.id,
                name: tag.name,
                category_id: tag.category_id,
            });
        }
        Ok(tags)
    }

    async fn resolve_category_name(&self, category_id: &str) -> VsphereResult<String> {
        let category: CategoryModel = self
            .client
            .get(&format!("/api/cis/tagging/category/{}", category_id))
            .await?;
        Ok(category.name)
    }

    async fn host_members(&self, host: &str) -> VsphereResult<Vec<VmCandidate>> {
        let hosts: Vec<HostSummary> = self
            .client
            .get_with_query("/api/vcenter/host", &[("names", host)])
            .await?;
        let host_id = hosts
            .into_iter()
            .find(|h| h.name == host)
            .map(|h| h.host)
            .ok_or_else(|| VsphereError::Lookup(format!("host '{}' not found", host)))?;

        let summaries: Vec<VmSummary> = self
            .client
            .get_with_query("/api/vcenter/vm", &[("hosts", host_id.as_str())])
            .await?;
        Ok(into_candidates(summaries))
    }
}
