use crate::core::{
    domain::{
        error::{FilterStage, VsphereResult},
        model::vm_candidate::VmCandidate,
    },
    infrastructure::inventory::Inventory,
};
use std::collections::HashSet;

/// Keeps only machines placed on the ESX host `host`.
///
/// The host's machine list is fetched once and intersected by name. Machines
/// with the same name in another datacenter therefore also pass.
pub async fn filter_by_host(
    inventory: &dyn Inventory,
    host: &str,
    candidates: Vec<VmCandidate>,
) -> VsphereResult<Vec<VmCandidate>> {
    let members = inventory.host_members(host).await.map_err(|e| {
        e.in_stage(
            FilterStage::Host,
            "error retrieving virtual machines of host system",
        )
    })?;

    let names: HashSet<&str> = members.iter().map(|vm| vm.name.as_str()).collect();
    Ok(candidates
        .into_iter()
        .filter(|vm| names.contains(vm.name.as_str()))
        .collect())
}
