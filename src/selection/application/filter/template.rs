use super::fetch_each;
use crate::core::{
    domain::{
        error::{FilterStage, VsphereResult},
        model::vm_candidate::VmCandidate,
    },
    infrastructure::inventory::Inventory,
};

/// Keeps only machines marked as templates.
///
/// One property fetch per candidate. Any failed fetch aborts the stage.
pub async fn filter_by_template(
    inventory: &dyn Inventory,
    candidates: Vec<VmCandidate>,
    concurrency: usize,
) -> VsphereResult<Vec<VmCandidate>> {
    let flags = fetch_each(&candidates, concurrency, |vm| inventory.is_template(vm))
        .await
        .map_err(|e| {
            e.in_stage(
                FilterStage::Template,
                "error checking if virtual machine is a template",
            )
        })?;

    Ok(candidates
        .into_iter()
        .zip(flags)
        .filter_map(|(vm, is_template)| is_template.then_some(vm))
        .collect())
}
