use super::fetch_each;
use crate::core::{
    domain::{
        error::{FilterStage, VsphereResult},
        model::{
            tag::{AttachedTag, Tag},
            vm_candidate::VmCandidate,
        },
    },
    infrastructure::inventory::Inventory,
};

/// Keeps only machines that carry every tag in `required`.
///
/// A required tag is matched by an attached tag with the same name whose
/// category ID resolves to the required category name. Evaluation of a
/// candidate stops at its first unmatched tag.
pub async fn filter_by_tags(
    inventory: &dyn Inventory,
    required: &[Tag],
    candidates: Vec<VmCandidate>,
    concurrency: usize,
) -> VsphereResult<Vec<VmCandidate>> {
    let keep = fetch_each(&candidates, concurrency, |vm| {
        has_all_tags(inventory, vm, required)
    })
    .await?;

    Ok(candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(vm, keep)| keep.then_some(vm))
        .collect())
}

async fn has_all_tags(
    inventory: &dyn Inventory,
    vm: &VmCandidate,
    required: &[Tag],
) -> VsphereResult<bool> {
    let attached = inventory.attached_tags(vm).await.map_err(|e| {
        e.in_stage(
            FilterStage::Tags,
            "failed to return tags for the virtual machine",
        )
    })?;

    let mut matched = 0;
    for tag in required {
        if !is_attached(inventory, tag, &attached).await? {
            break;
        }
        matched += 1;
    }
    Ok(matched == required.len())
}

async fn is_attached(
    inventory: &dyn Inventory,
    required: &Tag,
    attached: &[AttachedTag],
) -> VsphereResult<bool> {
    for tag in attached.iter().filter(|t| t.name == required.name) {
        let category = inventory
            .resolve_category_name(&tag.category_id)
            .await
            .map_err(|e| e.in_stage(FilterStage::Tags, "failed to return tag category for tag"))?;
        if category == required.category {
            return Ok(true);
        }
    }
    Ok(false)
}
