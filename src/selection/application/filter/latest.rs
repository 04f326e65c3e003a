use super::fetch_each;
use crate::core::{
    domain::{
        error::{FilterStage, VsphereResult},
        model::vm_candidate::VmCandidate,
    },
    infrastructure::inventory::Inventory,
};
use chrono::{DateTime, Utc};

/// Reduces the candidates to the most recently created one.
///
/// Returns a list with exactly one element for non-empty input.
pub async fn filter_by_latest(
    inventory: &dyn Inventory,
    candidates: Vec<VmCandidate>,
    concurrency: usize,
) -> VsphereResult<Vec<VmCandidate>> {
    let created = fetch_each(&candidates, concurrency, |vm| inventory.creation_time(vm))
        .await
        .map_err(|e| {
            e.in_stage(
                FilterStage::Latest,
                "error retrieving config properties for the virtual machine",
            )
        })?;

    Ok(pick_latest(candidates.into_iter().zip(created))
        .into_iter()
        .collect())
}

/// Picks the candidate with the latest creation time.
///
/// A missing creation time counts as the earliest possible instant, so such
/// a machine only wins when no other machine has a timestamp. Ties go to the
/// lexically smallest name, then to the first candidate seen.
pub fn pick_latest(
    timed: impl IntoIterator<Item = (VmCandidate, Option<DateTime<Utc>>)>,
) -> Option<VmCandidate> {
    let mut latest: Option<(VmCandidate, DateTime<Utc>)> = None;
    for (vm, created) in timed {
        let created = created.unwrap_or(DateTime::<Utc>::MIN_UTC);
        let replace = match &latest {
            None => true,
            Some((best, best_time)) => {
                created > *best_time || (created == *best_time && vm.name < best.name)
            }
        };
        if replace {
            latest = Some((vm, created));
        }
    }
    latest.map(|(vm, _)| vm)
}
