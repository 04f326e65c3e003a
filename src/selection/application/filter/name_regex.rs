use crate::core::domain::{model::vm_candidate::VmCandidate, value_object::NameRegex};

/// Keeps the machines whose name matches `regex` anywhere.
///
/// This stage works on names only and never calls the inventory.
pub fn filter_by_name_regex(candidates: Vec<VmCandidate>, regex: &NameRegex) -> Vec<VmCandidate> {
    candidates
        .into_iter()
        .filter(|vm| regex.is_match(&vm.name))
        .collect()
}
