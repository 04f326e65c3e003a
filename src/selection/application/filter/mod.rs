//! Filter stages of the selection pipeline.
//!
//! Each stage takes the surviving candidates and returns a subset of them in
//! the same order. Stages that need a remote lookup per candidate fetch
//! through [`fetch_each`], which keeps input order and stops at the first
//! failure.

mod host;
mod latest;
mod name_regex;
mod tags;
mod template;

pub use host::filter_by_host;
pub use latest::{filter_by_latest, pick_latest};
pub use name_regex::filter_by_name_regex;
pub use tags::filter_by_tags;
pub use template::filter_by_template;

use crate::core::domain::{error::VsphereResult, model::vm_candidate::VmCandidate};
use futures::{Future, StreamExt, TryStreamExt, stream};

/// Runs `fetch` for every candidate, at most `concurrency` at a time.
///
/// Results come back in candidate order. The first error aborts the whole
/// batch and drops the fetches still in flight.
pub(crate) async fn fetch_each<'a, T, F, Fut>(
    candidates: &'a [VmCandidate],
    concurrency: usize,
    fetch: F,
) -> VsphereResult<Vec<T>>
where
    F: FnMut(&'a VmCandidate) -> Fut,
    Fut: Future<Output = VsphereResult<T>>,
{
    stream::iter(candidates.iter().map(fetch))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}
