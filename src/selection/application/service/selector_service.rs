use crate::{
    core::{
        domain::{
            error::{FilterStage, VsphereError, VsphereResult},
            model::{filter_config::FilterConfig, vm_candidate::VmCandidate},
        },
        infrastructure::inventory::Inventory,
    },
    selection::application::filter::{
        filter_by_host, filter_by_latest, filter_by_name_regex, filter_by_tags,
        filter_by_template,
    },
};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Execution settings of a [`SelectorService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorOptions {
    /// Upper bound of per-candidate fetches in flight within one stage.
    /// `1` runs every fetch sequentially.
    pub fetch_concurrency: usize,
    /// Deadline for a whole selection. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            fetch_concurrency: 1,
            timeout: None,
        }
    }
}

/// Picks exactly one virtual machine out of an inventory.
///
/// The filters run in a fixed order: name glob, name regex, template, host,
/// tags and finally the latest-creation reduction. A stage never runs on an
/// empty list. The service keeps no state between calls, so the same filters
/// against an unchanged inventory select the same machine.
#[derive(Debug, Clone, Default)]
pub struct SelectorService {
    options: SelectorOptions,
}

impl SelectorService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SelectorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    /// Runs the filter pipeline and returns the name of the selected machine.
    ///
    /// # Errors
    ///
    /// * `VsphereError::Lookup` - the glob matched nothing, or the host does not exist
    /// * `VsphereError::PropertyFetch` - a remote fetch failed inside a stage
    /// * `VsphereError::NoMatch` - every candidate was filtered out
    /// * `VsphereError::AmbiguousMatch` - several candidates survived and `latest` is off
    /// * `VsphereError::Timeout` - the configured deadline elapsed
    pub async fn select(
        &self,
        filters: &FilterConfig,
        inventory: &dyn Inventory,
    ) -> VsphereResult<String> {
        match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(filters, inventory))
                .await
                .map_err(|_| VsphereError::Timeout(limit))?,
            None => self.run(filters, inventory).await,
        }
    }

    #[instrument(skip_all, fields(pattern = filters.name_pattern().as_str()))]
    async fn run(&self, filters: &FilterConfig, inventory: &dyn Inventory) -> VsphereResult<String> {
        let concurrency = self.options.fetch_concurrency;

        let mut candidates = inventory
            .list_by_glob(filters.name_pattern())
            .await
            .map_err(|e| e.in_stage(FilterStage::NameGlob, "error listing virtual machines"))?;
        debug!(count = candidates.len(), "listed virtual machines by name");

        if let Some(regex) = filters.name_regex() {
            candidates = filter_by_name_regex(candidates, regex);
            debug!(count = candidates.len(), regex = regex.as_str(), "filtered by name regex");
        }

        if !candidates.is_empty() && filters.template_only() {
            candidates = filter_by_template(inventory, candidates, concurrency).await?;
            debug!(count = candidates.len(), "filtered by template attribute");
        }

        if let Some(host) = filters.host().filter(|_| !candidates.is_empty()) {
            candidates = filter_by_host(inventory, host, candidates).await?;
            debug!(count = candidates.len(), host, "filtered by host");
        }

        if !candidates.is_empty() && !filters.required_tags().is_empty() {
            candidates =
                filter_by_tags(inventory, filters.required_tags(), candidates, concurrency).await?;
            debug!(count = candidates.len(), "filtered by tags");
        }

        let selected = self.reduce(filters, inventory, candidates).await?;
        info!(vm = %selected.name, id = %selected.id, "selected virtual machine");
        Ok(selected.name)
    }

    /// Applies the cardinality rules to the surviving candidates.
    async fn reduce(
        &self,
        filters: &FilterConfig,
        inventory: &dyn Inventory,
        mut candidates: Vec<VmCandidate>,
    ) -> VsphereResult<VmCandidate> {
        match candidates.len() {
            0 => Err(VsphereError::NoMatch),
            1 => Ok(candidates.remove(0)),
            _ if filters.prefer_latest() => {
                filter_by_latest(inventory, candidates, self.options.fetch_concurrency)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or(VsphereError::NoMatch)
            }
            _ => Err(VsphereError::AmbiguousMatch),
        }
    }
}
