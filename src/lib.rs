//! Virtual machine discovery for vSphere.
//!
//! The crate narrows a vSphere inventory down to exactly one virtual machine
//! using declarative filters: a name glob, a name regex, the template flag,
//! the ESX host, required tags and an optional "latest created" reduction.
//!
//! The inventory is reached through the [`Inventory`] trait. [`RestInventory`]
//! talks to vCenter over HTTP; [`InMemoryInventory`] serves tests and offline
//! runs.

mod core;
mod selection;

#[cfg(test)]
mod tests;

pub use crate::core::{
    domain::{
        error::{ConfigErrors, FilterStage, ValidationError, VsphereError, VsphereResult},
        model::{
            datasource_config::{DatasourceConfig, ValidatedConfig},
            datasource_output::DatasourceOutput,
            filter_config::{FilterConfig, FilterConfigBuilder},
            tag::{AttachedTag, Tag},
            vm_candidate::VmCandidate,
            vsphere_connection::VsphereConnection,
        },
        value_object::{DEFAULT_NAME_PATTERN, NamePattern, NameRegex, SessionToken, VcenterServer},
    },
    infrastructure::{
        api_client::{ApiClient, ClientConfig, RateLimitConfig},
        inventory::Inventory,
        memory_inventory::{InMemoryInventory, SimulatedVm},
        rest_inventory::RestInventory,
    },
};
pub use crate::selection::application::{
    filter::{
        filter_by_host, filter_by_latest, filter_by_name_regex, filter_by_tags,
        filter_by_template, pick_latest,
    },
    service::selector_service::{SelectorOptions, SelectorService},
};

/// A datasource that resolves its configuration to a single virtual machine.
///
/// # Examples
///
/// ```no_run
/// use leeca_vsphere::{
///     ClientConfig, DatasourceConfig, SessionToken, VirtualMachineDatasource, VsphereResult,
/// };
///
/// #[tokio::main]
/// async fn main() -> VsphereResult<()> {
///     let config = DatasourceConfig::from_file("datasource.json").await?;
///     let datasource = VirtualMachineDatasource::configure(config)?;
///
///     let session = SessionToken::new("b9e8c4b2a1f0...")?;
///     let inventory = datasource.rest_inventory(session, ClientConfig::default()).await?;
///
///     let output = datasource.execute(&inventory).await?;
///     println!("{}", output.vm_name);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct VirtualMachineDatasource {
    connection: VsphereConnection,
    filters: FilterConfig,
    selector: SelectorService,
}

impl VirtualMachineDatasource {
    /// Validates a raw configuration and prepares the datasource.
    ///
    /// # Errors
    ///
    /// Returns `VsphereError::Configuration` with every validation problem
    /// found in the configuration.
    pub fn configure(config: DatasourceConfig) -> VsphereResult<Self> {
        let ValidatedConfig {
            connection,
            filters,
        } = config.validate()?;
        Ok(Self {
            connection,
            filters,
            selector: SelectorService::new(),
        })
    }

    /// Replaces the selector settings.
    pub fn with_options(mut self, options: SelectorOptions) -> Self {
        self.selector = SelectorService::with_options(options);
        self
    }

    pub fn connection(&self) -> &VsphereConnection {
        &self.connection
    }

    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    /// Builds a vCenter-backed inventory for this datasource's connection.
    ///
    /// The session must already exist on the vCenter side; it is attached
    /// to every request as is.
    pub async fn rest_inventory(
        &self,
        session: SessionToken,
        config: ClientConfig,
    ) -> VsphereResult<RestInventory> {
        let client = ApiClient::new(self.connection.clone(), config)?;
        client.set_session(session).await;
        Ok(RestInventory::new(client))
    }

    /// Selects the virtual machine matching the configured filters.
    pub async fn execute(&self, inventory: &dyn Inventory) -> VsphereResult<DatasourceOutput> {
        let vm_name = self.selector.select(&self.filters, inventory).await?;
        Ok(DatasourceOutput { vm_name })
    }
}
