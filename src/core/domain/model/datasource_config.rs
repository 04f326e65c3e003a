//! Raw datasource configuration as written by the user.
//!
//! Keys follow the plugin's template syntax. The legacy `node` and `vm_tags`
//! keys are still accepted as aliases of `host` and `tag`.

use crate::core::domain::{
    error::{ConfigErrors, ValidationError, VsphereError, VsphereResult},
    model::{
        filter_config::FilterConfig, tag::Tag, vsphere_connection::VsphereConnection,
    },
    value_object::{VcenterServer, validate_vcenter_server},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Loosely typed configuration decoded from JSON.
///
/// Nothing is checked at decode time; [`DatasourceConfig::validate`] turns it
/// into typed values and reports every problem at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasourceConfig {
    pub vcenter_server: String,
    pub username: String,
    pub password: String,
    pub insecure_connection: bool,
    pub datacenter: String,

    /// Basic filter with glob support (e.g. `ubuntu_basic*`). Defaults to `*`.
    pub name: String,
    /// Extended name filter with regular expression support. The match is
    /// checked by substring; use `^` and `$` to match the full name.
    pub name_regex: String,
    /// Return only virtual machine templates.
    pub template: bool,
    /// Return only machines placed on this ESX host.
    ///
    /// `node` is the legacy spelling of this key. Setting both `host` and
    /// `node` in one document is rejected as a duplicate field.
    #[serde(alias = "node")]
    pub host: String,
    /// Return only machines carrying all of these tags.
    ///
    /// `vm_tags` is the legacy spelling of this key. Setting both `tag` and
    /// `vm_tags` in one document is rejected as a duplicate field.
    #[serde(alias = "vm_tags")]
    pub tag: Vec<Tag>,
    /// Pick the most recently created machine when several match.
    pub latest: bool,
}

/// The typed result of a successful validation.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub connection: VsphereConnection,
    pub filters: FilterConfig,
}

impl DatasourceConfig {
    /// Decodes a configuration from a JSON document.
    pub fn from_json(json: &str) -> VsphereResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            ValidationError::Format(format!("Failed to decode configuration: {}", e)).into()
        })
    }

    /// Reads and decodes a JSON configuration file.
    pub async fn from_file(path: impl AsRef<Path>) -> VsphereResult<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            VsphereError::from(ValidationError::Format(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            )))
        })?;
        Self::from_json(&json)
    }

    /// Validates the configuration in a single pass.
    ///
    /// # Errors
    ///
    /// Returns `VsphereError::Configuration` listing every problem found:
    /// missing connection settings, incomplete tags, an invalid glob or an
    /// invalid regular expression.
    pub fn validate(self) -> VsphereResult<ValidatedConfig> {
        let mut errors = Vec::new();

        if let Err(e) = validate_vcenter_server(&self.vcenter_server) {
            errors.push(e);
        }
        if self.username.is_empty() {
            errors.push(ValidationError::Required("username".to_string()));
        }
        if self.password.is_empty() {
            errors.push(ValidationError::Required("password".to_string()));
        }

        let filters = FilterConfig::builder()
            .name(self.name)
            .name_regex(self.name_regex)
            .template(self.template)
            .host(self.host)
            .tags(self.tag)
            .latest(self.latest)
            .build_collecting(&mut errors);

        ConfigErrors::into_result(errors)?;

        let datacenter = Some(self.datacenter).filter(|d| !d.is_empty());
        let connection = VsphereConnection::new(
            VcenterServer::new_unchecked(self.vcenter_server),
            self.username,
            self.password,
            self.insecure_connection,
            datacenter,
        )?;

        Ok(ValidatedConfig {
            connection,
            filters,
        })
    }
}
