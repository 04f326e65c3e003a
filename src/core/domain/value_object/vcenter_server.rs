use crate::core::domain::error::ValidationError;
use url::Url;

/// A validated vCenter server address (`host` or `host:port`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcenterServer(String);

impl VcenterServer {
    /// Creates a new server address without validation.
    pub(crate) fn new_unchecked(server: String) -> Self {
        Self(server)
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the HTTPS base URL used for every API call.
    pub fn base_url(&self) -> Result<Url, ValidationError> {
        build_base_url(&self.0)
    }
}

fn build_base_url(server: &str) -> Result<Url, ValidationError> {
    Url::parse(&format!("https://{}/", server))
        .map_err(|e| ValidationError::Format(format!("Invalid vcenter_server '{}': {}", server, e)))
}

/// Validates a vCenter server address.
pub(crate) fn validate_vcenter_server(server: &str) -> Result<(), ValidationError> {
    if server.is_empty() {
        return Err(ValidationError::Required("vcenter_server".to_string()));
    }
    if server.contains("://") || server.contains('/') {
        return Err(ValidationError::Field {
            field: "vcenter_server".to_string(),
            message: "Expected a host name or address without scheme or path".to_string(),
        });
    }
    let url = build_base_url(server)?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::Field {
            field: "vcenter_server".to_string(),
            message: "Host cannot be empty".to_string(),
        });
    }
    Ok(())
}
