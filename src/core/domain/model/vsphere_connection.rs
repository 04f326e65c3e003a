use crate::core::domain::{
    error::{ValidationError, VsphereResult},
    value_object::VcenterServer,
};
use std::fmt;
use url::Url;

/// Connection details of a vCenter endpoint.
///
/// Credentials are kept for the session driver that creates the API session;
/// this crate itself only ever sends the session token it is handed.
#[derive(Clone)]
pub struct VsphereConnection {
    server: VcenterServer,
    username: String,
    password: String,
    insecure: bool,
    datacenter: Option<String>,
    base_url: Url,
}

impl VsphereConnection {
    pub(crate) fn new(
        server: VcenterServer,
        username: String,
        password: String,
        insecure: bool,
        datacenter: Option<String>,
    ) -> VsphereResult<Self> {
        let base_url = server.base_url()?;
        Ok(Self {
            server,
            username,
            password,
            insecure,
            datacenter,
            base_url,
        })
    }

    /// Creates a connection pointing at an arbitrary base URL, without validation.
    pub(crate) fn new_unchecked(base_url: Url, datacenter: Option<String>) -> Self {
        let server = VcenterServer::new_unchecked(base_url.authority().to_string());
        Self {
            server,
            username: String::new(),
            password: String::new(),
            insecure: true,
            datacenter,
            base_url,
        }
    }

    pub fn server(&self) -> &VcenterServer {
        &self.server
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Whether invalid TLS certificates are accepted.
    pub fn accepts_invalid_certs(&self) -> bool {
        self.insecure
    }

    /// Datacenter that scopes the inventory. `None` selects the default one.
    pub fn datacenter(&self) -> Option<&str> {
        self.datacenter.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins an API path onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> VsphereResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ValidationError::Format(format!("Invalid API path '{}': {}", path, e)).into())
    }
}

impl fmt::Debug for VsphereConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VsphereConnection")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("insecure", &self.insecure)
            .field("datacenter", &self.datacenter)
            .finish()
    }
}
