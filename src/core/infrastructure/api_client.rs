//! Internal HTTP client that sends authenticated requests to vCenter.

use crate::core::domain::{
    error::{ValidationError, VsphereError, VsphereResult},
    model::vsphere_connection::VsphereConnection,
    value_object::SessionToken,
};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::trace;

/// Header carrying the vCenter API session identifier.
pub(crate) const SESSION_HEADER: &str = "vmware-api-session-id";

/// Client-side rate limit applied to every API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Tuning knobs of the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Release segment of the VI/JSON endpoints (`/sdk/vim25/{release}/...`).
    pub vim_release: String,
    /// Timeout of a single HTTP request.
    pub request_timeout: Duration,
    /// Optional client-side rate limit. Disabled by default.
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            vim_release: "8.0.1.0".to_string(),
            request_timeout: Duration::from_secs(30),
            rate_limit: None,
        }
    }
}

/// Internal HTTP client that attaches the session header to each request.
///
/// Sessions are created elsewhere: the client starts without one and gets it
/// through [`ApiClient::set_session`]. A `401 Unauthorized` answer is reported
/// as an authentication error; requests are never retried.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    connection: Arc<VsphereConnection>,
    session: Arc<RwLock<Option<SessionToken>>>,
    config: Arc<ClientConfig>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`. The client starts without a session.
    ///
    /// # Errors
    /// Returns `VsphereError::Connection` if the HTTP client cannot be built,
    /// or `VsphereError::Configuration` for a zero rate limit.
    pub fn new(connection: VsphereConnection, config: ClientConfig) -> VsphereResult<Self> {
        let http_client = Client::builder()
            .danger_accept_invalid_certs(connection.accepts_invalid_certs())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| VsphereError::Connection(e.to_string()))?;

        let rate_limiter = match config.rate_limit {
            Some(rl) => {
                let per_second = non_zero("requests_per_second", rl.requests_per_second)?;
                let burst = non_zero("burst_size", rl.burst_size)?;
                let quota = Quota::per_second(per_second).allow_burst(burst);
                Some(Arc::new(DefaultDirectRateLimiter::direct(quota)))
            }
            None => None,
        };

        Ok(Self {
            http_client,
            connection: Arc::new(connection),
            session: Arc::new(RwLock::new(None)),
            config: Arc::new(config),
            rate_limiter,
        })
    }

    /// Returns a reference to the underlying connection details.
    pub fn connection(&self) -> &VsphereConnection {
        &self.connection
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sets the session used by subsequent requests.
    pub async fn set_session(&self, token: SessionToken) {
        let mut lock = self.session.write().await;
        *lock = Some(token);
    }

    /// Returns `true` if a session token is set.
    pub async fn has_session(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Performs an authenticated GET request.
    pub async fn get<T>(&self, path: &str) -> VsphereResult<T>
    where
        T: DeserializeOwned,
    {
        self.execute_request(Method::GET, path, &[], None::<&()>)
            .await
    }

    /// Performs an authenticated GET request with query parameters.
    ///
    /// Repeated keys are sent as repeated parameters, the way the vCenter
    /// filter specs expect them.
    pub async fn get_with_query<T>(&self, path: &str, query: &[(&str, &str)]) -> VsphereResult<T>
    where
        T: DeserializeOwned,
    {
        self.execute_request(Method::GET, path, query, None::<&()>)
            .await
    }

    /// Performs an authenticated POST request with a JSON body.
    pub async fn post<B, T>(&self, path: &str, query: &[(&str, &str)], body: &B) -> VsphereResult<T>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        self.execute_request(Method::POST, path, query, Some(body))
            .await
    }

    /// Core request execution method. It applies the rate limit, sends the
    /// request with the session header, and parses the response.
    async fn execute_request<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> VsphereResult<T>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let token = self.session.read().await.clone().ok_or_else(|| {
            VsphereError::Authentication("No active session; set a session token first".to_string())
        })?;

        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let mut url = self.connection.endpoint(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        trace!(%method, %url, "sending vCenter request");
        let mut req_builder = self
            .http_client
            .request(method, url)
            .header(SESSION_HEADER, token.as_str());

        if let Some(body) = body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| VsphereError::Connection(format!("HTTP request failed: {}", e)))?;

        let response = check_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| VsphereError::Parse(format!("Failed to parse response: {}", e)))
    }
}

fn non_zero(field: &str, value: u32) -> VsphereResult<NonZeroU32> {
    NonZeroU32::new(value).ok_or_else(|| {
        ValidationError::Field {
            field: field.to_string(),
            message: "Rate limit values must be greater than zero".to_string(),
        }
        .into()
    })
}

async fn check_status(response: Response) -> VsphereResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown".to_string());

    match status {
        StatusCode::UNAUTHORIZED => Err(VsphereError::Authentication(format!(
            "Session expired or invalid: {}",
            error_text
        ))),
        StatusCode::NOT_FOUND => Err(VsphereError::NotFound(error_text)),
        _ => Err(VsphereError::Api {
            status: status.as_u16(),
            message: error_text,
        }),
    }
}
