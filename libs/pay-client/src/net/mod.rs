//! Networking core: request dispatch and gateway resolution.

mod resolver;
pub(crate) mod response;
pub(crate) mod url;

use parking_lot::RwLock;
use reqwest::Method;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use crate::config::Config;
use crate::error::PayError;
use response::Classified;

/// Request orchestration core.
///
/// Each resource client owns one `NetworkClient`, wired with a fixed API
/// version and resource path before first use. Dispatch is a sequential
/// pipeline per call: optional gateway resolution, body stamping, URL
/// assembly, the transport call, and response classification. The only
/// suspension points are the transport calls.
///
/// The client is safe to share across concurrent requests: configuration
/// reads go through the shared [`Config`] handle, the mutable base URL is
/// behind a synchronous lock, and the unresolved-to-resolved gateway
/// transition is single-flighted (see [`NetworkClient::resolve_gateway`]).
pub struct NetworkClient {
    config: Config,
    http: reqwest::Client,
    base_url: RwLock<String>,
    version: String,
    resource: String,
    requires_gateway: bool,
    resolve_lock: tokio::sync::Mutex<()>,
}

impl NetworkClient {
    /// Create a client with its own transport.
    ///
    /// # Errors
    /// Returns an `Unknown` error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: Config) -> Result<Self, PayError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| PayError::unknown(format!("failed to create HTTP client: {err}")))?;
        Ok(Self::with_http(config, http))
    }

    /// Create a client sharing an existing transport.
    pub(crate) fn with_http(config: Config, http: reqwest::Client) -> Self {
        let base_url = RwLock::new(config.api_url());
        Self {
            config,
            http,
            base_url,
            version: String::new(),
            resource: String::new(),
            requires_gateway: false,
            resolve_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Get the configuration handle of this client.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the base URL requests are currently dispatched against.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base_url.read().clone()
    }

    /// Set the API version segment. Must be called before first use.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// Set the resource path segment. Must be called before first use.
    pub fn set_resource(&mut self, resource: impl Into<String>) {
        self.resource = resource.into();
    }

    /// Set whether requests require a resolved gateway. Must be called
    /// before first use.
    pub fn set_requires_gateway(&mut self, requires: bool) {
        self.requires_gateway = requires;
    }

    /// Make a GET request to the given endpoint.
    ///
    /// # Errors
    /// See [`NetworkClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, PayError> {
        self.request(Method::GET, endpoint, None).await
    }

    /// Make a POST request to the given endpoint.
    ///
    /// A JSON-object body is stamped with the session's `serviceId`,
    /// overriding any caller-supplied value.
    ///
    /// # Errors
    /// See [`NetworkClient::request`].
    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<T, PayError> {
        self.request(Method::POST, endpoint, body).await
    }

    /// Make a PATCH request to the given endpoint.
    ///
    /// Body handling matches [`NetworkClient::post`].
    ///
    /// # Errors
    /// See [`NetworkClient::request`].
    pub async fn patch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<T, PayError> {
        self.request(Method::PATCH, endpoint, body).await
    }

    /// Make a DELETE request to the given endpoint.
    ///
    /// # Errors
    /// See [`NetworkClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, PayError> {
        self.request(Method::DELETE, endpoint, None).await
    }

    /// Shallow-merge the session's `serviceId` into a JSON-object body.
    /// Non-object bodies pass through unchanged.
    fn inject_service_id(&self, body: Value) -> Value {
        match body {
            Value::Object(mut map) => {
                map.insert("serviceId".to_owned(), Value::String(self.config.service_id()));
                Value::Object(map)
            }
            other => other,
        }
    }

    /// Dispatch one request and classify its outcome.
    ///
    /// # Errors
    /// `Network` when the transport call cannot complete; `Api` when the
    /// remote answers with an error body or a non-success status (status is
    /// authoritative over body shape); `Response` when a success payload
    /// does not deserialize into the caller's declared type. Gateway
    /// resolution failures propagate unmodified.
    #[instrument(skip(self, body), fields(method = %method, resource = %self.resource))]
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<T, PayError> {
        if self.requires_gateway {
            self.resolve_gateway().await?;
        }

        let body = if matches!(method, Method::POST | Method::PATCH) {
            body.map(|b| self.inject_service_id(b))
        } else {
            body
        };

        let url = url::assemble_url(&self.base_url(), &self.version, &self.resource, endpoint);
        let token = self.config.encoded_token();

        let mut request = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, format!("Basic {token}"));
        if let Some(ref json) = body {
            request = request.json(json);
        }

        let start = std::time::Instant::now();
        let response = request.send().await.map_err(|err| {
            tracing::error!(%url, error = %err, "transport call failed");
            PayError::network(format!("request to {url} failed: {err}"))
        })?;

        let status = response.status();
        let classified = response::classify(response).await?;

        // Duration in ms is always small enough for u64 in practice
        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(%url, status = status.as_u16(), duration_ms, "request completed");

        match classified {
            Classified::Failure(envelope) => Err(PayError::api_with_envelope(
                format!("HTTP {}: {}", status.as_u16(), envelope.error),
                envelope,
            )),
            Classified::Success(value) if !status.is_success() => Err(PayError::api(format!(
                "HTTP {}: {}",
                status.as_u16(),
                value
            ))),
            Classified::Success(value) => serde_json::from_value(value)
                .map_err(|err| PayError::response(format!("unexpected response shape: {err}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> NetworkClient {
        NetworkClient::new(Config::new("S1", "secret")).unwrap()
    }

    #[test]
    fn service_id_injection_overrides_caller_value() {
        let net = client();
        let body = net.inject_service_id(json!({"amount": 100, "serviceId": "CALLER"}));
        assert_eq!(body, json!({"amount": 100, "serviceId": "S1"}));
    }

    #[test]
    fn service_id_injection_leaves_non_objects_untouched() {
        let net = client();
        assert_eq!(net.inject_service_id(json!([1, 2])), json!([1, 2]));
        assert_eq!(net.inject_service_id(json!(100)), json!(100));
    }

    #[test]
    fn base_url_starts_from_configured_api_url() {
        let net = client();
        assert_eq!(net.base_url(), crate::config::DEFAULT_API_URL);
    }
}
