//! Client entry point: session construction and resource wiring.

use std::sync::Arc;

use crate::config::{Config, GatewayHost};
use crate::diagnostics::{ObserverHandle, TracingObserver};
use crate::error::PayError;
use crate::resources::{OrdersClient, ServicesClient};

/// A configured session against the payment API.
///
/// One client is one identity: all resource clients share the session's
/// [`Config`] handle, its HTTP transport, and its diagnostic observer.
/// The client is cheap to keep around and safe to use concurrently.
pub struct PayClient {
    config: Config,
    observer: ObserverHandle,
    /// Orders API (v1, gateway-dependent).
    pub orders: OrdersClient,
    /// Services API (v2, direct).
    pub services: ServicesClient,
}

impl std::fmt::Debug for PayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayClient").finish_non_exhaustive()
    }
}

impl PayClient {
    /// Start building a client for an identity pair.
    #[must_use]
    pub fn builder(
        service_id: impl Into<String>,
        service_secret: impl Into<String>,
    ) -> PayClientBuilder {
        PayClientBuilder::new(service_id, service_secret)
    }

    /// Create a client with default settings.
    ///
    /// # Errors
    /// See [`PayClientBuilder::build`].
    pub fn new(
        service_id: impl Into<String>,
        service_secret: impl Into<String>,
    ) -> Result<Self, PayError> {
        Self::builder(service_id, service_secret).build()
    }

    /// Get the shared session configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Manually select the active gateway by domain.
    ///
    /// Only honored when dynamic gateway switching is disabled and the
    /// domain is present in the installed gateway list; every refusal is
    /// reported through the session's diagnostic observer and leaves the
    /// registry unchanged.
    pub fn set_gateway(&self, domain: &str) -> Option<GatewayHost> {
        match self.config.select_gateway(domain) {
            Ok(host) => Some(host),
            Err(diagnostic) => {
                self.observer.emit(&diagnostic);
                None
            }
        }
    }
}

/// Builder for [`PayClient`].
pub struct PayClientBuilder {
    service_id: String,
    service_secret: String,
    api_url: Option<String>,
    dynamic_gateway: bool,
    suppress_warnings: bool,
    observer: Option<ObserverHandle>,
}

impl PayClientBuilder {
    fn new(service_id: impl Into<String>, service_secret: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            service_secret: service_secret.into(),
            api_url: None,
            dynamic_gateway: true,
            suppress_warnings: false,
            observer: None,
        }
    }

    /// Override the API entry point used before gateway resolution.
    #[must_use]
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Enable or disable automatic gateway switching (enabled by default).
    #[must_use]
    pub fn dynamic_gateway(mut self, dynamic: bool) -> Self {
        self.dynamic_gateway = dynamic;
        self
    }

    /// Suppress diagnostic warnings emitted by the default observer.
    #[must_use]
    pub fn suppress_warnings(mut self, suppress: bool) -> Self {
        self.suppress_warnings = suppress;
        self
    }

    /// Install a custom diagnostic observer. A custom observer decides its
    /// own suppression policy; the `suppress_warnings` flag only drives the
    /// default [`TracingObserver`].
    #[must_use]
    pub fn observer(mut self, observer: ObserverHandle) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// `Configuration` when the service ID or secret is empty; `Unknown`
    /// when the HTTP transport cannot be constructed.
    pub fn build(self) -> Result<PayClient, PayError> {
        if self.service_id.trim().is_empty() {
            return Err(PayError::configuration("serviceId"));
        }
        if self.service_secret.trim().is_empty() {
            return Err(PayError::configuration("serviceSecret"));
        }

        let config = Config::new(self.service_id, self.service_secret);
        if let Some(api_url) = self.api_url {
            config.set_api_url(api_url);
        }
        config.set_dynamic_gateway(self.dynamic_gateway);
        config.set_suppress_warnings(self.suppress_warnings);

        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(TracingObserver::new(config.clone())));

        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| PayError::unknown(format!("failed to create HTTP client: {err}")))?;

        let orders = OrdersClient::new(config.clone(), http.clone());
        let services = ServicesClient::new(config.clone(), http);

        Ok(PayClient {
            config,
            observer,
            orders,
            services,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Diagnostic, DiagnosticObserver};
    use crate::error::ErrorKind;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<Diagnostic>>);

    impl DiagnosticObserver for Recording {
        fn emit(&self, event: &Diagnostic) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn empty_identity_is_a_configuration_error() {
        let err = PayClient::new("", "secret").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("serviceId"));

        let err = PayClient::new("S1", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("serviceSecret"));
    }

    #[test]
    fn builder_settings_land_in_config() {
        let client = PayClient::builder("S1", "secret")
            .api_url("https://alt.example")
            .dynamic_gateway(false)
            .suppress_warnings(true)
            .build()
            .unwrap();
        assert_eq!(client.config().api_url(), "https://alt.example");
        assert!(!client.config().dynamic_gateway());
        assert!(client.config().suppress_warnings());
    }

    #[test]
    fn set_gateway_refusals_reach_the_observer() {
        let observer = Arc::new(Recording::default());
        let client = PayClient::builder("S1", "secret")
            .observer(observer.clone())
            .build()
            .unwrap();

        assert!(client.set_gateway("a.example").is_none());

        let events = observer.0.lock().unwrap();
        assert_eq!(events.as_slice(), [Diagnostic::DynamicGatewayOverride]);
    }
}
