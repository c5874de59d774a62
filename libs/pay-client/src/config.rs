//! Shared session configuration and the gateway endpoint registry.
//!
//! One session, one identity, one token: the encoded token always matches
//! the identity currently installed here, and mutating the identity clears
//! the gateway registry so the next host-dependent call re-resolves under
//! the new credentials.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;

/// Default REST entry point used until gateway resolution repoints it.
pub const DEFAULT_API_URL: &str = "https://rest.pay.nl";

/// One ranked gateway host ("TGU") as returned by service discovery.
///
/// `share` is a relative preference weight: higher means more preferred.
/// `domain` may or may not carry a scheme prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayHost {
    #[serde(rename = "ID")]
    pub id: i64,
    pub share: f64,
    pub domain: String,
    pub status: String,
}

/// Derive the Basic-auth token for an identity pair.
fn encode_token(service_id: &str, service_secret: &str) -> String {
    BASE64.encode(format!("{service_id}:{service_secret}"))
}

#[derive(Debug)]
struct ConfigState {
    service_id: String,
    service_secret: String,
    api_url: String,
    dynamic_gateway: bool,
    suppress_warnings: bool,
    encoded_token: String,
    gateway_list: Option<Vec<GatewayHost>>,
    active_gateway: Option<GatewayHost>,
}

/// Shared, concurrency-safe configuration handle.
///
/// Cloning is cheap (shared ownership). The inner lock is a synchronous
/// `parking_lot::RwLock` and is never held across an await point.
#[derive(Debug, Clone)]
pub struct Config {
    inner: Arc<RwLock<ConfigState>>,
}

impl Config {
    /// Create a configuration for an identity pair.
    ///
    /// The encoded token is derived immediately; both fields are expected
    /// to be non-empty (validated by [`crate::PayClient`] construction).
    #[must_use]
    pub fn new(service_id: impl Into<String>, service_secret: impl Into<String>) -> Self {
        let service_id = service_id.into();
        let service_secret = service_secret.into();
        let encoded_token = encode_token(&service_id, &service_secret);
        Self {
            inner: Arc::new(RwLock::new(ConfigState {
                service_id,
                service_secret,
                api_url: DEFAULT_API_URL.to_owned(),
                dynamic_gateway: true,
                suppress_warnings: false,
                encoded_token,
                gateway_list: None,
                active_gateway: None,
            })),
        }
    }

    /// Get the service ID of the session.
    #[must_use]
    pub fn service_id(&self) -> String {
        self.inner.read().service_id.clone()
    }

    /// Get the service secret of the session.
    #[must_use]
    pub fn service_secret(&self) -> String {
        self.inner.read().service_secret.clone()
    }

    /// Get the Basic-auth token for the current identity.
    #[must_use]
    pub fn encoded_token(&self) -> String {
        self.inner.read().encoded_token.clone()
    }

    /// Set the service ID.
    ///
    /// Recomputes the encoded token and clears the gateway registry; the
    /// next host-dependent request re-resolves under the new identity.
    pub fn set_service_id(&self, service_id: impl Into<String>) {
        let mut state = self.inner.write();
        state.service_id = service_id.into();
        state.encoded_token = encode_token(&state.service_id, &state.service_secret);
        state.gateway_list = None;
        state.active_gateway = None;
    }

    /// Set the service secret. Same registry/token consequences as
    /// [`Config::set_service_id`].
    pub fn set_service_secret(&self, service_secret: impl Into<String>) {
        let mut state = self.inner.write();
        state.service_secret = service_secret.into();
        state.encoded_token = encode_token(&state.service_id, &state.service_secret);
        state.gateway_list = None;
        state.active_gateway = None;
    }

    /// Get the API base URL.
    #[must_use]
    pub fn api_url(&self) -> String {
        self.inner.read().api_url.clone()
    }

    /// Set the API base URL.
    pub fn set_api_url(&self, api_url: impl Into<String>) {
        self.inner.write().api_url = api_url.into();
    }

    /// Return whether the active gateway is switched automatically.
    #[must_use]
    pub fn dynamic_gateway(&self) -> bool {
        self.inner.read().dynamic_gateway
    }

    /// Set whether the active gateway is switched automatically.
    pub fn set_dynamic_gateway(&self, dynamic: bool) {
        self.inner.write().dynamic_gateway = dynamic;
    }

    /// Return whether diagnostic warnings are suppressed.
    #[must_use]
    pub fn suppress_warnings(&self) -> bool {
        self.inner.read().suppress_warnings
    }

    /// Set whether diagnostic warnings are suppressed.
    pub fn set_suppress_warnings(&self, suppress: bool) {
        self.inner.write().suppress_warnings = suppress;
    }

    /// Get the installed gateway list, ranked by share descending.
    #[must_use]
    pub fn gateway_list(&self) -> Option<Vec<GatewayHost>> {
        self.inner.read().gateway_list.clone()
    }

    /// Get the currently active gateway.
    #[must_use]
    pub fn active_gateway(&self) -> Option<GatewayHost> {
        self.inner.read().active_gateway.clone()
    }

    /// Install a ranked gateway list and select the active gateway.
    ///
    /// Only the resolver (or an explicit override) mutates the registry.
    /// The write is idempotent and commutative for identical discovery
    /// responses, so a lost race between concurrent resolvers is harmless.
    pub(crate) fn install_gateways(&self, list: Vec<GatewayHost>, active: GatewayHost) {
        let mut state = self.inner.write();
        state.gateway_list = Some(list);
        state.active_gateway = Some(active);
    }

    /// Clear the gateway registry, forcing the next host-dependent request
    /// to re-run discovery.
    pub fn clear_gateways(&self) {
        let mut state = self.inner.write();
        state.gateway_list = None;
        state.active_gateway = None;
    }

    /// Manually select an active gateway by domain.
    ///
    /// Refused when dynamic switching is on, when no list has been
    /// installed yet, or when the domain is not in the installed list. The
    /// refusal reason is returned as a [`Diagnostic`] for the caller's
    /// observer; the registry is left unchanged in every refusal case.
    ///
    /// # Errors
    /// Returns the diagnostic describing why the override was refused.
    pub fn select_gateway(&self, domain: &str) -> Result<GatewayHost, Diagnostic> {
        let mut state = self.inner.write();
        if state.dynamic_gateway {
            return Err(Diagnostic::DynamicGatewayOverride);
        }
        let Some(list) = state.gateway_list.as_ref() else {
            return Err(Diagnostic::GatewayListNotSet);
        };
        match list.iter().find(|host| host.domain == domain) {
            Some(host) => {
                let host = host.clone();
                state.active_gateway = Some(host.clone());
                Ok(host)
            }
            None => Err(Diagnostic::GatewayNotInList {
                domain: domain.to_owned(),
            }),
        }
    }
}
