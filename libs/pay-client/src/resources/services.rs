//! Services resource: service configuration lookups.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{Config, GatewayHost};
use crate::error::PayError;
use crate::net::{NetworkClient, url};

/// Configuration of a service as returned by the remote API, including the
/// ranked gateway candidate list under its wire name `tguList`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub merchant_code: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub translations: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default, rename = "tguList")]
    pub tgu_list: Vec<GatewayHost>,
    #[serde(default)]
    pub layout: Option<Value>,
    #[serde(default)]
    pub checkout_options: Option<Value>,
    #[serde(default)]
    pub checkout_sequence: Option<Value>,
    #[serde(default)]
    pub checkout_texts: Option<Value>,
}

/// Client for the Services API. Service calls go to the configured API
/// host directly and never trigger gateway resolution.
pub struct ServicesClient {
    net: NetworkClient,
}

impl ServicesClient {
    pub(crate) fn new(config: Config, http: reqwest::Client) -> Self {
        let mut net = NetworkClient::with_http(config, http);
        net.set_version("v2");
        net.set_resource("services");
        net.set_requires_gateway(false);
        Self { net }
    }

    /// Access the underlying networking client.
    #[must_use]
    pub fn network(&self) -> &NetworkClient {
        &self.net
    }

    /// Retrieve the configuration of the session's service.
    ///
    /// # Errors
    /// Dispatch errors; see [`NetworkClient::get`].
    pub async fn get_config(&self) -> Result<ServiceConfig, PayError> {
        let endpoint = format!("config?serviceId={}", self.net.config().service_id());
        self.net.get(&endpoint).await
    }

    /// Determine the preferred gateway URL for the session's service: the
    /// highest-share candidate from the service configuration, as a full
    /// `https://` URL.
    ///
    /// # Errors
    /// `Api` when the configuration carries no gateway candidates, plus
    /// dispatch errors from the configuration fetch.
    pub async fn gateway_url(&self) -> Result<String, PayError> {
        let config = self.get_config().await?;
        let mut list = config.tgu_list;
        list.sort_by(|a, b| b.share.total_cmp(&a.share));
        let head = list
            .first()
            .ok_or_else(|| PayError::api("retrieved no gateway list from the API"))?;
        Ok(url::url_from_domain(&head.domain))
    }
}
