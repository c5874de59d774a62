//! Dynamic gateway resolution.
//!
//! Host-dependent requests go through a ranked list of equivalent gateway
//! hosts discovered from the service configuration endpoint. The registry
//! lives in the shared [`Config`](crate::config::Config); this module owns
//! the unresolved-to-resolved transition.

use reqwest::header;
use serde_json::Value;
use tracing::instrument;

use super::NetworkClient;
use super::url;
use crate::config::GatewayHost;
use crate::error::PayError;

/// Fixed, version-pinned discovery endpoint, independent of the calling
/// resource's own version and path.
const DISCOVERY_PATH: &str = "/v2/services/config";

impl NetworkClient {
    /// Resolve the active gateway, discovering one if the registry is empty.
    ///
    /// Steady state is the fast path: a cached active gateway is returned
    /// without any network activity (the base URL is repointed to it, so an
    /// out-of-band override takes effect immediately). Otherwise a single
    /// discovery fetch runs under a single-flight lock; concurrent callers
    /// that lost the race re-check the registry instead of refetching.
    ///
    /// Discovery ranks the returned candidates by `share` descending
    /// (stable; response order breaks ties), installs the sorted list,
    /// selects the head as active and repoints the base URL to
    /// `https://<domain>` (the scheme is prefixed only when absent).
    ///
    /// Idempotent once resolved; there is no TTL or periodic refresh. The
    /// cache lives until the caller installs a new identity or clears it.
    ///
    /// # Errors
    /// Every discovery failure is an `Api` error: a transport failure, a
    /// non-success status, a missing or ill-typed `tguList` field, or an
    /// empty candidate list. The registry is left untouched on failure.
    #[instrument(skip(self))]
    pub async fn resolve_gateway(&self) -> Result<GatewayHost, PayError> {
        if let Some(active) = self.config().active_gateway() {
            *self.base_url.write() = url::url_from_domain(&active.domain);
            return Ok(active);
        }

        let _guard = self.resolve_lock.lock().await;
        if let Some(active) = self.config().active_gateway() {
            *self.base_url.write() = url::url_from_domain(&active.domain);
            return Ok(active);
        }

        let discovery_url = format!(
            "{}{DISCOVERY_PATH}",
            self.config().api_url().trim_end_matches('/')
        );
        let token = self.config().encoded_token();

        let response = self
            .http
            .get(&discovery_url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, format!("Basic {token}"))
            .send()
            .await
            .map_err(|err| {
                tracing::error!(url = %discovery_url, error = %err, "gateway discovery failed");
                PayError::api(format!("gateway discovery request failed: {err}"))
            })?;

        if !response.status().is_success() {
            return Err(PayError::api(format!(
                "failed to fetch gateway configuration: HTTP {}",
                response.status().as_u16()
            )));
        }

        let data: Value = response.json().await.map_err(|err| {
            PayError::api(format!("gateway discovery returned an unreadable body: {err}"))
        })?;

        let Some(raw_list) = data.get("tguList") else {
            return Err(PayError::api("no gateway list in discovery response"));
        };
        if !raw_list.is_array() {
            return Err(PayError::api("gateway list is not an array"));
        }
        let mut list: Vec<GatewayHost> = serde_json::from_value(raw_list.clone())
            .map_err(|err| PayError::api(format!("gateway list is malformed: {err}")))?;
        if list.is_empty() {
            return Err(PayError::api("no gateway found in the gateway list"));
        }

        list.sort_by(|a, b| b.share.total_cmp(&a.share));
        let active = list
            .first()
            .cloned()
            .ok_or_else(|| PayError::api("no gateway found in the sorted gateway list"))?;

        self.config().install_gateways(list, active.clone());
        *self.base_url.write() = url::url_from_domain(&active.domain);
        tracing::info!(domain = %active.domain, share = active.share, "gateway resolved");
        Ok(active)
    }
}
