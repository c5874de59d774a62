//! Structured diagnostic events.
//!
//! The client never writes warnings to a global side channel; events are
//! emitted through an injectable [`DiagnosticObserver`], and suppression is
//! a property of the observer rather than a process-wide constant.

use std::sync::Arc;

use crate::config::Config;

/// A non-fatal condition worth surfacing to the integrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A gateway was set manually while dynamic switching is enabled; the
    /// next discovery would override the manual choice.
    DynamicGatewayOverride,
    /// The requested override domain is not in the installed gateway list.
    GatewayNotInList { domain: String },
    /// A gateway override was attempted before any list was installed.
    GatewayListNotSet,
}

impl Diagnostic {
    /// Human-readable message for this event.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::DynamicGatewayOverride => {
                "the client is configured with dynamic gateway switching; disable the \
                 dynamicGateway flag before setting a gateway manually"
                    .to_owned()
            }
            Self::GatewayNotInList { domain } => {
                format!("gateway '{domain}' is not in the list of available gateways")
            }
            Self::GatewayListNotSet => {
                "the gateway list is not set; it is populated by service discovery or the \
                 service config call"
                    .to_owned()
            }
        }
    }
}

/// Sink for [`Diagnostic`] events.
///
/// Implementations must be cheap and non-blocking; they are called from the
/// request path.
pub trait DiagnosticObserver: Send + Sync {
    fn emit(&self, event: &Diagnostic);
}

/// Default observer: logs each event through `tracing::warn!`.
///
/// Suppression is read live from the session's `suppress_warnings` flag,
/// so toggling the flag after construction takes effect immediately.
#[derive(Debug)]
pub struct TracingObserver {
    config: Config,
}

impl TracingObserver {
    /// Create an observer bound to a session configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn suppressed(&self) -> bool {
        self.config.suppress_warnings()
    }
}

impl DiagnosticObserver for TracingObserver {
    fn emit(&self, event: &Diagnostic) {
        if self.suppressed() {
            return;
        }
        tracing::warn!(event = ?event, "{}", event.message());
    }
}

/// Shared observer handle used throughout the client.
pub type ObserverHandle = Arc<dyn DiagnosticObserver>;
