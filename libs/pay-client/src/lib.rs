//! Typed client for the Pay payment API.
//!
//! The crate is built around a small networking core that resolves the
//! gateway host dynamically and dispatches JSON requests, with thin typed
//! resource clients layered on top:
//!
//! - [`PayClient`] — session entry point; owns the shared [`Config`],
//!   transport, and diagnostic observer.
//! - [`OrdersClient`] — order lifecycle (v1, gateway-dependent).
//! - [`ServicesClient`] — service configuration (v2, direct).
//!
//! ```no_run
//! use pay_client::{Amount, OrderCreate, PayClient};
//!
//! # async fn run() -> Result<(), pay_client::PayError> {
//! let client = PayClient::new("SL-1234-5678", "secret")?;
//! let order = client
//!     .orders
//!     .create(&OrderCreate::new(Amount::new(100)))
//!     .await?;
//! let status = client.orders.status(&order.id).await?;
//! println!("{:?}", status.status.code);
//! # Ok(())
//! # }
//! ```
//!
//! Every failure surfaces as a [`PayError`]; non-fatal conditions are
//! reported through an injectable [`DiagnosticObserver`].

mod client;
mod config;
mod diagnostics;
mod error;
mod net;
mod resources;

pub use client::{PayClient, PayClientBuilder};
pub use config::{Config, DEFAULT_API_URL, GatewayHost};
pub use diagnostics::{Diagnostic, DiagnosticObserver, ObserverHandle, TracingObserver};
pub use error::{ErrorEnvelope, ErrorKind, PayError};
pub use net::NetworkClient;
pub use resources::{
    Address, Amount, Company, Customer, Integration, Notification, Order, OrderCreate,
    OrderDetails, OrderStatus, OrdersClient, Product, ProductQuantity, ServiceConfig,
    ServicesClient, Stats,
};
