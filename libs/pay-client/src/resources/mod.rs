//! Resource clients: thin pass-through callers of the networking core.
//!
//! Each resource wires a [`NetworkClient`](crate::net::NetworkClient) with
//! its fixed API version and resource path at construction and forwards
//! bodies untouched; all orchestration lives in the core.

pub mod orders;
pub mod services;

pub use orders::{
    Address, Amount, Company, Customer, Integration, Notification, Order, OrderCreate,
    OrderDetails, OrderStatus, OrdersClient, Product, ProductQuantity, Stats,
};
pub use services::{ServiceConfig, ServicesClient};
