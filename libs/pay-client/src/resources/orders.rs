//! Orders resource: order lifecycle operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::PayError;
use crate::net::NetworkClient;

/// A monetary amount in minor units with an optional ISO currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amount {
    pub value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Amount {
    /// Amount in minor units without an explicit currency.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self {
            value,
            currency: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coc_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ga_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_number_extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotor_id: Option<i64>,
}

/// Details for creating a new order. Only `amount` is required; everything
/// else is omitted from the wire when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration: Option<Integration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_data: Option<Value>,
}

impl OrderCreate {
    /// New order with the given amount and no optional fields.
    #[must_use]
    pub fn new(amount: Amount) -> Self {
        Self {
            amount,
            description: None,
            reference: None,
            expire: None,
            return_url: None,
            exchange_url: None,
            payment_method: None,
            integration: None,
            optimize: None,
            customer: None,
            order: None,
            notification: None,
            stats: None,
            transfer_data: None,
        }
    }
}

/// An order as returned by the remote API. Fields the various lifecycle
/// endpoints may omit are optional; payments and links are kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub authorized_amount: Option<Amount>,
    #[serde(default)]
    pub captured_amount: Option<Amount>,
    #[serde(default)]
    pub integration: Option<Integration>,
    #[serde(default)]
    pub payments: Vec<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub links: Option<Value>,
}

/// One product line to capture from an order with an active reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuantity {
    pub id: String,
    pub quantity: i64,
}

/// Client for the Orders API: creating, capturing, approving and voiding
/// orders. Order calls are gateway-dependent; the first call on a fresh
/// session triggers gateway resolution.
pub struct OrdersClient {
    net: NetworkClient,
}

impl OrdersClient {
    pub(crate) fn new(config: Config, http: reqwest::Client) -> Self {
        let mut net = NetworkClient::with_http(config, http);
        net.set_version("v1");
        net.set_resource("orders");
        net.set_requires_gateway(true);
        Self { net }
    }

    /// Access the underlying networking client.
    #[must_use]
    pub fn network(&self) -> &NetworkClient {
        &self.net
    }

    fn require_id(id: &str) -> Result<(), PayError> {
        if id.trim().is_empty() {
            return Err(PayError::input("order id must not be empty"));
        }
        Ok(())
    }

    fn to_body<T: Serialize>(value: &T) -> Result<Value, PayError> {
        serde_json::to_value(value)
            .map_err(|err| PayError::input(format!("request body is not serializable: {err}")))
    }

    /// Retrieve the current status of an order, including its payment
    /// attempts.
    ///
    /// # Errors
    /// `Input` when the id is empty; otherwise dispatch errors.
    pub async fn status(&self, id: &str) -> Result<Order, PayError> {
        Self::require_id(id)?;
        self.net.get(&format!("{id}/status")).await
    }

    /// Create a new order.
    ///
    /// # Errors
    /// Dispatch errors; the transmitted body is stamped with the session's
    /// `serviceId`.
    pub async fn create(&self, order: &OrderCreate) -> Result<Order, PayError> {
        let body = Self::to_body(order)?;
        self.net.post("/", Some(body)).await
    }

    /// Capture a specific amount from an order with an active reservation.
    /// The reservation remains active afterwards.
    ///
    /// # Errors
    /// `Input` when the id is empty; otherwise dispatch errors.
    pub async fn capture_amount(&self, id: &str, amount: &Amount) -> Result<Order, PayError> {
        Self::require_id(id)?;
        let body = Self::to_body(&serde_json::json!({ "amount": amount }))?;
        self.net.patch(&format!("{id}/capture/amount"), Some(body)).await
    }

    /// Capture specific products from an order with an active reservation.
    ///
    /// # Errors
    /// `Input` when the id is empty; otherwise dispatch errors.
    pub async fn capture_products(
        &self,
        id: &str,
        products: &[ProductQuantity],
    ) -> Result<Order, PayError> {
        Self::require_id(id)?;
        let body = Self::to_body(&serde_json::json!({ "products": products }))?;
        self.net.patch(&format!("{id}/capture/products"), Some(body)).await
    }

    /// Capture the entire amount of an order with an active reservation.
    ///
    /// # Errors
    /// `Input` when the id is empty; otherwise dispatch errors.
    pub async fn capture(&self, id: &str) -> Result<Order, PayError> {
        Self::require_id(id)?;
        self.net.patch(&format!("{id}/capture"), None).await
    }

    /// Approve an order flagged for a risk check, continuing the regular
    /// order flow.
    ///
    /// # Errors
    /// `Input` when the id is empty; otherwise dispatch errors.
    pub async fn approve(&self, id: &str) -> Result<Order, PayError> {
        Self::require_id(id)?;
        self.net.patch(&format!("{id}/approve"), None).await
    }

    /// Decline an order flagged for a risk check, refunding its payments
    /// and halting further processing.
    ///
    /// # Errors
    /// `Input` when the id is empty; otherwise dispatch errors.
    pub async fn decline(&self, id: &str) -> Result<Order, PayError> {
        Self::require_id(id)?;
        self.net.patch(&format!("{id}/decline"), None).await
    }

    /// Cancel an order with an active reservation, voiding all payments
    /// made for it.
    ///
    /// # Errors
    /// `Input` when the id is empty; otherwise dispatch errors.
    pub async fn void(&self, id: &str) -> Result<Order, PayError> {
        Self::require_id(id)?;
        self.net.patch(&format!("{id}/void"), None).await
    }

    /// Abort an order, halting the order flow and voiding any payment
    /// attempts made to fulfill it.
    ///
    /// # Errors
    /// `Input` when the id is empty; otherwise dispatch errors.
    pub async fn abort(&self, id: &str) -> Result<Order, PayError> {
        Self::require_id(id)?;
        self.net.patch(&format!("{id}/abort"), None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn order_create_serializes_camel_case_and_skips_absent_fields() {
        let mut order = OrderCreate::new(Amount::new(100));
        order.return_url = Some("https://shop.example/return".to_owned());
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(
            value,
            json!({
                "amount": {"value": 100},
                "returnUrl": "https://shop.example/return",
            })
        );
    }

    #[test]
    fn order_parses_partial_response() {
        let order: Order = serde_json::from_value(json!({
            "id": "o-1",
            "serviceId": "S1",
            "status": {"code": 95, "action": "AUTHORIZE"},
            "amount": {"value": 100, "currency": "EUR"},
        }))
        .unwrap();
        assert_eq!(order.id, "o-1");
        assert_eq!(order.service_id.as_deref(), Some("S1"));
        assert_eq!(order.status.code, Some(95));
        assert!(order.payments.is_empty());
    }

    #[test]
    fn product_type_field_uses_wire_name() {
        let product = Product {
            kind: Some("ARTICLE".to_owned()),
            ..Product::default()
        };
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value, json!({"type": "ARTICLE"}));
    }
}
