//! HTTP surface: one route per client operation, with a shared guard that
//! builds a session from the request's `config` object.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use pay_client::{Order, OrderCreate, PayClient, PayError, ServiceConfig};

const MISSING_CONFIG: &str = r#"Please provide serviceId and serviceSecret in a "config" object"#;

/// Error answered to the caller as `{"error": ...}` with a mapped status.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<PayError> for ApiError {
    fn from(err: PayError) -> Self {
        Self {
            status: StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({"error": self.message}))).into_response()
    }
}

/// Per-request session credentials, as sent by the caller.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionConfig {
    #[serde(default)]
    service_id: Option<String>,
    #[serde(default)]
    service_secret: Option<String>,
}

/// Build a client from the request's `config` object. Rejected before any
/// session exists when the object or either credential is missing or empty.
fn session(config: Option<SessionConfig>) -> Result<PayClient, ApiError> {
    let Some(config) = config else {
        return Err(ApiError::bad_request(MISSING_CONFIG));
    };
    let (Some(service_id), Some(service_secret)) = (config.service_id, config.service_secret)
    else {
        return Err(ApiError::bad_request(MISSING_CONFIG));
    };
    if service_id.trim().is_empty() || service_secret.trim().is_empty() {
        return Err(ApiError::bad_request(MISSING_CONFIG));
    }
    Ok(PayClient::new(service_id, service_secret)?)
}

pub fn router() -> axum::Router {
    axum::Router::new()
        .route("/health-check", get(health_check))
        .route("/service", post(service))
        .route("/order/status", post(order_status))
        .route("/order/create", post(order_create))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

#[derive(Debug, Deserialize)]
struct ServiceRequest {
    config: Option<SessionConfig>,
}

async fn service(Json(body): Json<ServiceRequest>) -> Result<Json<ServiceConfig>, ApiError> {
    let client = session(body.config)?;
    let config = client.services.get_config().await?;
    Ok(Json(config))
}

#[derive(Debug, Deserialize)]
struct OrderStatusRequest {
    config: Option<SessionConfig>,
    #[serde(default)]
    id: Option<String>,
}

async fn order_status(Json(body): Json<OrderStatusRequest>) -> Result<Json<Order>, ApiError> {
    let client = session(body.config)?;
    let id = body
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Please provide an order id"))?;
    let order = client.orders.status(&id).await?;
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
struct OrderCreateRequest {
    config: Option<SessionConfig>,
    order: Option<OrderCreate>,
}

async fn order_create(Json(body): Json<OrderCreateRequest>) -> Result<Json<Order>, ApiError> {
    let client = session(body.config)?;
    let order = body
        .order
        .ok_or_else(|| ApiError::bad_request("Please provide an order to create"))?;
    let created = client.orders.create(&order).await?;
    Ok(Json(created))
}
