//! Route handlers: health, list, lookup and registration of products.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use verifarm_storage::{NewProduct, StorageError};

use super::json_error;
use super::state::AppState;

const HEALTH_MESSAGE: &str = "VeriFarm API is running!";
const MISSING_FIELDS: &str = "Name, farm, and harvest date are required";
const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Body of POST /api/products. Fields other than these three are ignored.
///
/// Values of any JSON type are accepted; see [`field_text`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CreateProductRequest {
    name: Option<serde_json::Value>,
    farm: Option<serde_json::Value>,
    harvest_date: Option<serde_json::Value>,
}

impl CreateProductRequest {
    /// `None` when any field is absent or falsy.
    fn into_draft(self) -> Option<NewProduct> {
        Some(NewProduct::new(
            field_text(self.name)?,
            field_text(self.farm)?,
            field_text(self.harvest_date)?,
        ))
    }
}

/// Text stored for a request field, `None` for a falsy value
/// (`null`, `false`, `0`, `""`). Strings are kept as-is, other truthy
/// values are stored as their JSON text.
fn field_text(value: Option<serde_json::Value>) -> Option<String> {
    use serde_json::Value;

    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /api/health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "OK",
        "message": HEALTH_MESSAGE,
    });
    (StatusCode::OK, Json(response))
}

/// GET /api/products
pub(crate) async fn handle_list_products(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.store.list_products().await))
}

/// GET /api/products/{id}
pub(crate) async fn handle_get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.get_product(&id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(StorageError::ProductNotFound { .. }) => {
            json_error(StatusCode::NOT_FOUND, PRODUCT_NOT_FOUND).into_response()
        }
        Err(e) => {
            tracing::error!(%id, error = %e, "product lookup failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()).into_response()
        }
    }
}

/// POST /api/products
pub(crate) async fn handle_create_product(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Response {
    let draft = match body {
        Ok(Json(request)) => request.into_draft(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected product body");
            None
        }
    };
    let Some(draft) = draft else {
        return json_error(StatusCode::BAD_REQUEST, MISSING_FIELDS).into_response();
    };

    match state.store.register_product(draft).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to register product");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> CreateProductRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn complete_request_becomes_draft() {
        let draft = parse(r#"{"name":"Kale","farm":"Hill Farm","harvestDate":"2024-02-01","extra":1}"#)
            .into_draft()
            .unwrap();
        assert_eq!(draft, NewProduct::new("Kale", "Hill Farm", "2024-02-01"));
    }

    #[test]
    fn truthy_non_string_fields_are_stored_as_text() {
        let draft = parse(r#"{"name":5,"farm":true,"harvestDate":"2024-02-01"}"#)
            .into_draft()
            .unwrap();
        assert_eq!(draft, NewProduct::new("5", "true", "2024-02-01"));
    }

    #[test]
    fn falsy_non_string_fields_are_rejected() {
        assert!(parse(r#"{"name":0,"farm":"Hill Farm","harvestDate":"2024-02-01"}"#)
            .into_draft()
            .is_none());
        assert!(parse(r#"{"name":"Kale","farm":false,"harvestDate":"2024-02-01"}"#)
            .into_draft()
            .is_none());
        assert!(parse(r#"{"name":"Kale","farm":"Hill Farm","harvestDate":null}"#)
            .into_draft()
            .is_none());
    }

    #[test]
    fn missing_or_empty_fields_are_rejected() {
        assert!(parse(r#"{"name":"Kale"}"#).into_draft().is_none());
        assert!(parse(r#"{"name":"Kale","farm":"","harvestDate":"2024-02-01"}"#)
            .into_draft()
            .is_none());
        assert!(parse("{}").into_draft().is_none());
    }
}
