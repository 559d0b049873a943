//! HTTP API for the Quote Engine.
//!
//! This module exposes the pricing engine over a small REST API using
//! the [`axum`](https://crates.io/crates/axum) framework.  Clients
//! submit quote inputs and receive the priced calculation as JSON.
//! Requests are validated here, before they reach the engine.

use crate::engine::{calculate_quotes, price_request};
use crate::error::ApiResult;
use crate::legacy::{legacy_breakdown, LegacyBreakdown};
use crate::models::{QuoteCalculation, QuoteRequest};
use crate::rates::{load_rate_tables_from_dir, RateBook, RateTable, DEFAULT_TENANT};
use crate::setup::{setup_service_catalog, SetupServiceInfo};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state shared across requests.
pub struct AppState {
    pub rates: RwLock<RateBook>,
}

impl AppState {
    pub fn new(rates: RateBook) -> Arc<Self> {
        Arc::new(Self {
            rates: RwLock::new(rates),
        })
    }
}

/// Build the API router with tenant rate tables loaded from the given
/// directory.  Returns the router and a handle to the state.
pub fn build_router(rate_table_dir: &FsPath) -> Result<(Router, Arc<AppState>)> {
    let tables = load_rate_tables_from_dir(rate_table_dir)?;
    let book = RateBook::from_tables(tables);
    tracing::info!(tenants = book.len(), "Loaded tenant rate tables");
    let state = AppState::new(book);
    Ok((router(state.clone()), state))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/quotes/calculate", post(calculate_handler))
        .route("/api/quotes/calculate/batch", post(calculate_batch_handler))
        .route("/api/quotes/legacy", post(legacy_handler))
        .route("/api/rates/:tenant", get(rates_handler))
        .route("/api/setup-services", get(setup_services_handler))
        .with_state(state)
}

/// Handler for POST /api/quotes/calculate
async fn calculate_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<QuoteRequest>,
) -> ApiResult<Json<QuoteCalculation>> {
    request.validate()?;
    tracing::info!(
        company = %request.customer.company_name,
        tenant = request.tenant.as_deref().unwrap_or(DEFAULT_TENANT),
        "Pricing quote"
    );
    let rates = app_state.rates.read().await;
    Ok(Json(price_request(request, &rates)))
}

/// Handler for POST /api/quotes/calculate/batch
async fn calculate_batch_handler(
    State(app_state): State<Arc<AppState>>,
    Json(requests): Json<Vec<QuoteRequest>>,
) -> ApiResult<Json<Vec<QuoteCalculation>>> {
    tracing::info!(count = requests.len(), "Pricing quote batch");
    // Snapshot the rates so the rayon pool never holds the lock.
    let rates = app_state.rates.read().await.clone();
    let results = tokio::task::spawn_blocking(move || calculate_quotes(requests, &rates))
        .await
        .context("quote batch task failed")??;
    Ok(Json(results))
}

/// Handler for POST /api/quotes/legacy
async fn legacy_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<QuoteRequest>,
) -> ApiResult<Json<LegacyBreakdown>> {
    request.validate()?;
    let rates = app_state.rates.read().await;
    let table = rates.resolve(request.tenant.as_deref());
    let labor = request.labor_rates.unwrap_or(table.labor);
    Ok(Json(legacy_breakdown(
        &request.service_categories,
        &request.customer,
        &labor,
        table,
    )))
}

/// Handler for GET /api/rates/:tenant
async fn rates_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tenant): Path<String>,
) -> Json<RateTable> {
    let rates = app_state.rates.read().await;
    Json(rates.resolve(Some(tenant.as_str())).clone())
}

/// Handler for GET /api/setup-services
async fn setup_services_handler() -> Json<Vec<SetupServiceInfo>> {
    Json(setup_service_catalog())
}

/// Launch the API server.  Blocks until the server terminates.
pub async fn serve(addr: SocketAddr, rate_table_dir: &FsPath) -> Result<()> {
    let (router, _state) = build_router(rate_table_dir)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, router).await.context("server error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let mut acme = RateTable::defaults("acme");
        acme.labor.level2.business_hours_price = 200.0;
        router(AppState::new(RateBook::from_tables([acme])))
    }

    fn quote_body(workstations: u32, contract_months: u32) -> Value {
        json!({
            "customer": {
                "companyName": "Acme Dental",
                "contractMonths": contract_months,
                "contractType": "managed",
                "fullUsers": 12,
                "workstations": workstations,
                "servers": 2
            },
            "setupServices": [
                {"id": "standard-onboarding", "name": "Onboarding", "isActive": true, "skillLevel": 2}
            ],
            "monthlyServices": {
                "fixedCostTools": [
                    {"id": "ncentral", "name": "N-central", "isActive": true, "extendedPrice": 150.0}
                ],
                "variableCostTools": [
                    {"id": "m365", "name": "M365", "isActive": false, "extendedPrice": 300.0}
                ]
            }
        })
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_calculate_quote() {
        let (status, body) = send(app(), "POST", "/api/quotes/calculate", Some(quote_body(10, 24))).await;
        assert_eq!(status, StatusCode::OK);
        let totals = &body["totals"];
        assert_eq!(totals["setupCosts"], json!(7213.15));
        assert_eq!(totals["toolsSoftware"], json!(150.0));
        assert_eq!(totals["monthlyTotal"], json!(150.0));
        assert_eq!(totals["contractTotal"], json!(150.0 * 24.0 + 7213.15));
        assert_eq!(totals["haas"], json!(0.0));
    }

    #[tokio::test]
    async fn test_calculate_uses_tenant_rates() {
        let mut body = quote_body(10, 12);
        body["tenant"] = json!("acme");
        let (status, body) = send(app(), "POST", "/api/quotes/calculate", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totals"]["setupCosts"], json!(7798.0));
    }

    #[tokio::test]
    async fn test_calculate_rejects_zero_months() {
        let (status, body) = send(app(), "POST", "/api/quotes/calculate", Some(quote_body(10, 0))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("INVALID_INPUT"));
    }

    #[tokio::test]
    async fn test_calculate_rejects_malformed_body() {
        let body = json!({"customer": {"companyName": "Acme"}});
        let (status, _) = send(app(), "POST", "/api/quotes/calculate", Some(body)).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_batch() {
        let batch = json!([quote_body(10, 12), quote_body(20, 12)]);
        let (status, body) = send(app(), "POST", "/api/quotes/calculate/batch", Some(batch)).await;
        assert_eq!(status, StatusCode::OK);
        let results = body.as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1]["customer"]["workstations"], json!(20));

        let (status, _) = send(app(), "POST", "/api/quotes/calculate/batch", Some(json!([]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_legacy_breakdown() {
        let (status, body) = send(app(), "POST", "/api/quotes/legacy", Some(quote_body(10, 12))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["haas"], json!(450.0));
        assert_eq!(body["warranty"], json!(300.0));
        assert_eq!(body["toolsLicensing"], json!(180.0));
        assert_eq!(body["supportLabor"], json!(0.0));
    }

    #[tokio::test]
    async fn test_rates_lookup() {
        let (status, body) = send(app(), "GET", "/api/rates/acme", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["labor"]["level2"]["businessHoursPrice"], json!(200.0));

        let (_, body) = send(app(), "GET", "/api/rates/unknown", None).await;
        assert_eq!(body["tenant"], json!("default"));
    }

    #[tokio::test]
    async fn test_setup_services_catalog() {
        let (status, body) = send(app(), "GET", "/api/setup-services", None).await;
        assert_eq!(status, StatusCode::OK);
        let entry = body
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["id"] == "intune-onboarding")
            .cloned()
            .unwrap();
        assert_eq!(entry["baseHours"], json!(12.66));
        assert_eq!(entry["hoursPerWorkstation"], json!(0.22));
    }
}
