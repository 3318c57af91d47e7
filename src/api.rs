// Customer Ledger - REST API with Axum
//
// Every identity-scoped handler resolves the customer from the `id` header
// first and answers 404 before touching anything else.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use log::{error, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::entities::{Customer, CustomerRegistry, StatementEntry};
use crate::error::LedgerError;

/// Header carrying the caller's customer id
pub const CUSTOMER_ID_HEADER: &str = "id";

// ============================================================================
// STATE
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    registry: Arc<Mutex<CustomerRegistry>>,
}

impl AppState {
    pub fn new(registry: CustomerRegistry) -> Self {
        AppState {
            registry: Arc::new(Mutex::new(registry)),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        if config.empty {
            Self::new(CustomerRegistry::new())
        } else {
            Self::new(CustomerRegistry::seeded())
        }
    }

    /// Lock the registry for the duration of one request
    fn registry(&self) -> Result<MutexGuard<'_, CustomerRegistry>, ApiError> {
        self.registry
            .lock()
            .map_err(|_| ApiError::RegistryUnavailable)
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A handler panicked while holding the registry lock
    #[error("Customer registry unavailable")]
    RegistryUnavailable,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Ledger(LedgerError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Ledger(LedgerError::DuplicateTaxId(_))
            | ApiError::Ledger(LedgerError::InsufficientFunds { .. })
            | ApiError::Ledger(LedgerError::InvalidAmount(_))
            | ApiError::Ledger(LedgerError::Overflow) => StatusCode::BAD_REQUEST,
            ApiError::RegistryUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!("{} {}", status, message);
        } else {
            warn!("{} {} ({:?})", status, message, self);
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// REQUEST / RESPONSE BODIES
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(alias = "cpf")]
    pub tax_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub name: String,
}

/// Body of both /deposit and /withdraw
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

// ============================================================================
// API Handlers
// ============================================================================

/// Customer id from the request headers; a missing header is an unknown id
fn customer_id(headers: &HeaderMap) -> Result<&str, LedgerError> {
    headers
        .get(CUSTOMER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(LedgerError::NotFound)
}

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /account - Open an account
async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let mut registry = state.registry()?;
    let customer = registry.create(request.tax_id, request.name)?.clone();

    info!("Account created: {} (tax id {})", customer.id(), customer.tax_id());
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /account - Customer details
async fn get_account(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Customer>> {
    let registry = state.registry()?;
    let customer = registry.find_by_id(customer_id(&headers)?)?;

    Ok(Json(customer.clone()))
}

/// PUT /account - Rename the customer
async fn update_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateAccountRequest>,
) -> ApiResult<Json<Customer>> {
    let mut registry = state.registry()?;
    let customer = registry.find_by_id_mut(customer_id(&headers)?)?;
    customer.update_name(request.name);

    Ok(Json(customer.clone()))
}

/// DELETE /account - Close the account and drop its statement
async fn delete_account(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let mut registry = state.registry()?;
    let removed = registry.delete(customer_id(&headers)?)?;

    info!("Account deleted: {}", removed.id());
    Ok(StatusCode::OK)
}

/// GET /statement - Full statement
async fn get_statement(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<StatementEntry>>> {
    let registry = state.registry()?;
    let customer = registry.find_by_id(customer_id(&headers)?)?;

    Ok(Json(customer.statement().to_vec()))
}

/// GET /statement/date?date=YYYY-MM-DD - Entries recorded on one day
async fn get_statement_by_date(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<Vec<StatementEntry>>> {
    let registry = state.registry()?;
    let customer = registry.find_by_id(customer_id(&headers)?)?;

    Ok(Json(customer.entries_on(query.date)))
}

/// POST /deposit - Credit the account
async fn deposit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<EntryRequest>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let mut registry = state.registry()?;
    let customer = registry.find_by_id_mut(customer_id(&headers)?)?;
    customer.deposit(request.description, request.amount)?;

    info!("Deposit of {} into {}", request.amount, customer.id());
    Ok((StatusCode::CREATED, Json(customer.clone())))
}

/// POST /withdraw - Debit the account if the balance covers it
async fn withdraw(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<EntryRequest>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let mut registry = state.registry()?;
    let customer = registry.find_by_id_mut(customer_id(&headers)?)?;
    customer.withdraw(request.description, request.amount)?;

    info!("Withdrawal of {} from {}", request.amount, customer.id());
    Ok((StatusCode::CREATED, Json(customer.clone())))
}

/// GET /balance - Current balance
async fn get_balance(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<BalanceResponse>> {
    let registry = state.registry()?;
    let customer = registry.find_by_id(customer_id(&headers)?)?;

    Ok(Json(BalanceResponse {
        balance: customer.balance()?,
    }))
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router over `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/account",
            post(create_account)
                .get(get_account)
                .put(update_account)
                .delete(delete_account),
        )
        .route("/statement", get(get_statement))
        .route("/statement/date", get(get_statement_by_date))
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
        .route("/balance", get(get_balance))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================
