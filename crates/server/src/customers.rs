//! Customer CRUD endpoints.
//!
//! - `POST   /customers`        — create; defaults `lastPurchaseDate` server-side
//! - `GET    /customers`        — full list, or `?name=` / `?email=` searches
//! - `GET    /customers/{id}`   — fetch one, 404 when absent
//! - `PUT    /customers/{id}`   — full-replace update, 404 when absent
//! - `DELETE /customers/{id}`   — 204 always, missing ids included
//!
//! Every response body carrying a customer is a [`CustomerProfile`], so the
//! derived tier rides along on every read path.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use clientele_core::domain::customer::{CustomerDraft, CustomerId, CustomerProfile};

use crate::service::{CustomerService, ServiceError};

#[derive(Debug, serde::Serialize)]
pub struct ApiError {
    pub error: String,
}

type ErrorResponse = (StatusCode, Json<ApiError>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ErrorResponse {
    (status, Json(ApiError { error: message.into() }))
}

fn map_service_error(error: ServiceError) -> ErrorResponse {
    match error {
        ServiceError::EmptyQuery => api_error(StatusCode::BAD_REQUEST, error.to_string()),
        ServiceError::DuplicateEmail(_) => api_error(StatusCode::CONFLICT, error.to_string()),
        ServiceError::Repository(inner) => {
            error!(event_name = "customers.repository_failure", error = %inner, "customer store operation failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "customer store unavailable")
        }
    }
}

/// Structural checks the original enforced via validation annotations: a blank
/// name or a blank/implausible email never reaches the service layer.
fn validate_draft(draft: &CustomerDraft) -> Result<(), ErrorResponse> {
    if draft.name.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "name is required"));
    }
    if draft.email.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "email is required"));
    }
    if !plausible_email(&draft.email) {
        return Err(api_error(StatusCode::BAD_REQUEST, "email should be valid"));
    }
    Ok(())
}

fn plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.starts_with('.') && domain.contains('.')
        }
        None => false,
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    name: Option<String>,
    email: Option<String>,
}

pub fn router(service: CustomerService) -> Router {
    Router::new()
        .route("/customers", post(create_customer).get(search_customers))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .with_state(service)
}

async fn create_customer(
    State(service): State<CustomerService>,
    Json(draft): Json<CustomerDraft>,
) -> Result<(StatusCode, Json<CustomerProfile>), ErrorResponse> {
    validate_draft(&draft)?;
    let profile = service.create(draft).await.map_err(map_service_error)?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// `GET /customers` serves three shapes from one route: a `name` search, an
/// `email` search, or the full listing when neither parameter is present. A
/// parameter that is present but blank is a caller error, distinct from a
/// well-formed search with no matches.
async fn search_customers(
    State(service): State<CustomerService>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CustomerProfile>>, ErrorResponse> {
    let profiles = match (query.name, query.email) {
        (Some(name), _) => service.find_by_name(&name).await.map_err(map_service_error)?,
        (None, Some(email)) => {
            let found = service.find_by_email(&email).await.map_err(map_service_error)?;
            found.into_iter().collect()
        }
        (None, None) => service.list().await.map_err(map_service_error)?,
    };

    Ok(Json(profiles))
}

async fn get_customer(
    State(service): State<CustomerService>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerProfile>, ErrorResponse> {
    let profile = service.get(&CustomerId(id)).await.map_err(map_service_error)?;
    match profile {
        Some(profile) => Ok(Json(profile)),
        None => Err(api_error(StatusCode::NOT_FOUND, "customer not found")),
    }
}

async fn update_customer(
    State(service): State<CustomerService>,
    Path(id): Path<Uuid>,
    Json(draft): Json<CustomerDraft>,
) -> Result<Json<CustomerProfile>, ErrorResponse> {
    validate_draft(&draft)?;
    let updated = service.update(&CustomerId(id), draft).await.map_err(map_service_error)?;
    match updated {
        Some(profile) => Ok(Json(profile)),
        None => Err(api_error(StatusCode::NOT_FOUND, "customer not found")),
    }
}

/// Idempotent by contract: deleting an id that never existed is still 204.
async fn delete_customer(
    State(service): State<CustomerService>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ErrorResponse> {
    service.delete(&CustomerId(id)).await.map_err(map_service_error)?;
    Ok(StatusCode::NO_CONTENT)
}
