use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response;
use crate::api::validation::Validate;
use crate::model::{ContactId, ContactPayload, CreatedContact, PageQuery, PageRequest};
use crate::store::traits::ContactStore;

pub type AppState<S> = Arc<S>;

/// Simple health check endpoint. Never touches the store.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "API is healthy".to_string(),
    })
}

fn parse_contact_id(raw: &str) -> ApiResult<ContactId> {
    raw.parse::<ContactId>()
        .map_err(|_| ApiError::BadRequest("Invalid contact ID"))
}

/// Decode and validate a contact body. The `Content-Type` header is not
/// checked; only the bytes have to be a JSON contact.
fn accept_payload(body: &[u8]) -> ApiResult<ContactPayload> {
    let payload: ContactPayload = serde_json::from_slice(body).map_err(|err| {
        log::debug!("Rejected contact payload: {}", err);
        ApiError::BadRequest("Invalid request payload")
    })?;

    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::ValidationFailed(errors));
    }

    Ok(payload)
}

pub async fn list_contacts_page<S: ContactStore>(
    State(store): State<AppState<S>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Response> {
    // Malformed query strings fall back to the first page
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let page = PageRequest::from_query(&query);

    let (contacts, total) = store
        .list_contacts_page(page)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch contacts"))?;

    Ok(response::paginated(
        contacts,
        page.meta(total),
        "Contacts retrieved successfully",
        StatusCode::OK,
    ))
}

pub async fn list_all_contacts<S: ContactStore>(
    State(store): State<AppState<S>>,
) -> ApiResult<Response> {
    let contacts = store
        .list_contacts()
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch contacts"))?;

    Ok(response::success(
        Some(contacts),
        "Contacts retrieved successfully",
        StatusCode::OK,
    ))
}

pub async fn get_contact<S: ContactStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_contact_id(&id)?;

    let contact = store
        .get_contact(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch contact"))?;

    Ok(response::success(
        Some(contact),
        "Contact retrieved successfully",
        StatusCode::OK,
    ))
}

pub async fn create_contact<S: ContactStore>(
    State(store): State<AppState<S>>,
    body: Bytes,
) -> ApiResult<Response> {
    let payload = accept_payload(&body)?;

    // Cheap early answer for the common case; the insert below still maps
    // a unique violation to a conflict when two creates race.
    let exists = store
        .email_exists(&payload.email)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to check existing contact"))?;
    if exists {
        return Err(ApiError::Conflict("Email already exists"));
    }

    let id = store
        .create_contact(&payload)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to create contact"))?;

    log::info!("Created contact {}", id);

    Ok(response::success(
        Some(CreatedContact { id }),
        "Contact created successfully",
        StatusCode::CREATED,
    ))
}

pub async fn update_contact<S: ContactStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    let id = parse_contact_id(&id)?;
    let payload = accept_payload(&body)?;

    store
        .update_contact(id, &payload)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to update contact"))?;

    Ok(response::success::<()>(
        None,
        "Contact updated successfully",
        StatusCode::OK,
    ))
}

pub async fn delete_contact<S: ContactStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_contact_id(&id)?;

    store
        .delete_contact(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete contact"))?;

    log::info!("Deleted contact {}", id);

    Ok(response::success::<()>(
        None,
        "Contact deleted successfully",
        StatusCode::OK,
    ))
}

pub async fn route_not_found() -> Response {
    response::error("Route not found", StatusCode::NOT_FOUND)
}

pub async fn method_not_allowed() -> Response {
    response::error("Method not allowed", StatusCode::METHOD_NOT_ALLOWED)
}
