use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use federation_contact::{ContactRequest, RouteError};
use serde_json::{Value, json};

use crate::routes::{AppState, client_ip};

/// JSON rendition of a [`RouteError`]: `{error, message, errorCodes?}`.
pub struct ApiError(pub RouteError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self.0.body())).into_response()
    }
}

/// POST /api/contact - verifies the token and forwards the inquiry.
pub async fn contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    // unreadable bodies carry no usable field
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("rejected contact payload: {rejection}");
        ApiError(RouteError::MissingFields)
    })?;

    state
        .contact
        .receive(request, client_ip(&headers).as_deref())
        .await
        .map_err(ApiError)?;

    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully"
    })))
}
