//! Access-gate endpoint for the records view

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Unlock request carrying the shared secret
#[derive(Deserialize, ToSchema)]
pub struct UnlockRequest {
    pub access_key: String,
}

#[derive(Serialize, ToSchema)]
pub struct UnlockResponse {
    pub authorized: bool,
    pub message: String,
}

/// Check the records-view shared secret.
///
/// Lets the form UI verify the key before showing the records table. The key
/// itself must still accompany every gated request in the `X-Access-Key`
/// header.
#[utoipa::path(
    post,
    path = "/auth/unlock",
    tag = "auth",
    request_body = UnlockRequest,
    responses(
        (status = 200, description = "Access authorized", body = UnlockResponse),
        (status = 401, description = "Wrong access key")
    )
)]
pub async fn unlock(
    State(state): State<AppState>,
    Json(request): Json<UnlockRequest>,
) -> AppResult<Json<UnlockResponse>> {
    if request.access_key != state.config.auth.access_key {
        return Err(AppError::Authentication("Wrong access key".to_string()));
    }

    Ok(Json(UnlockResponse {
        authorized: true,
        message: "Access authorized".to_string(),
    }))
}
