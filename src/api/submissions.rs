//! Loan submission endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::SubmitLoanRequest, AppState};

/// Response for an accepted loan request
#[derive(Serialize, ToSchema)]
pub struct SubmissionResponse {
    /// Identifier assigned by the record store
    pub record_id: String,
    pub message: String,
}

/// Submit a new fuel-card loan request
#[utoipa::path(
    post,
    path = "/submissions",
    tag = "submissions",
    request_body = SubmitLoanRequest,
    responses(
        (status = 201, description = "Loan request registered", body = SubmissionResponse),
        (status = 400, description = "Missing required field, rules not accepted, or invalid value")
    )
)]
pub async fn submit_loan(
    State(state): State<AppState>,
    Json(request): Json<SubmitLoanRequest>,
) -> AppResult<(StatusCode, Json<SubmissionResponse>)> {
    let record_id = state.services.submissions.submit(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            record_id,
            message: "Loan request registered successfully".to_string(),
        }),
    ))
}
