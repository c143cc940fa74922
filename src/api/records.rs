//! Records view endpoints (gated by the access key)

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::{LoanStatus, RecordRow},
    services::records::{RecordEdit, RecordFilter, SaveReport},
    AppState,
};

use super::RecordsAccess;

/// Loan rules shown to requesters before they submit
pub const LOAN_RULES: &str = "\
RULES FOR BORROWING AND USING FUEL CARDS:
1. Borrowing a fuel card requires approval from the requester's manager and the fleet workshop lead.
2. All private use is strictly FORBIDDEN.
3. Fuel cards may only be used at approved fuel stations.
4. Card usage must be tied to a vehicle plate and a loan period.
5. For cards not linked to a fleet plate, fuel expenses must be proven with station receipts.
6. If a card is lost or stolen, file a police report immediately and notify the fleet card owner.
7. The loan period must not exceed 30 days for cards not linked to fleet plates.
8. Correct use of the card is the requester's full responsibility; expenses unrelated to company projects will be charged back.
9. The card must be returned immediately after the loan period ends.
10. Use responsibly - refuelling activity is monitored.";

/// Query filters for the records table
#[derive(Debug, Deserialize, IntoParams)]
pub struct RecordsQuery {
    /// Substring filter on requester name
    pub name: Option<String>,
    /// Substring filter on vehicle identification
    pub vehicle: Option<String>,
    /// Comma-separated status names (open, overdue, returned)
    pub status: Option<String>,
}

impl RecordsQuery {
    fn into_filter(self) -> AppResult<RecordFilter> {
        let statuses = match self.status.as_deref() {
            None | Some("") => None,
            Some(list) => {
                let mut parsed = Vec::new();
                for part in list.split(',').filter(|p| !p.trim().is_empty()) {
                    let status = LoanStatus::parse(part).ok_or_else(|| {
                        AppError::Validation(format!("Unknown status filter: {}", part.trim()))
                    })?;
                    parsed.push(status);
                }
                Some(parsed)
            }
        };

        Ok(RecordFilter {
            requester_name: self.name,
            vehicle_id: self.vehicle,
            statuses,
        })
    }
}

/// List loan records with derived status, optionally filtered
#[utoipa::path(
    get,
    path = "/records",
    tag = "records",
    params(RecordsQuery),
    security(("access_key" = [])),
    responses(
        (status = 200, description = "Filtered loan records", body = Vec<RecordRow>),
        (status = 401, description = "Missing or invalid access key")
    )
)]
pub async fn list_records(
    State(state): State<AppState>,
    RecordsAccess(session): RecordsAccess,
    Query(query): Query<RecordsQuery>,
) -> AppResult<Json<Vec<RecordRow>>> {
    let filter = query.into_filter()?;
    let rows = state.services.records.list_records(session, &filter).await?;
    Ok(Json(rows))
}

/// Edited record set to reconcile against the store
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReconcileRequest {
    pub rows: Vec<RecordEdit>,
}

/// Save the rows of an edited record set that changed.
///
/// Unchanged rows issue no store writes; rows without an id are inserted and
/// their new ids reported back; per-row failures appear in the report with
/// the rows left unsaved.
#[utoipa::path(
    post,
    path = "/records/reconcile",
    tag = "records",
    request_body = ReconcileRequest,
    security(("access_key" = [])),
    responses(
        (status = 200, description = "Reconcile report", body = SaveReport),
        (status = 401, description = "Missing or invalid access key")
    )
)]
pub async fn reconcile_records(
    State(state): State<AppState>,
    RecordsAccess(session): RecordsAccess,
    Json(request): Json<ReconcileRequest>,
) -> AppResult<Json<SaveReport>> {
    let report = state.services.records.reconcile(session, request.rows).await?;
    Ok(Json(report))
}

/// Loan rules text for the submission form
#[utoipa::path(
    get,
    path = "/rules",
    tag = "submissions",
    responses(
        (status = 200, description = "Loan rules text", body = String)
    )
)]
pub async fn loan_rules() -> &'static str {
    LOAN_RULES
}
