//! Records view service: the load / filter / edit / diff / save loop
//!
//! Loading normalizes every date through the canonical representation and
//! derives each record's status against a single "today" captured at the
//! start of the batch. Saving diffs each edited row against a fresh store
//! snapshot on the canonical form (never on display strings) and only writes
//! rows whose editable content actually changed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dates::{self, RawDate},
    error::{AppError, AppResult},
    models::{
        record::{LoanRecord, StoredRecord},
        LoanStatus, RecordRow,
    },
    store::RecordStore,
};

use super::Session;

/// Optional filters for the records view. Empty values are no-ops; all
/// matching is case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Substring match on requester name
    pub requester_name: Option<String>,
    /// Substring match on vehicle identification
    pub vehicle_id: Option<String>,
    /// Set membership on derived status
    pub statuses: Option<Vec<LoanStatus>>,
}

impl RecordFilter {
    fn matches(&self, record: &LoanRecord) -> bool {
        if let Some(name) = self.requester_name.as_deref() {
            let needle = name.trim().to_lowercase();
            if !needle.is_empty() && !record.requester_name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(vehicle) = self.vehicle_id.as_deref() {
            let needle = vehicle.trim().to_lowercase();
            if !needle.is_empty() && !record.vehicle_id.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(statuses) = &self.statuses {
            if !statuses.is_empty() && !statuses.contains(&record.status) {
                return false;
            }
        }
        true
    }
}

/// One edited row coming back from the records table. Dates are in display
/// form (`DD/MM/YYYY`, empty for none). `status` and `registered_at` are not
/// part of the editable surface: status is always recomputed and the
/// registration timestamp is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordEdit {
    /// Store key; absent for a row added in the editor
    #[serde(default)]
    pub record_id: Option<String>,
    pub requester_name: String,
    pub requester_email: String,
    pub requester_id: String,
    pub department: String,
    pub cost_center: String,
    pub requester_phone: String,
    pub supervisor_name: String,
    pub supervisor_email: String,
    pub reason: String,
    pub vehicle_id: String,
    #[serde(default)]
    pub card_id: String,
    #[serde(default)]
    pub expected_return_date: String,
    #[serde(default)]
    pub actual_return_date: String,
}

/// A row whose persistence failed, left unsaved for the caller to retry
#[derive(Debug, Serialize, ToSchema)]
pub struct FailedRow {
    pub record_id: Option<String>,
    pub error: String,
}

/// Outcome of a reconcile pass
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct SaveReport {
    /// Ids of existing records that were rewritten
    pub updated: Vec<String>,
    /// Ids newly assigned to rows that had none
    pub inserted: Vec<String>,
    /// Rows whose editable content matched the store; no write issued
    pub unchanged: usize,
    /// Rows that could not be persisted
    pub failed: Vec<FailedRow>,
}

#[derive(Clone)]
pub struct RecordsService {
    store: Arc<dyn RecordStore>,
}

impl RecordsService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn ensure_authenticated(session: Session) -> AppResult<()> {
        if session.authenticated {
            Ok(())
        } else {
            Err(AppError::Authentication(
                "Records view requires an authenticated session".to_string(),
            ))
        }
    }

    /// Filtered, display-formatted records with derived status
    pub async fn list_records(
        &self,
        session: Session,
        filter: &RecordFilter,
    ) -> AppResult<Vec<RecordRow>> {
        Self::ensure_authenticated(session)?;
        let today = Utc::now().date_naive();
        let records = self.load(today).await?;
        Ok(records
            .iter()
            .filter(|r| filter.matches(r))
            .map(RecordRow::from)
            .collect())
    }

    /// Load the full record set in canonical form, status derived as of `today`
    pub(crate) async fn load(&self, today: NaiveDate) -> AppResult<Vec<LoanRecord>> {
        let raw = self.store.list_all().await?;
        Ok(raw
            .iter()
            .map(|(id, stored)| LoanRecord::from_stored(id.clone(), stored, today))
            .collect())
    }

    /// Persist the rows of an edited record set that actually changed.
    ///
    /// Each edit is diffed against a fresh store snapshot on the canonical
    /// representation. Changed rows with an id are upserted; rows without one
    /// are inserted and their new id reported back. Rows absent from the edit
    /// set are left untouched (no deletion semantics). Per-row failures go
    /// into the report instead of aborting the batch.
    pub async fn reconcile(
        &self,
        session: Session,
        edits: Vec<RecordEdit>,
    ) -> AppResult<SaveReport> {
        Self::ensure_authenticated(session)?;

        let now = Utc::now();
        let today = now.date_naive();
        let snapshot: HashMap<String, LoanRecord> = self
            .load(today)
            .await?
            .into_iter()
            .map(|r| (r.record_id.clone(), r))
            .collect();

        let mut report = SaveReport::default();

        for edit in &edits {
            match edit.record_id.as_deref().filter(|id| !id.is_empty()) {
                Some(id) => {
                    let (registered_at, agreed) = match snapshot.get(id) {
                        Some(prev) => (prev.registered_at, prev.agreed_to_rules),
                        // Stale id: let the backend decide whether to accept it
                        None => (now, true),
                    };
                    let candidate = stored_from_edit(edit, registered_at, agreed);

                    if let Some(prev) = snapshot.get(id) {
                        if candidate == prev.to_stored() {
                            report.unchanged += 1;
                            continue;
                        }
                    }

                    match self.store.upsert(id, &candidate).await {
                        Ok(()) => report.updated.push(id.to_string()),
                        Err(e) => {
                            tracing::warn!(record_id = %id, error = %e, "Row save failed");
                            report.failed.push(FailedRow {
                                record_id: Some(id.to_string()),
                                error: e.to_string(),
                            });
                        }
                    }
                }
                None => {
                    let candidate = stored_from_edit(edit, now, true);
                    match self.store.insert(&candidate).await {
                        Ok(new_id) => report.inserted.push(new_id),
                        Err(e) => {
                            tracing::warn!(error = %e, "New row save failed");
                            report.failed.push(FailedRow {
                                record_id: None,
                                error: e.to_string(),
                            });
                        }
                    }
                }
            }
        }

        tracing::info!(
            updated = report.updated.len(),
            inserted = report.inserted.len(),
            unchanged = report.unchanged,
            failed = report.failed.len(),
            "Reconcile pass finished"
        );

        Ok(report)
    }
}

/// Canonicalize an edited row into the store shape
fn stored_from_edit(
    edit: &RecordEdit,
    registered_at: chrono::DateTime<Utc>,
    agreed_to_rules: bool,
) -> StoredRecord {
    StoredRecord {
        requester_name: edit.requester_name.clone(),
        requester_email: edit.requester_email.clone(),
        requester_id: edit.requester_id.clone(),
        department: edit.department.clone(),
        cost_center: edit.cost_center.clone(),
        requester_phone: edit.requester_phone.clone(),
        supervisor_name: edit.supervisor_name.clone(),
        supervisor_email: edit.supervisor_email.clone(),
        reason: edit.reason.clone(),
        vehicle_id: edit.vehicle_id.clone(),
        agreed_to_rules,
        expected_return_date: RawDate::from(dates::parse_display(&edit.expected_return_date)),
        actual_return_date: RawDate::from(dates::parse_display(&edit.actual_return_date)),
        registered_at,
        card_id: edit.card_id.clone(),
    }
}
