//! Loan record model and derived status

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dates::{self, DateValue, RawDate};

/// Derived lifecycle state of a loan. Never persisted, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    Open,
    Overdue,
    Returned,
}

impl LoanStatus {
    /// Pure status derivation from the two return dates and a reference day.
    ///
    /// A returned card is `Returned` regardless of the expected date. An open
    /// loan is `Overdue` only strictly after the expected day; on the expected
    /// day itself it is still `Open`.
    pub fn derive(expected: DateValue, actual: DateValue, today: NaiveDate) -> Self {
        if !actual.is_missing() {
            return LoanStatus::Returned;
        }
        match expected.date() {
            Some(expected) if today > expected => LoanStatus::Overdue,
            _ => LoanStatus::Open,
        }
    }

    /// Case-insensitive parse used by the records filter
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Some(LoanStatus::Open),
            "overdue" => Some(LoanStatus::Overdue),
            "returned" => Some(LoanStatus::Returned),
            _ => None,
        }
    }
}

/// Loan record as the store backends see it: dates still in whatever
/// representation the backend uses, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
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
    pub agreed_to_rules: bool,
    #[serde(default = "raw_null")]
    pub expected_return_date: RawDate,
    #[serde(default = "raw_null")]
    pub actual_return_date: RawDate,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub card_id: String,
}

fn raw_null() -> RawDate {
    RawDate::Null
}

/// One loaded record in canonical form, with its store key and derived status
#[derive(Debug, Clone, PartialEq)]
pub struct LoanRecord {
    pub record_id: String,
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
    pub agreed_to_rules: bool,
    pub expected_return_date: DateValue,
    pub actual_return_date: DateValue,
    pub registered_at: DateTime<Utc>,
    pub card_id: String,
    pub status: LoanStatus,
}

impl LoanRecord {
    /// Normalize a stored record and derive its status as of `today`
    pub fn from_stored(record_id: String, stored: &StoredRecord, today: NaiveDate) -> Self {
        let expected = dates::to_storage(&stored.expected_return_date);
        let actual = dates::to_storage(&stored.actual_return_date);
        Self {
            record_id,
            requester_name: stored.requester_name.clone(),
            requester_email: stored.requester_email.clone(),
            requester_id: stored.requester_id.clone(),
            department: stored.department.clone(),
            cost_center: stored.cost_center.clone(),
            requester_phone: stored.requester_phone.clone(),
            supervisor_name: stored.supervisor_name.clone(),
            supervisor_email: stored.supervisor_email.clone(),
            reason: stored.reason.clone(),
            vehicle_id: stored.vehicle_id.clone(),
            agreed_to_rules: stored.agreed_to_rules,
            expected_return_date: expected,
            actual_return_date: actual,
            registered_at: stored.registered_at,
            card_id: stored.card_id.clone(),
            status: LoanStatus::derive(expected, actual, today),
        }
    }

    /// Back to the store shape, dates in canonical form
    pub fn to_stored(&self) -> StoredRecord {
        StoredRecord {
            requester_name: self.requester_name.clone(),
            requester_email: self.requester_email.clone(),
            requester_id: self.requester_id.clone(),
            department: self.department.clone(),
            cost_center: self.cost_center.clone(),
            requester_phone: self.requester_phone.clone(),
            supervisor_name: self.supervisor_name.clone(),
            supervisor_email: self.supervisor_email.clone(),
            reason: self.reason.clone(),
            vehicle_id: self.vehicle_id.clone(),
            agreed_to_rules: self.agreed_to_rules,
            expected_return_date: RawDate::from(self.expected_return_date),
            actual_return_date: RawDate::from(self.actual_return_date),
            registered_at: self.registered_at,
            card_id: self.card_id.clone(),
        }
    }
}

/// Display-formatted row for the records table. Dates are in `DD/MM/YYYY`
/// form; `status` is read-only for the editor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordRow {
    pub record_id: String,
    pub status: LoanStatus,
    pub expected_return_date: String,
    pub actual_return_date: String,
    pub requester_name: String,
    pub requester_email: String,
    pub department: String,
    pub requester_id: String,
    pub cost_center: String,
    pub requester_phone: String,
    pub supervisor_name: String,
    pub supervisor_email: String,
    pub reason: String,
    pub vehicle_id: String,
    pub card_id: String,
    pub registered_at: DateTime<Utc>,
}

impl From<&LoanRecord> for RecordRow {
    fn from(record: &LoanRecord) -> Self {
        Self {
            record_id: record.record_id.clone(),
            status: record.status,
            expected_return_date: dates::to_display(record.expected_return_date),
            actual_return_date: dates::to_display(record.actual_return_date),
            requester_name: record.requester_name.clone(),
            requester_email: record.requester_email.clone(),
            department: record.department.clone(),
            requester_id: record.requester_id.clone(),
            cost_center: record.cost_center.clone(),
            requester_phone: record.requester_phone.clone(),
            supervisor_name: record.supervisor_name.clone(),
            supervisor_email: record.supervisor_email.clone(),
            reason: record.reason.clone(),
            vehicle_id: record.vehicle_id.clone(),
            card_id: record.card_id.clone(),
            registered_at: record.registered_at,
        }
    }
}
