//! Loan submission service
//!
//! Validates a new-loan submission and persists it with a single insert.
//! No partial records are ever written: every check runs before the store is
//! touched.

use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    dates::RawDate,
    error::{AppError, AppResult},
    models::{StoredRecord, SubmitLoanRequest},
    store::RecordStore,
};

#[derive(Clone)]
pub struct SubmissionsService {
    store: Arc<dyn RecordStore>,
}

impl SubmissionsService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a loan request, returning the new record id
    pub async fn submit(&self, request: SubmitLoanRequest) -> AppResult<String> {
        validate(&request)?;

        let record = StoredRecord {
            requester_name: request.requester_name,
            requester_email: request.requester_email,
            requester_id: request.requester_id,
            department: request.department,
            cost_center: request.cost_center,
            requester_phone: request.requester_phone,
            supervisor_name: request.supervisor_name,
            supervisor_email: request.supervisor_email,
            reason: request.reason,
            vehicle_id: request.vehicle_id,
            agreed_to_rules: true,
            expected_return_date: RawDate::Date(request.expected_return_date),
            actual_return_date: RawDate::Null,
            registered_at: Utc::now(),
            card_id: String::new(),
        };

        let id = self.store.insert(&record).await?;
        tracing::info!(record_id = %id, vehicle = %record.vehicle_id, "Loan request registered");
        Ok(id)
    }
}

/// Check required fields, rules acceptance, and email formats
pub fn validate(request: &SubmitLoanRequest) -> AppResult<()> {
    let required = [
        ("requester_name", &request.requester_name),
        ("requester_email", &request.requester_email),
        ("requester_id", &request.requester_id),
        ("department", &request.department),
        ("cost_center", &request.cost_center),
        ("requester_phone", &request.requester_phone),
        ("supervisor_name", &request.supervisor_name),
        ("supervisor_email", &request.supervisor_email),
        ("reason", &request.reason),
        ("vehicle_id", &request.vehicle_id),
    ];

    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::MissingField(name.to_string()));
        }
    }

    if !request.agreed_to_rules {
        return Err(AppError::RulesNotAccepted);
    }

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates;
    use crate::models::LoanStatus;
    use crate::store::MockRecordStore;
    use chrono::NaiveDate;
    use mockall::predicate;

    fn valid_request() -> SubmitLoanRequest {
        SubmitLoanRequest {
            requester_name: "Ana Souza".to_string(),
            requester_email: "ana.souza@example.com".to_string(),
            requester_id: "X12345".to_string(),
            department: "DE-TV".to_string(),
            cost_center: "CC-401".to_string(),
            requester_phone: "+55 41 99999-0000".to_string(),
            supervisor_name: "Bruno Lima".to_string(),
            supervisor_email: "bruno.lima@example.com".to_string(),
            reason: "Track tests at the proving ground".to_string(),
            expected_return_date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
            vehicle_id: "SV6122".to_string(),
            agreed_to_rules: true,
        }
    }

    #[tokio::test]
    async fn test_valid_submission_inserts_exactly_one_record() {
        let mut store = MockRecordStore::new();
        store
            .expect_insert()
            .withf(|record: &StoredRecord| {
                record.card_id.is_empty()
                    && record.actual_return_date == RawDate::Null
                    && record.agreed_to_rules
                    && record.vehicle_id == "SV6122"
            })
            .times(1)
            .returning(|_| Ok("rec-1".to_string()));

        let service = SubmissionsService::new(Arc::new(store));
        let id = service.submit(valid_request()).await.unwrap();
        assert_eq!(id, "rec-1");
    }

    #[tokio::test]
    async fn test_new_record_status_is_open() {
        let mut store = MockRecordStore::new();
        store.expect_insert().returning(|record: &StoredRecord| {
            let expected = dates::to_storage(&record.expected_return_date);
            let actual = dates::to_storage(&record.actual_return_date);
            let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
            assert_eq!(LoanStatus::derive(expected, actual, today), LoanStatus::Open);
            Ok("rec-1".to_string())
        });

        let service = SubmissionsService::new(Arc::new(store));
        service.submit(valid_request()).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_vehicle_id_persists_nothing() {
        let mut store = MockRecordStore::new();
        store.expect_insert().times(0).returning(|_| Ok(String::new()));

        let service = SubmissionsService::new(Arc::new(store));
        let mut request = valid_request();
        request.vehicle_id = String::new();

        let err = service.submit(request).await.unwrap_err();
        match err {
            AppError::MissingField(field) => assert_eq!(field, "vehicle_id"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_only_field_is_missing() {
        let mut request = valid_request();
        request.department = "   ".to_string();
        assert!(matches!(
            validate(&request),
            Err(AppError::MissingField(field)) if field == "department"
        ));
    }

    #[test]
    fn test_rules_must_be_accepted() {
        let mut request = valid_request();
        request.agreed_to_rules = false;
        assert!(matches!(validate(&request), Err(AppError::RulesNotAccepted)));
    }

    #[test]
    fn test_rules_check_runs_after_required_fields() {
        let mut request = valid_request();
        request.requester_name = String::new();
        request.agreed_to_rules = false;
        // Field errors surface first, matching the form's warning order
        assert!(matches!(validate(&request), Err(AppError::MissingField(_))));
    }

    #[test]
    fn test_malformed_email_is_rejected() {
        let mut request = valid_request();
        request.supervisor_email = "not-an-email".to_string();
        assert!(matches!(validate(&request), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let mut store = MockRecordStore::new();
        store
            .expect_insert()
            .with(predicate::always())
            .returning(|_| Err(AppError::Store("disk full".to_string())));

        let service = SubmissionsService::new(Arc::new(store));
        assert!(matches!(
            service.submit(valid_request()).await,
            Err(AppError::Store(_))
        ));
    }
}
