//! Submission form request model

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Raw field values from the loan request form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitLoanRequest {
    pub requester_name: String,
    #[validate(email(message = "requester_email is not a valid email address"))]
    pub requester_email: String,
    pub requester_id: String,
    pub department: String,
    pub cost_center: String,
    pub requester_phone: String,
    pub supervisor_name: String,
    #[validate(email(message = "supervisor_email is not a valid email address"))]
    pub supervisor_email: String,
    pub reason: String,
    /// Expected return date (ISO 8601 date)
    pub expected_return_date: NaiveDate,
    pub vehicle_id: String,
    /// Must be true: the requester has read and accepted the loan rules
    #[serde(default)]
    pub agreed_to_rules: bool,
}
