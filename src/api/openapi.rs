//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, health, records, submissions};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GoodCard API",
        version = "1.0.0",
        description = "Fuel card loan tracking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::unlock,
        // Submissions
        submissions::submit_loan,
        records::loan_rules,
        // Records
        records::list_records,
        records::reconcile_records,
    ),
    components(
        schemas(
            // Auth
            auth::UnlockRequest,
            auth::UnlockResponse,
            // Submissions
            crate::models::SubmitLoanRequest,
            submissions::SubmissionResponse,
            // Records
            crate::models::record::LoanStatus,
            crate::models::record::RecordRow,
            crate::services::records::RecordEdit,
            crate::services::records::FailedRow,
            crate::services::records::SaveReport,
            records::ReconcileRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&AccessKeySecurity),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Records view access gate"),
        (name = "submissions", description = "Loan request submission"),
        (name = "records", description = "Loan records view and reconciliation")
    )
)]
pub struct ApiDoc;

struct AccessKeySecurity;

impl Modify for AccessKeySecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "access_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Access-Key"))),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
