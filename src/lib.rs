//! GoodCard Fuel Card Loan Tracking
//!
//! A Rust REST server tracking loans of fuel cards to employees: a submission
//! endpoint registers new loan requests and a shared-secret-gated records view
//! lists, filters, and reconciles edited records against a swappable record
//! store, deriving each loan's status from its date fields.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
