//! Data models for GoodCard

pub mod record;
pub mod submission;

// Re-export commonly used types
pub use record::{LoanStatus, RecordRow, StoredRecord};
pub use submission::SubmitLoanRequest;
