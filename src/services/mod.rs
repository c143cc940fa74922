//! Business logic services

pub mod records;
pub mod submissions;

use std::sync::Arc;

use crate::store::RecordStore;

/// Session context for gated operations. Produced by the access-gate
/// extractor and passed explicitly into every records-view call; there is no
/// process-wide authentication state.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub authenticated: bool,
}

impl Session {
    pub fn authenticated() -> Self {
        Self { authenticated: true }
    }

    pub fn anonymous() -> Self {
        Self { authenticated: false }
    }
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub submissions: submissions::SubmissionsService,
    pub records: records::RecordsService,
}

impl Services {
    /// Create all services over the configured record store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            submissions: submissions::SubmissionsService::new(store.clone()),
            records: records::RecordsService::new(store),
        }
    }
}
