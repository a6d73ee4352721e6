//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::compliance::CompliancePolicy;
use crate::db::RecordStore;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Backing record store (PostgreSQL or in-memory)
    pub store: Arc<dyn RecordStore>,

    /// How step maps roll up into a clause compliance flag
    pub policy: CompliancePolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, policy: CompliancePolicy) -> Self {
        Self { store, policy }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
