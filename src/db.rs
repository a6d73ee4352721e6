//! Record store
//!
//! The narrow persistence contract the API works against. Each call is
//! atomic for the single row it touches; there are no transactions and no
//! retries. PostgreSQL backs production, the in-memory store backs local
//! development and tests.

pub mod memory;
pub mod postgres;
pub mod queries;

use crate::error::AppError;
use crate::models::{
    Audit, Clause, ComplianceRecord, Feedback, NewAudit, NewFeedback, Standard, StandardSeed,
    StepMap,
};
use async_trait::async_trait;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for health reporting
    fn backend(&self) -> &'static str;

    /// All standards, by id
    async fn list_standards(&self) -> Result<Vec<Standard>, AppError>;

    /// Clauses of one standard, by id; empty for an unknown standard
    async fn list_clauses(&self, standard_id: i32) -> Result<Vec<Clause>, AppError>;

    async fn get_clause(&self, clause_id: i32) -> Result<Option<Clause>, AppError>;

    /// Compliance records of one product, by clause
    async fn list_compliance(&self, product_id: i32) -> Result<Vec<ComplianceRecord>, AppError>;

    async fn get_compliance(
        &self,
        product_id: i32,
        clause_id: i32,
    ) -> Result<Option<ComplianceRecord>, AppError>;

    /// Insert or overwrite the record keyed by (product, clause)
    async fn upsert_compliance(
        &self,
        product_id: i32,
        clause_id: i32,
        is_compliant: bool,
        notes: &StepMap,
    ) -> Result<ComplianceRecord, AppError>;

    /// Append an audit in `scheduled` state
    async fn create_audit(&self, audit: NewAudit) -> Result<Audit, AppError>;

    /// Audits by date, newest first; equal dates keep insertion order
    async fn list_audits(&self) -> Result<Vec<Audit>, AppError>;

    async fn create_feedback(&self, feedback: NewFeedback) -> Result<Feedback, AppError>;

    /// Feedback by date, newest first; equal dates keep insertion order
    async fn list_feedback(&self) -> Result<Vec<Feedback>, AppError>;

    /// Insert reference standards and clauses if none exist yet.
    /// Returns the number of standards inserted.
    async fn seed_reference_data(&self, standards: &[StandardSeed]) -> Result<usize, AppError>;
}
