//! Product catalog models
//!
//! Products, their processes and audit observations come from the static
//! catalog in `seed`, not from the record store.

use chrono::NaiveDate;
use serde::Serialize;

/// Resolution state of an audit observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationStatus {
    Pending,
    Completed,
}

/// A specific audit finding tied to a process
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: i32,
    pub description: String,
    pub audit_date: NaiveDate,
    pub status: ObservationStatus,
    /// Percentage, 0 to 100
    pub compliance: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: i32,
    pub name: String,
    pub observations: Vec<Observation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub processes: Vec<Process>,
}

impl Product {
    /// All observations across every process, in catalog order
    pub fn observations(&self) -> impl Iterator<Item = &Observation> {
        self.processes.iter().flat_map(|p| p.observations.iter())
    }
}

/// Dashboard card for a product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: i32,
    pub name: String,
    pub compliance_score: u8,
    pub last_audit: Option<NaiveDate>,
    pub pending_tasks: usize,
}

/// Full product view with its rolled-up score
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub compliance_score: u8,
}
