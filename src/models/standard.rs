//! ISO standard and clause models
//!
//! Reference data, seeded at start-up and read-only afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named ISO specification (e.g. ISO 9001)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standard {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A numbered requirement section within a standard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub id: i32,
    pub standard_id: i32,
    pub clause_number: String,
    pub title: String,
    pub description: Option<String>,
    /// Checklist items; their positions are the step indices used by compliance records
    pub compliance_steps: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Clause {
    /// Number of declared compliance steps
    pub fn step_count(&self) -> usize {
        self.compliance_steps.len()
    }

    /// Whether `index` addresses one of the declared steps
    pub fn has_step(&self, index: u32) -> bool {
        (index as usize) < self.compliance_steps.len()
    }
}

/// Seed definition for a standard and its clauses
#[derive(Debug, Clone)]
pub struct StandardSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub clauses: Vec<ClauseSeed>,
}

/// Seed definition for a single clause
#[derive(Debug, Clone)]
pub struct ClauseSeed {
    pub clause_number: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub compliance_steps: Vec<&'static str>,
}
