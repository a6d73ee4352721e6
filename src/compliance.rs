//! Compliance aggregation
//!
//! Folds per-step booleans into a clause compliance flag and rolls
//! observation percentages up into a product score. The store-facing
//! operations validate against the clause before anything is written.

use crate::db::RecordStore;
use crate::error::{not_found_error, validation_error, AppError};
use crate::models::{
    Clause, ClauseChecklist, ClauseProgress, ComplianceRecord, ObservationStatus, Product,
    ProductSummary, Standard, StandardChecklist, StepMap, StepStatus,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Which steps a clause must have confirmed to count as compliant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompliancePolicy {
    /// Every step marked so far is true; unmarked steps are ignored
    #[default]
    PresentSteps,
    /// Every declared step of the clause is marked true
    DeclaredSteps,
}

impl fmt::Display for CompliancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompliancePolicy::PresentSteps => f.write_str("present"),
            CompliancePolicy::DeclaredSteps => f.write_str("declared"),
        }
    }
}

impl FromStr for CompliancePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" | "present_steps" => Ok(CompliancePolicy::PresentSteps),
            "declared" | "declared_steps" => Ok(CompliancePolicy::DeclaredSteps),
            other => Err(format!(
                "Unknown compliance policy '{}' (expected 'present' or 'declared')",
                other
            )),
        }
    }
}

/// Compute the compliance flag of a step map
///
/// The flag is an AND over the checked steps, so a map with nothing to
/// check is compliant. A pair with no record at all is not.
pub fn evaluate(notes: &StepMap, declared_steps: usize, policy: CompliancePolicy) -> bool {
    match policy {
        CompliancePolicy::PresentSteps => notes.iter().all(|(_, done)| done),
        CompliancePolicy::DeclaredSteps => {
            (0..declared_steps as u32).all(|index| notes.get(index) == Some(true))
        }
    }
}

/// Whether a single step is confirmed; unmarked steps read as false
pub fn step_status(record: Option<&ComplianceRecord>, step_index: u32) -> bool {
    record
        .and_then(|r| r.notes.get(step_index))
        .unwrap_or(false)
}

/// Count confirmed steps among the clause's declared steps
pub fn clause_progress(notes: &StepMap, declared_steps: usize) -> ClauseProgress {
    let completed = (0..declared_steps as u32)
        .filter(|index| notes.get(*index) == Some(true))
        .count();
    ClauseProgress {
        completed,
        total: declared_steps,
    }
}

/// Mean observation compliance across all processes, rounded; 0 when empty
pub fn product_compliance(product: &Product) -> u8 {
    let (total, count) = product
        .observations()
        .fold((0u32, 0u32), |(total, count), obs| {
            (total + u32::from(obs.compliance), count + 1)
        });

    if count == 0 {
        return 0;
    }

    (f64::from(total) / f64::from(count)).round() as u8
}

/// Observations still awaiting resolution
pub fn pending_tasks(product: &Product) -> usize {
    product
        .observations()
        .filter(|obs| obs.status == ObservationStatus::Pending)
        .count()
}

/// Dashboard roll-up for a product
pub fn product_summary(product: &Product) -> ProductSummary {
    ProductSummary {
        id: product.id,
        name: product.name.clone(),
        compliance_score: product_compliance(product),
        last_audit: product.observations().map(|obs| obs.audit_date).max(),
        pending_tasks: pending_tasks(product),
    }
}

/// Lay a product's compliance records over a standard's clauses
pub fn build_checklist(
    standard: &Standard,
    clauses: &[Clause],
    records: &[ComplianceRecord],
) -> StandardChecklist {
    let clauses = clauses
        .iter()
        .map(|clause| {
            let record = records.iter().find(|r| r.clause_id == clause.id);
            let empty = StepMap::new();
            let notes = record.map(|r| &r.notes).unwrap_or(&empty);

            ClauseChecklist {
                clause_id: clause.id,
                clause_number: clause.clause_number.clone(),
                title: clause.title.clone(),
                is_compliant: record.map(|r| r.is_compliant).unwrap_or(false),
                progress: clause_progress(notes, clause.step_count()),
                steps: clause
                    .compliance_steps
                    .iter()
                    .enumerate()
                    .map(|(index, label)| StepStatus {
                        index: index as u32,
                        label: label.clone(),
                        done: step_status(record, index as u32),
                    })
                    .collect(),
            }
        })
        .collect();

    StandardChecklist {
        standard_id: standard.id,
        name: standard.name.clone(),
        clauses,
    }
}

async fn load_clause(store: &dyn RecordStore, clause_id: i32) -> Result<Clause, AppError> {
    store
        .get_clause(clause_id)
        .await?
        .ok_or_else(|| not_found_error(format!("Clause {} not found", clause_id)))
}

fn check_step_index(clause: &Clause, step_index: u32) -> Result<(), AppError> {
    if clause.has_step(step_index) {
        Ok(())
    } else {
        Err(validation_error(format!(
            "Step {} is out of range: clause {} has {} compliance steps",
            step_index,
            clause.clause_number,
            clause.step_count()
        )))
    }
}

/// Set one step of a (product, clause) record and persist the result
pub async fn toggle_step(
    store: &dyn RecordStore,
    policy: CompliancePolicy,
    product_id: i32,
    clause_id: i32,
    step_index: u32,
    value: bool,
) -> Result<ComplianceRecord, AppError> {
    let clause = load_clause(store, clause_id).await?;
    check_step_index(&clause, step_index)?;

    let mut notes = store
        .get_compliance(product_id, clause_id)
        .await?
        .map(|record| record.notes)
        .unwrap_or_default();

    let previous = notes.set(step_index, value);
    let is_compliant = evaluate(&notes, clause.step_count(), policy);

    debug!(
        "Step {} of clause {} for product {}: {:?} -> {}",
        step_index, clause_id, product_id, previous, value
    );

    let record = store
        .upsert_compliance(product_id, clause_id, is_compliant, &notes)
        .await?;

    info!(
        "Compliance updated for product {} clause {} (compliant: {})",
        product_id, clause_id, record.is_compliant
    );

    Ok(record)
}

/// Replace the whole step map of a (product, clause) record
pub async fn replace_steps(
    store: &dyn RecordStore,
    policy: CompliancePolicy,
    product_id: i32,
    clause_id: i32,
    notes: StepMap,
) -> Result<ComplianceRecord, AppError> {
    let clause = load_clause(store, clause_id).await?;
    if let Some(max) = notes.max_index() {
        check_step_index(&clause, max)?;
    }

    let is_compliant = evaluate(&notes, clause.step_count(), policy);
    let record = store
        .upsert_compliance(product_id, clause_id, is_compliant, &notes)
        .await?;

    info!(
        "Compliance replaced for product {} clause {} ({} steps, compliant: {})",
        product_id,
        clause_id,
        record.notes.len(),
        record.is_compliant
    );

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::{ClauseSeed, Observation, Process, StandardSeed};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn steps(pairs: &[(u32, bool)]) -> StepMap {
        pairs.iter().copied().collect()
    }

    fn observation(id: i32, compliance: u8, status: ObservationStatus, day: u32) -> Observation {
        Observation {
            id,
            description: format!("finding {}", id),
            audit_date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            status,
            compliance,
        }
    }

    fn product(processes: Vec<Vec<Observation>>) -> Product {
        Product {
            id: 7,
            name: "CRM".into(),
            processes: processes
                .into_iter()
                .enumerate()
                .map(|(i, observations)| Process {
                    id: i as i32 + 1,
                    name: format!("process {}", i),
                    observations,
                })
                .collect(),
        }
    }

    /// Store holding one standard with a single two-step clause (id 1)
    async fn two_step_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .seed_reference_data(&[StandardSeed {
                name: "ISO 9001",
                description: "Quality management",
                clauses: vec![ClauseSeed {
                    clause_number: "4.1",
                    title: "Context",
                    description: "",
                    compliance_steps: vec!["Identify issues", "Review issues"],
                }],
            }])
            .await
            .unwrap();
        store
    }

    #[test]
    fn present_policy_ignores_unmarked_steps() {
        let policy = CompliancePolicy::PresentSteps;
        assert!(evaluate(&steps(&[(0, true)]), 3, policy));
        assert!(evaluate(&steps(&[(0, true), (2, true)]), 3, policy));
        assert!(!evaluate(&steps(&[(0, true), (1, false)]), 3, policy));
        assert!(evaluate(&StepMap::new(), 3, policy));
    }

    #[test]
    fn declared_policy_requires_every_step() {
        let policy = CompliancePolicy::DeclaredSteps;
        assert!(!evaluate(&steps(&[(0, true)]), 2, policy));
        assert!(evaluate(&steps(&[(0, true), (1, true)]), 2, policy));
        assert!(!evaluate(&steps(&[(0, true), (1, false)]), 2, policy));
        assert!(!evaluate(&StepMap::new(), 2, policy));
        assert!(evaluate(&StepMap::new(), 0, policy));
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("present".parse::<CompliancePolicy>().unwrap(), CompliancePolicy::PresentSteps);
        assert_eq!(" Declared ".parse::<CompliancePolicy>().unwrap(), CompliancePolicy::DeclaredSteps);
        assert!("all".parse::<CompliancePolicy>().is_err());
        assert_eq!(CompliancePolicy::DeclaredSteps.to_string(), "declared");
    }

    #[test]
    fn step_status_defaults_to_false() {
        assert!(!step_status(None, 0));

        let record = ComplianceRecord {
            id: 1,
            product_id: 1,
            clause_id: 1,
            is_compliant: false,
            notes: steps(&[(0, true), (1, false)]),
            last_updated: chrono::Utc::now(),
        };
        assert!(step_status(Some(&record), 0));
        assert!(!step_status(Some(&record), 1));
        assert!(!step_status(Some(&record), 2));
    }

    #[test]
    fn clause_progress_counts_declared_steps_only() {
        let progress = clause_progress(&steps(&[(0, true), (1, false), (5, true)]), 3);
        assert_eq!(progress, ClauseProgress { completed: 1, total: 3 });
    }

    #[test]
    fn empty_product_scores_zero() {
        assert_eq!(product_compliance(&product(vec![])), 0);
        assert_eq!(product_compliance(&product(vec![vec![], vec![]])), 0);
    }

    #[test]
    fn product_score_is_rounded_mean() {
        let crm = product(vec![
            vec![
                observation(1, 90, ObservationStatus::Completed, 15),
                observation(2, 60, ObservationStatus::Pending, 15),
            ],
            vec![observation(3, 70, ObservationStatus::Pending, 15)],
        ]);
        // (90 + 60 + 70) / 3 = 73.33
        assert_eq!(product_compliance(&crm), 73);

        let halves = product(vec![vec![
            observation(1, 75, ObservationStatus::Pending, 10),
            observation(2, 66, ObservationStatus::Pending, 10),
        ]]);
        // 70.5 rounds up
        assert_eq!(product_compliance(&halves), 71);
    }

    #[test]
    fn summary_rolls_up_pending_and_latest_audit() {
        let crm = product(vec![
            vec![observation(1, 95, ObservationStatus::Completed, 20)],
            vec![observation(2, 80, ObservationStatus::Pending, 22)],
        ]);
        let summary = product_summary(&crm);
        assert_eq!(summary.compliance_score, 88);
        assert_eq!(summary.pending_tasks, 1);
        assert_eq!(summary.last_audit, NaiveDate::from_ymd_opt(2024, 2, 22));
    }

    #[tokio::test]
    async fn checklist_reflects_marked_steps() {
        let store = two_step_store().await;
        toggle_step(&store, CompliancePolicy::PresentSteps, 5, 1, 1, true)
            .await
            .unwrap();

        let standard = store.list_standards().await.unwrap().remove(0);
        let clauses = store.list_clauses(standard.id).await.unwrap();
        let records = store.list_compliance(5).await.unwrap();
        let checklist = build_checklist(&standard, &clauses, &records);

        let clause = &checklist.clauses[0];
        assert!(clause.is_compliant);
        assert_eq!(clause.progress, ClauseProgress { completed: 1, total: 2 });
        let done: Vec<bool> = clause.steps.iter().map(|s| s.done).collect();
        assert_eq!(done, vec![false, true]);

        let untouched = build_checklist(&standard, &clauses, &[]);
        assert!(!untouched.clauses[0].is_compliant);
        assert_eq!(untouched.clauses[0].progress.completed, 0);
    }

    #[tokio::test]
    async fn two_step_clause_scenario() {
        let store = two_step_store().await;
        let policy = CompliancePolicy::PresentSteps;

        let record = toggle_step(&store, policy, 1, 1, 0, true).await.unwrap();
        assert!(record.is_compliant);
        assert_eq!(record.notes, steps(&[(0, true)]));

        let record = toggle_step(&store, policy, 1, 1, 1, true).await.unwrap();
        assert!(record.is_compliant);

        let record = toggle_step(&store, policy, 1, 1, 0, false).await.unwrap();
        assert!(!record.is_compliant);
        assert_eq!(record.notes, steps(&[(0, false), (1, true)]));
    }

    #[tokio::test]
    async fn declared_policy_scenario() {
        let store = two_step_store().await;
        let policy = CompliancePolicy::DeclaredSteps;

        let record = toggle_step(&store, policy, 1, 1, 0, true).await.unwrap();
        assert!(!record.is_compliant);

        let record = toggle_step(&store, policy, 1, 1, 1, true).await.unwrap();
        assert!(record.is_compliant);
    }

    #[tokio::test]
    async fn toggling_twice_is_idempotent() {
        let store = two_step_store().await;
        let policy = CompliancePolicy::PresentSteps;

        let first = toggle_step(&store, policy, 3, 1, 1, false).await.unwrap();
        let second = toggle_step(&store, policy, 3, 1, 1, false).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.notes, second.notes);
        assert_eq!(first.is_compliant, second.is_compliant);
        assert_eq!(store.list_compliance(3).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_clause_is_not_found() {
        let store = two_step_store().await;
        let err = toggle_step(&store, CompliancePolicy::PresentSteps, 1, 99, 0, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn out_of_range_step_is_rejected_before_writing() {
        let store = two_step_store().await;
        let err = toggle_step(&store, CompliancePolicy::PresentSteps, 1, 1, 2, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.list_compliance(1).await.unwrap().is_empty());

        let err = replace_steps(&store, CompliancePolicy::PresentSteps, 1, 1, steps(&[(4, true)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.list_compliance(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_recomputes_flag() {
        let store = two_step_store().await;
        let record = replace_steps(
            &store,
            CompliancePolicy::PresentSteps,
            2,
            1,
            steps(&[(0, true), (1, false)]),
        )
        .await
        .unwrap();
        assert!(!record.is_compliant);
    }
}
