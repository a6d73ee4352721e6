//! In-memory record store
//!
//! Same contract as the PostgreSQL store, without durability. Used when no
//! DATABASE_URL is configured and by the test suite.

use crate::db::RecordStore;
use crate::error::AppError;
use crate::models::{
    Audit, AuditStatus, Clause, ComplianceRecord, Feedback, NewAudit, NewFeedback, Standard,
    StandardSeed, StepMap,
};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

/// Per-table id counter, starting at 1 like a SERIAL column
#[derive(Default)]
struct Sequence(i32);

impl Sequence {
    fn next(&mut self) -> i32 {
        self.0 += 1;
        self.0
    }
}

#[derive(Default)]
struct Tables {
    standards: Vec<Standard>,
    clauses: Vec<Clause>,
    compliance: Vec<ComplianceRecord>,
    audits: Vec<Audit>,
    feedback: Vec<Feedback>,
    standard_ids: Sequence,
    clause_ids: Sequence,
    compliance_ids: Sequence,
    audit_ids: Sequence,
    feedback_ids: Sequence,
}

/// Thread-safe in-memory store
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_standards(&self) -> Result<Vec<Standard>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.standards.clone())
    }

    async fn list_clauses(&self, standard_id: i32) -> Result<Vec<Clause>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .clauses
            .iter()
            .filter(|c| c.standard_id == standard_id)
            .cloned()
            .collect())
    }

    async fn get_clause(&self, clause_id: i32) -> Result<Option<Clause>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.clauses.iter().find(|c| c.id == clause_id).cloned())
    }

    async fn list_compliance(&self, product_id: i32) -> Result<Vec<ComplianceRecord>, AppError> {
        let tables = self.tables.read().await;
        let mut records: Vec<ComplianceRecord> = tables
            .compliance
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.clause_id);
        Ok(records)
    }

    async fn get_compliance(
        &self,
        product_id: i32,
        clause_id: i32,
    ) -> Result<Option<ComplianceRecord>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .compliance
            .iter()
            .find(|r| r.product_id == product_id && r.clause_id == clause_id)
            .cloned())
    }

    async fn upsert_compliance(
        &self,
        product_id: i32,
        clause_id: i32,
        is_compliant: bool,
        notes: &StepMap,
    ) -> Result<ComplianceRecord, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        if let Some(existing) = tables
            .compliance
            .iter_mut()
            .find(|r| r.product_id == product_id && r.clause_id == clause_id)
        {
            existing.is_compliant = is_compliant;
            existing.notes = notes.clone();
            existing.last_updated = now;
            return Ok(existing.clone());
        }

        let record = ComplianceRecord {
            id: tables.compliance_ids.next(),
            product_id,
            clause_id,
            is_compliant,
            notes: notes.clone(),
            last_updated: now,
        };
        tables.compliance.push(record.clone());
        Ok(record)
    }

    async fn create_audit(&self, audit: NewAudit) -> Result<Audit, AppError> {
        let mut tables = self.tables.write().await;
        let audit = Audit {
            id: tables.audit_ids.next(),
            product_id: audit.product_id,
            product_name: audit.product_name,
            date: audit.date,
            time: audit.time,
            assigned_to: audit.assigned_to,
            status: AuditStatus::Scheduled,
            created_at: Utc::now(),
        };
        tables.audits.push(audit.clone());
        Ok(audit)
    }

    async fn list_audits(&self) -> Result<Vec<Audit>, AppError> {
        let tables = self.tables.read().await;
        let mut audits = tables.audits.clone();
        // sort_by is stable: ties stay in insertion order
        audits.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(audits)
    }

    async fn create_feedback(&self, feedback: NewFeedback) -> Result<Feedback, AppError> {
        let mut tables = self.tables.write().await;
        let feedback = Feedback {
            id: tables.feedback_ids.next(),
            product_id: feedback.product_id,
            user_name: feedback.user_name,
            comment: feedback.comment,
            rating: feedback.rating,
            date: feedback.date,
        };
        tables.feedback.push(feedback.clone());
        Ok(feedback)
    }

    async fn list_feedback(&self) -> Result<Vec<Feedback>, AppError> {
        let tables = self.tables.read().await;
        let mut feedback = tables.feedback.clone();
        feedback.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(feedback)
    }

    async fn seed_reference_data(&self, standards: &[StandardSeed]) -> Result<usize, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.standards.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        for seed in standards {
            let standard_id = tables.standard_ids.next();
            tables.standards.push(Standard {
                id: standard_id,
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()).filter(|d| !d.is_empty()),
                created_at: now,
            });

            for clause in &seed.clauses {
                let id = tables.clause_ids.next();
                tables.clauses.push(Clause {
                    id,
                    standard_id,
                    clause_number: clause.clause_number.to_string(),
                    title: clause.title.to_string(),
                    description: Some(clause.description.to_string()).filter(|d| !d.is_empty()),
                    compliance_steps: clause.compliance_steps.iter().map(|s| s.to_string()).collect(),
                    created_at: now,
                });
            }
        }

        Ok(standards.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::iso_standards;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn audit(product_id: i32, date: NaiveDate, assigned_to: &str) -> NewAudit {
        NewAudit {
            product_id,
            product_name: format!("Product {}", product_id),
            date,
            time: "10:00".into(),
            assigned_to: assigned_to.into(),
        }
    }

    #[test]
    fn seeding_runs_once() {
        let store = MemoryStore::new();
        let inserted = tokio_test::block_on(store.seed_reference_data(&iso_standards())).unwrap();
        assert_eq!(inserted, iso_standards().len());

        let again = tokio_test::block_on(store.seed_reference_data(&iso_standards())).unwrap();
        assert_eq!(again, 0);

        let standards = tokio_test::block_on(store.list_standards()).unwrap();
        assert_eq!(standards.len(), inserted);
    }

    #[tokio::test]
    async fn upsert_updates_in_place() {
        let store = MemoryStore::new();
        let first_notes: StepMap = [(0, true)].into_iter().collect();
        let second_notes: StepMap = [(0, true), (1, false)].into_iter().collect();

        let created = store.upsert_compliance(1, 4, true, &first_notes).await.unwrap();
        let updated = store.upsert_compliance(1, 4, false, &second_notes).await.unwrap();

        assert_eq!(created.id, updated.id);
        assert_eq!(updated.notes, second_notes);
        assert!(!updated.is_compliant);
        assert_eq!(store.list_compliance(1).await.unwrap().len(), 1);
        assert!(store.list_compliance(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn audits_sort_newest_first_with_stable_ties() {
        let store = MemoryStore::new();
        store.create_audit(audit(1, date(3, 15), "first")).await.unwrap();
        store.create_audit(audit(2, date(3, 20), "second")).await.unwrap();
        store.create_audit(audit(3, date(3, 15), "third")).await.unwrap();
        store.create_audit(audit(4, date(1, 2), "earliest")).await.unwrap();

        let order: Vec<String> = store
            .list_audits()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.assigned_to)
            .collect();
        assert_eq!(order, vec!["second", "first", "third", "earliest"]);
    }

    #[tokio::test]
    async fn feedback_sorts_newest_first_with_stable_ties() {
        let store = MemoryStore::new();
        let entries = [
            ("first", date(2, 10)),
            ("newest", date(2, 28)),
            ("second", date(2, 10)),
            ("oldest", date(1, 5)),
            ("third", date(2, 10)),
        ];
        for (user_name, day) in entries {
            store
                .create_feedback(NewFeedback {
                    product_id: 1,
                    user_name: user_name.into(),
                    comment: "ok".into(),
                    rating: 4,
                    date: day,
                })
                .await
                .unwrap();
        }

        let order: Vec<String> = store
            .list_feedback()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.user_name)
            .collect();
        assert_eq!(order, vec!["newest", "first", "second", "third", "oldest"]);
    }

    #[tokio::test]
    async fn ids_are_sequenced_per_table() {
        let store = MemoryStore::new();
        store.seed_reference_data(&iso_standards()).await.unwrap();

        let standards = store.list_standards().await.unwrap();
        assert_eq!(standards[0].id, 1);
        let clauses = store.list_clauses(standards[0].id).await.unwrap();
        assert_eq!(clauses[0].id, 1);

        let audit = store.create_audit(audit(1, date(3, 15), "Juan")).await.unwrap();
        assert_eq!(audit.id, 1);
    }

    #[tokio::test]
    async fn new_audits_are_scheduled() {
        let store = MemoryStore::new();
        let created = store.create_audit(audit(1, date(3, 15), "Juan")).await.unwrap();
        assert_eq!(created.status, AuditStatus::Scheduled);
    }

    #[tokio::test]
    async fn clauses_are_filtered_by_standard() {
        let store = MemoryStore::new();
        store.seed_reference_data(&iso_standards()).await.unwrap();

        let standards = store.list_standards().await.unwrap();
        for standard in &standards {
            let clauses = store.list_clauses(standard.id).await.unwrap();
            assert!(!clauses.is_empty());
            assert!(clauses.iter().all(|c| c.standard_id == standard.id));
        }
        assert!(store.list_clauses(-1).await.unwrap().is_empty());
    }
}
