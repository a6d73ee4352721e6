//! Compliance record models
//!
//! A compliance record holds, for one (product, clause) pair, the state of
//! every compliance step that has been marked so far.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-step compliance flags keyed by step index
///
/// Serialized as a JSON object keyed by the decimal index
/// (`{"0": true, "2": false}`). Also deserializes from a string holding
/// that object, which is how older clients send it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StepMap(BTreeMap<u32, bool>);

impl StepMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a step, `None` if it was never marked
    pub fn get(&self, index: u32) -> Option<bool> {
        self.0.get(&index).copied()
    }

    /// Mark a step, returning its previous state
    pub fn set(&mut self, index: u32, value: bool) -> Option<bool> {
        self.0.insert(index, value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Marked steps in index order
    pub fn iter(&self) -> impl Iterator<Item = (u32, bool)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Highest marked step index
    pub fn max_index(&self) -> Option<u32> {
        self.0.keys().next_back().copied()
    }
}

impl FromIterator<(u32, bool)> for StepMap {
    fn from_iter<I: IntoIterator<Item = (u32, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn parse_step_key<E: de::Error>(key: &str) -> Result<u32, E> {
    key.trim()
        .parse()
        .map_err(|_| E::custom(format!("invalid step index: {:?}", key)))
}

struct StepMapVisitor;

impl<'de> Visitor<'de> for StepMapVisitor {
    type Value = StepMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping step indices to booleans, or a string encoding one")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StepMap, A::Error> {
        let mut steps = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, bool>()? {
            steps.insert(parse_step_key::<A::Error>(&key)?, value);
        }
        Ok(StepMap(steps))
    }

    fn visit_str<E: de::Error>(self, encoded: &str) -> Result<StepMap, E> {
        if encoded.trim().is_empty() {
            return Ok(StepMap::new());
        }
        let raw: BTreeMap<String, bool> = serde_json::from_str(encoded)
            .map_err(|e| E::custom(format!("notes is not a step map: {}", e)))?;
        raw.iter()
            .map(|(k, v)| Ok((parse_step_key::<E>(k)?, *v)))
            .collect()
    }

    fn visit_unit<E: de::Error>(self) -> Result<StepMap, E> {
        Ok(StepMap::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<StepMap, E> {
        Ok(StepMap::new())
    }
}

impl<'de> Deserialize<'de> for StepMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StepMapVisitor)
    }
}

/// Compliance status of one product against one clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub id: i32,
    pub product_id: i32,
    pub clause_id: i32,
    pub is_compliant: bool,
    pub notes: StepMap,
    pub last_updated: DateTime<Utc>,
}

/// Body of `PUT /products/{id}/compliance/{clauseId}`
///
/// `is_compliant` is accepted for compatibility but always recomputed.
#[derive(Debug, Deserialize)]
pub struct UpsertComplianceRequest {
    #[serde(default)]
    pub is_compliant: Option<bool>,
    #[serde(default)]
    pub notes: StepMap,
}

/// Body of `PUT /products/{id}/compliance/{clauseId}/steps/{stepIndex}`
#[derive(Debug, Deserialize)]
pub struct ToggleStepRequest {
    pub value: bool,
}

/// Completed vs declared steps of a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClauseProgress {
    pub completed: usize,
    pub total: usize,
}

/// One checklist line of a clause
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepStatus {
    pub index: u32,
    pub label: String,
    pub done: bool,
}

/// A clause with the state of each of its steps for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClauseChecklist {
    pub clause_id: i32,
    pub clause_number: String,
    pub title: String,
    pub is_compliant: bool,
    pub progress: ClauseProgress,
    pub steps: Vec<StepStatus>,
}

/// A standard's clauses as a product checklist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardChecklist {
    pub standard_id: i32,
    pub name: String,
    pub clauses: Vec<ClauseChecklist>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn step_map_serializes_with_string_keys() {
        let steps: StepMap = [(0, true), (2, false)].into_iter().collect();
        let json = serde_json::to_string(&steps).unwrap();
        assert_eq!(json, r#"{"0":true,"2":false}"#);
    }

    #[test]
    fn step_map_accepts_object_string_and_null() {
        let expected: StepMap = [(0, true), (1, false)].into_iter().collect();

        let from_object: StepMap = serde_json::from_str(r#"{"0": true, "1": false}"#).unwrap();
        let from_string: StepMap = serde_json::from_str(r#""{\"0\":true,\"1\":false}""#).unwrap();
        let from_null: StepMap = serde_json::from_str("null").unwrap();

        assert_eq!(from_object, expected);
        assert_eq!(from_string, expected);
        assert!(from_null.is_empty());
    }

    #[test]
    fn step_map_rejects_non_numeric_keys() {
        assert!(serde_json::from_str::<StepMap>(r#"{"first": true}"#).is_err());
        assert!(serde_json::from_str::<StepMap>(r#""not json""#).is_err());
    }

    #[test]
    fn upsert_request_defaults_missing_notes() {
        let req: UpsertComplianceRequest = serde_json::from_str(r#"{"is_compliant": true}"#).unwrap();
        assert_eq!(req.is_compliant, Some(true));
        assert!(req.notes.is_empty());
    }

    #[test]
    fn set_reports_previous_value() {
        let mut steps = StepMap::new();
        assert_eq!(steps.set(3, true), None);
        assert_eq!(steps.set(3, false), Some(true));
        assert_eq!(steps.get(3), Some(false));
        assert_eq!(steps.max_index(), Some(3));
    }
}
