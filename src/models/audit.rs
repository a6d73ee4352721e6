//! Audit scheduling models

use crate::models::validate_not_blank;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Lifecycle of a scheduled audit
///
/// New audits always start as `Scheduled`; other transitions are manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Scheduled => "scheduled",
            AuditStatus::Completed => "completed",
            AuditStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AuditStatus::Scheduled),
            "completed" => Ok(AuditStatus::Completed),
            "cancelled" => Ok(AuditStatus::Cancelled),
            other => Err(format!("Unknown audit status: {}", other)),
        }
    }
}

/// A scheduled product audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub assigned_to: String,
    pub status: AuditStatus,
    pub created_at: DateTime<Utc>,
}

/// Request to schedule an audit
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuditRequest {
    pub product_id: i32,

    #[validate(custom(function = "validate_not_blank", message = "productName is required"))]
    pub product_name: String,

    pub date: NaiveDate,

    #[validate(custom(function = "validate_not_blank", message = "time is required"))]
    pub time: String,

    #[validate(custom(function = "validate_not_blank", message = "assignedTo is required"))]
    pub assigned_to: String,
}

/// Audit fields handed to the record store
#[derive(Debug, Clone)]
pub struct NewAudit {
    pub product_id: i32,
    pub product_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub assigned_to: String,
}

impl From<CreateAuditRequest> for NewAudit {
    fn from(req: CreateAuditRequest) -> Self {
        Self {
            product_id: req.product_id,
            product_name: req.product_name.trim().to_string(),
            date: req.date,
            time: req.time.trim().to_string(),
            assigned_to: req.assigned_to.trim().to_string(),
        }
    }
}
