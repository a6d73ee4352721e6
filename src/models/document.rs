//! QMS documentation library models

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Procedure,
    Policy,
    Manual,
}

/// A controlled document of the quality management system
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    /// Markdown body
    pub content: String,
    pub last_updated: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_kind_as_type() {
        let doc = Document {
            id: 7,
            title: "Quality Manual".into(),
            kind: DocumentKind::Manual,
            content: "# Quality Manual".into(),
            last_updated: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "id": 7,
                "title": "Quality Manual",
                "type": "manual",
                "content": "# Quality Manual",
                "lastUpdated": "2024-03-01"
            })
        );
    }
}
