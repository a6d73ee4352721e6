//! Product feedback models

use crate::models::validate_not_blank;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User feedback on a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i32,
    pub product_id: i32,
    pub user_name: String,
    pub comment: String,
    pub rating: i16,
    pub date: NaiveDate,
}

/// Request to leave feedback
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    pub product_id: i32,

    #[validate(custom(function = "validate_not_blank", message = "userName is required"))]
    pub user_name: String,

    #[validate(custom(function = "validate_not_blank", message = "comment is required"))]
    pub comment: String,

    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i16,
}

/// Feedback fields handed to the record store
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub product_id: i32,
    pub user_name: String,
    pub comment: String,
    pub rating: i16,
    pub date: NaiveDate,
}

impl NewFeedback {
    pub fn from_request(req: CreateFeedbackRequest, date: NaiveDate) -> Self {
        Self {
            product_id: req.product_id,
            user_name: req.user_name.trim().to_string(),
            comment: req.comment.trim().to_string(),
            rating: req.rating,
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rating: i16) -> CreateFeedbackRequest {
        CreateFeedbackRequest {
            product_id: 1,
            user_name: "Carlos".into(),
            comment: "Much better client tracking".into(),
            rating,
        }
    }

    #[test]
    fn rating_bounds() {
        assert!(request(1).validate().is_ok());
        assert!(request(5).validate().is_ok());
        assert!(request(0).validate().is_err());
        assert!(request(6).validate().is_err());
    }

    #[test]
    fn blank_text_fails_validation() {
        let req = CreateFeedbackRequest {
            product_id: 1,
            user_name: "   ".into(),
            comment: " \n ".into(),
            rating: 3,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("user_name"));
        assert!(errors.field_errors().contains_key("comment"));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let mut req = request(4);
        req.user_name = "  Carlos ".into();
        assert!(req.validate().is_ok());

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let feedback = NewFeedback::from_request(req, date);
        assert_eq!(feedback.user_name, "Carlos");
    }

    #[test]
    fn missing_rating_fails_deserialization() {
        let result = serde_json::from_str::<CreateFeedbackRequest>(
            r#"{"productId": 1, "userName": "Ana", "comment": "Needs UI work"}"#,
        );
        assert!(result.is_err());
    }
}
