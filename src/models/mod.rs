//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains all request/response structures used by the API.

pub mod audit;
pub mod compliance;
pub mod document;
pub mod feedback;
pub mod product;
pub mod standard;

// Re-export commonly used types
pub use audit::*;
pub use compliance::*;
pub use document::*;
pub use feedback::*;
pub use product::*;
pub use standard::*;

/// Reject strings that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
