//! Student (borrower) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Student record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    /// Unique external identification code
    pub fin_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    /// Reliability score, moved by returns
    pub trust_rate: i32,
}

/// Create student request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudent {
    #[validate(length(min = 1, max = 32, message = "Fin code must be 1 to 32 characters"))]
    pub fin_code: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
}

/// Update student profile request. The trust rate is not editable here.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudent {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Phone number cannot be empty"))]
    pub phone_number: Option<String>,
}

impl UpdateStudent {
    /// Overlay the provided fields onto an existing record
    pub fn apply_to(&self, student: &mut Student) {
        if let Some(ref v) = self.first_name {
            student.first_name = v.clone();
        }
        if let Some(ref v) = self.last_name {
            student.last_name = v.clone();
        }
        if let Some(ref v) = self.email {
            student.email = v.clone();
        }
        if let Some(ref v) = self.phone_number {
            student.phone_number = v.clone();
        }
    }
}
