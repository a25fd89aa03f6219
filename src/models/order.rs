//! Borrowing order model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Open loan. An order exists from borrow until return or administrative
/// removal; there is no closed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub book_id: i64,
    pub student_id: i64,
    pub order_timestamp: DateTime<Utc>,
    /// Due date
    pub return_timestamp: DateTime<Utc>,
}

impl Order {
    /// Late means strictly after the due timestamp
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        now > self.return_timestamp
    }
}

/// Order fields before the store assigns an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub book_id: i64,
    pub student_id: i64,
    pub order_timestamp: DateTime<Utc>,
    pub return_timestamp: DateTime<Utc>,
}

/// Create / update order request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub student_id: i64,
    pub book_id: i64,
    /// Loan period in days; missing or non-positive uses the default
    #[serde(default)]
    pub days_to_return: Option<i64>,
}

/// Due date for a loan starting at `start`; `None` when it is not representable
pub fn due_date(start: DateTime<Utc>, loan_days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(loan_days).and_then(|period| start.checked_add_signed(period))
}
