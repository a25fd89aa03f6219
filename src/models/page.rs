//! Offset pagination parameters

use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::LendingConfig;

/// `pageNumber` / `pageSize` query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Zero-based page index (default: 0)
    pub page_number: Option<i64>,
    /// Records per page (default from configuration)
    pub page_size: Option<i64>,
}

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    pub fn new(number: i64, size: i64) -> Self {
        Self { number, size }
    }

    pub fn offset(&self) -> i64 {
        self.number.saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}

impl PageQuery {
    /// Negative page numbers fall back to the first page, non-positive sizes
    /// to the configured default, and sizes are capped at the configured max.
    /// Page numbers are capped so the offset stays representable.
    pub fn resolve(&self, lending: &LendingConfig) -> Page {
        let size = self
            .page_size
            .filter(|s| *s > 0)
            .unwrap_or(lending.default_page_size)
            .min(lending.max_page_size);
        let number = self
            .page_number
            .filter(|n| *n >= 0)
            .unwrap_or(0)
            .min(i64::MAX / size.max(1));
        Page { number, size }
    }
}
