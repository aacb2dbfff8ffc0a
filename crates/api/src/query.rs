//! Shared query parameter types for console handlers.

use chrono::NaiveDate;
use serde::Deserialize;

/// `?date=yyyy-MM-dd`. Defaults to today when absent.
#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Option<NaiveDate>,
}

/// `?q=` free-text client search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}
