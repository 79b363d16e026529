//! Values exchanged with SMS gateways.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::MessageStatus;

/// Result of a successful send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReceipt {
    pub external_id: String,
    pub status: MessageStatus,
}

impl ExternalReceipt {
    pub fn new(external_id: impl Into<String>, status: MessageStatus) -> Self {
        Self {
            external_id: external_id.into(),
            status,
        }
    }
}

/// One row of a batch status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub external_id: String,
    pub status: MessageStatus,
}

impl StatusReport {
    pub fn new(external_id: impl Into<String>, status: MessageStatus) -> Self {
        Self {
            external_id: external_id.into(),
            status,
        }
    }
}

/// Calendar window for batch queries, `start` inclusive and `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Today and tomorrow as seen from `offset`
    pub fn covering_today(offset: FixedOffset) -> Self {
        Self::covering_day_of(Utc::now(), offset)
    }

    pub fn covering_day_of(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        let today = instant.with_timezone(&offset).date_naive();
        Self {
            start: today,
            end: today + Duration::days(1),
        }
    }

    /// `YYYY-MM-DD` form of the start date
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// `YYYY-MM-DD` form of the end date
    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}
