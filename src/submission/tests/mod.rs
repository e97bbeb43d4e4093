//! Unit tests for the submission module.
//!
//! Tests are organised by layer: domain normalisation and record shape,
//! service orchestration against mocked stores, and backend selection.

mod domain_tests;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to a single instant.
pub(super) struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// 2024-03-05T09:30:15.250Z
    pub(super) fn reference() -> Self {
        let base = Utc
            .with_ymd_and_hms(2024, 3, 5, 9, 30, 15)
            .single()
            .expect("valid timestamp");
        Self(base + chrono::Duration::milliseconds(250))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}
