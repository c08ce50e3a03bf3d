//! Cut-off instants for one cleanup pass.
//!
//! Computed once from the pass's reference time and reused for every visit,
//! so a long pass never judges later visits against a drifted clock.

use crate::config::ThresholdConfig;
use crate::error::{CleanupError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub reference_time: DateTime<Utc>,
    /// Last actions strictly before this instant earn a reminder.
    pub reminder_cutoff: DateTime<Utc>,
    /// Last actions strictly before this instant close the visit.
    pub closure_cutoff: DateTime<Utc>,
}

impl Thresholds {
    /// A visit that started at or after the reminder cut-off is too young to
    /// need anything, whatever its activity looks like.
    pub fn is_fresh(&self, visit_start: DateTime<Utc>) -> bool {
        visit_start >= self.reminder_cutoff
    }

    /// Whole hours between the reference time and the reminder cut-off.
    pub fn reminder_hours(&self) -> i64 {
        (self.reference_time - self.reminder_cutoff).num_hours()
    }

    /// Whole hours between the reference time and the closure cut-off.
    pub fn close_hours(&self) -> i64 {
        (self.reference_time - self.closure_cutoff).num_hours()
    }
}

/// Fails when a threshold pushes a cut-off outside the representable range.
pub fn compute_windows(
    reference_time: DateTime<Utc>,
    config: &ThresholdConfig,
) -> Result<Thresholds> {
    Ok(Thresholds {
        reference_time,
        reminder_cutoff: cutoff(
            reference_time,
            config.reminder_after(),
            "reminder_after_hours",
        )?,
        closure_cutoff: cutoff(reference_time, config.close_after(), "close_after_hours")?,
    })
}

fn cutoff(
    reference_time: DateTime<Utc>,
    after: Option<Duration>,
    field: &str,
) -> Result<DateTime<Utc>> {
    after
        .and_then(|d| reference_time.checked_sub_signed(d))
        .ok_or_else(|| {
            CleanupError::InvalidConfig(format!(
                "thresholds.{field} is too large to subtract from {reference_time}"
            ))
        })
}
