use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Visit
// ---------------------------------------------------------------------------

/// One attendance session for a tester, as recorded by the activity
/// directory. Only open visits (`end_time == None`) are ever evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    pub tester_staff_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tester_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tester_name: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl Visit {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

// ---------------------------------------------------------------------------
// SubActivityKind
// ---------------------------------------------------------------------------

/// The sub-activities recorded inside a visit that count as tester actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubActivityKind {
    #[serde(rename = "wait")]
    Wait,
    #[serde(rename = "unaccountable time")]
    UnaccountableTime,
}

impl SubActivityKind {
    pub fn all() -> &'static [SubActivityKind] {
        &[SubActivityKind::Wait, SubActivityKind::UnaccountableTime]
    }

    /// Wire name used by the activity directory's `activityType` filter.
    pub fn as_str(self) -> &'static str {
        match self {
            SubActivityKind::Wait => "wait",
            SubActivityKind::UnaccountableTime => "unaccountable time",
        }
    }
}

impl fmt::Display for SubActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActivityEvent
// ---------------------------------------------------------------------------

/// A wait or unaccountable-time interval. Still-open intervals have no end
/// time and do not count towards the last action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl ActivityEvent {
    pub fn ended_at(end_time: DateTime<Utc>) -> Self {
        Self {
            id: None,
            activity_type: None,
            end_time: Some(end_time),
        }
    }
}

// ---------------------------------------------------------------------------
// TestResultEvent
// ---------------------------------------------------------------------------

/// A completed test attributed to a tester. The archive may return records
/// without an end timestamp; those contribute nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultEvent {
    pub tester_staff_id: String,
    #[serde(default)]
    pub test_end_timestamp: Option<DateTime<Utc>>,
}

impl TestResultEvent {
    pub fn ended_at(tester_staff_id: impl Into<String>, end: DateTime<Utc>) -> Self {
        Self {
            tester_staff_id: tester_staff_id.into(),
            test_end_timestamp: Some(end),
        }
    }
}
