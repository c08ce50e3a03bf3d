//! Audit records produced by a cleanup pass.

use crate::classifier::{Action, Reason};
use crate::window::Thresholds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// What the pass decided for one visit and whether the side effect worked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub visit_id: String,
    pub tester_staff_id: String,
    pub visit_start_time: DateTime<Utc>,
    /// `None` only when the visit's evidence could not be fetched.
    pub last_action_time: Option<DateTime<Utc>>,
    pub action: Action,
    pub reason: Reason,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Decision {
    pub fn is_failure(&self) -> bool {
        self.outcome == Outcome::Failure
    }

    /// Human-readable status line for logs and tables.
    pub fn status_label(&self) -> &'static str {
        match (self.action, self.outcome) {
            (Action::Close, Outcome::Success) => "Closed",
            (Action::Close, Outcome::Failure) => "Failed to close",
            (Action::Notify, Outcome::Success) => "Notification email sent",
            (Action::Notify, Outcome::Failure) => "Notification email failed to send",
            (Action::NoAction, Outcome::Success) => "No action",
            (Action::NoAction, Outcome::Failure) => "Evaluation failed",
        }
    }
}

// ---------------------------------------------------------------------------
// PassStatus / PassResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassStatus {
    /// No open visits, or none old enough to evaluate.
    NothingToDo,
    /// Visits were evaluated; individual failures live in the decisions.
    Completed,
}

impl PassStatus {
    pub fn message(self) -> &'static str {
        match self {
            PassStatus::NothingToDo => "No stale visits found. Nothing to act on.",
            PassStatus::Completed => "Cleanup Success",
        }
    }
}

impl fmt::Display for PassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassResult {
    pub run_id: Uuid,
    pub thresholds: Thresholds,
    pub status: PassStatus,
    pub decisions: Vec<Decision>,
}

impl PassResult {
    pub fn failures(&self) -> impl Iterator<Item = &Decision> {
        self.decisions.iter().filter(|d| d.is_failure())
    }

    pub fn count(&self, action: Action) -> usize {
        self.decisions.iter().filter(|d| d.action == action).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(action: Action, outcome: Outcome) -> Decision {
        Decision {
            visit_id: "v1".into(),
            tester_staff_id: "132".into(),
            visit_start_time: "2020-03-05T13:00:00Z".parse().unwrap(),
            last_action_time: Some("2020-03-05T13:00:00Z".parse().unwrap()),
            action,
            reason: Reason::LastActionOverClosure,
            outcome,
            error: None,
        }
    }

    #[test]
    fn status_labels_follow_action_and_outcome() {
        assert_eq!(decision(Action::Close, Outcome::Success).status_label(), "Closed");
        assert_eq!(
            decision(Action::Notify, Outcome::Failure).status_label(),
            "Notification email failed to send"
        );
    }

    #[test]
    fn decision_json_omits_absent_error() {
        let json = serde_json::to_value(decision(Action::Close, Outcome::Success)).unwrap();
        assert_eq!(json["action"], "CLOSE");
        assert_eq!(json["outcome"], "success");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn nothing_to_do_message_matches_operator_wording() {
        assert_eq!(
            PassStatus::NothingToDo.to_string(),
            "No stale visits found. Nothing to act on."
        );
    }
}
