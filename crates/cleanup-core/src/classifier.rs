use crate::window::Thresholds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    NoAction,
    Notify,
    Close,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::NoAction => "NO_ACTION",
            Action::Notify => "NOTIFY",
            Action::Close => "CLOSE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Reason
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    VisitWithinWindow,
    LastActionOverClosure,
    LastActionOverReminder,
    LastActionUnderReminder,
    /// Evidence for the visit could not be gathered, so it was not classified.
    EvidenceUnavailable,
}

impl Reason {
    /// Operator-facing wording, using the hours the pass actually ran with.
    pub fn description(self, thresholds: &Thresholds) -> String {
        let remind = thresholds.reminder_hours();
        let close = thresholds.close_hours();
        match self {
            Reason::VisitWithinWindow => format!("visit within {remind}-hour window"),
            Reason::LastActionOverClosure => format!("last action over {close} hours ago"),
            Reason::LastActionOverReminder => format!("last action over {remind} hours ago"),
            Reason::LastActionUnderReminder => format!("last action under {remind} hours ago"),
            Reason::EvidenceUnavailable => "could not gather visit activity".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Verdict for one visit. Each variant fixes both the action and the reason,
/// so no outcome can be expressed two ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The visit itself started inside the reminder window.
    VisitTooRecent,
    /// Last action is older than the closure cut-off.
    Abandoned,
    /// Last action is older than the reminder cut-off but not the closure one.
    Idle,
    /// Last action is inside the reminder window.
    Active,
}

impl Classification {
    pub fn action(self) -> Action {
        match self {
            Classification::VisitTooRecent | Classification::Active => Action::NoAction,
            Classification::Abandoned => Action::Close,
            Classification::Idle => Action::Notify,
        }
    }

    pub fn reason(self) -> Reason {
        match self {
            Classification::VisitTooRecent => Reason::VisitWithinWindow,
            Classification::Abandoned => Reason::LastActionOverClosure,
            Classification::Idle => Reason::LastActionOverReminder,
            Classification::Active => Reason::LastActionUnderReminder,
        }
    }
}

/// Classify a visit against the pass thresholds.
///
/// Rules are checked in priority order. An instant exactly on a cut-off has
/// not crossed it: crossing is always strict `<`.
pub fn classify(
    visit_start: DateTime<Utc>,
    last_action: DateTime<Utc>,
    thresholds: &Thresholds,
) -> Classification {
    if thresholds.is_fresh(visit_start) {
        Classification::VisitTooRecent
    } else if last_action < thresholds.closure_cutoff {
        Classification::Abandoned
    } else if last_action < thresholds.reminder_cutoff {
        Classification::Idle
    } else {
        Classification::Active
    }
}
