use crate::types::SubActivityKind;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// RemoteCall
// ---------------------------------------------------------------------------

/// Identifies which collaborator call failed, so a decision's error detail
/// can name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    ListOpenVisits,
    ListSubActivities(SubActivityKind),
    EndVisit,
    ListTestResults,
    SendReminder,
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteCall::ListOpenVisits => f.write_str("list_open_visits"),
            RemoteCall::ListSubActivities(kind) => write!(f, "list_sub_activities({kind})"),
            RemoteCall::EndVisit => f.write_str("end_visit"),
            RemoteCall::ListTestResults => f.write_str("list_test_results"),
            RemoteCall::SendReminder => f.write_str("send_reminder"),
        }
    }
}

// ---------------------------------------------------------------------------
// CleanupError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("{call} failed{}: {message}", status_suffix(.status))]
    Remote {
        call: RemoteCall,
        status: Option<u16>,
        message: String,
    },

    #[error("visit {0} has no tester email on record")]
    MissingTesterEmail(String),

    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CleanupError {
    pub fn remote(call: RemoteCall, status: Option<u16>, message: impl Into<String>) -> Self {
        CleanupError::Remote {
            call,
            status,
            message: message.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|s| format!(" with status {s}"))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, CleanupError>;
