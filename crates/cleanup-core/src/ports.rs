//! Contracts for the services a cleanup pass talks to.
//!
//! Implementations must map a remote "not found" to an empty collection and
//! reserve `Err` for genuine failures.

use crate::error::Result;
use crate::types::{ActivityEvent, SubActivityKind, TestResultEvent, Visit};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ActivityDirectory: Send + Sync {
    /// Every currently open visit, across all testers.
    async fn list_open_visits(&self) -> Result<Vec<Visit>>;

    /// Sub-activities of `kind` for the tester from `visit_start` to now.
    async fn list_sub_activities(
        &self,
        kind: SubActivityKind,
        visit_start: DateTime<Utc>,
        tester_staff_id: &str,
    ) -> Result<Vec<ActivityEvent>>;

    async fn end_visit(&self, visit_id: &str, end_time: DateTime<Utc>) -> Result<()>;
}

#[async_trait]
pub trait TestResultArchive: Send + Sync {
    /// Test results recorded for the tester from `since` to now.
    async fn list_test_results(
        &self,
        tester_staff_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<TestResultEvent>>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_reminder(&self, tester_staff_id: &str, tester_email: &str) -> Result<()>;
}
