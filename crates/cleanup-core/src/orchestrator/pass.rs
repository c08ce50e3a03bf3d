use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::classifier::{classify, Action, Reason};
use crate::config::ThresholdConfig;
use crate::decision::{Decision, Outcome, PassResult, PassStatus};
use crate::error::{CleanupError, Result};
use crate::last_action::resolve_last_action;
use crate::ports::{ActivityDirectory, Notifier, TestResultArchive};
use crate::types::{ActivityEvent, SubActivityKind, TestResultEvent, Visit};
use crate::window::{compute_windows, Thresholds};

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs cleanup passes against a set of collaborators.
///
/// Visits are evaluated one at a time so the decision log keeps processing
/// order; the three evidence fetches for a single visit run concurrently.
pub struct Orchestrator<'a> {
    directory: &'a dyn ActivityDirectory,
    archive: &'a dyn TestResultArchive,
    notifier: &'a dyn Notifier,
    thresholds: ThresholdConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        directory: &'a dyn ActivityDirectory,
        archive: &'a dyn TestResultArchive,
        notifier: &'a dyn Notifier,
        thresholds: ThresholdConfig,
    ) -> Self {
        Self {
            directory,
            archive,
            notifier,
            thresholds,
        }
    }

    /// Run one pass at `now` (or the current instant).
    ///
    /// Returns `Err` only when the cut-offs cannot be computed or open visits
    /// cannot be listed. Failures for an individual visit are recorded on its
    /// decision and the pass carries on.
    pub async fn run_pass(&self, now: Option<DateTime<Utc>>) -> Result<PassResult> {
        let reference_time = now.unwrap_or_else(Utc::now);
        let thresholds = compute_windows(reference_time, &self.thresholds)?;
        let run_id = Uuid::new_v4();

        info!(
            %run_id,
            reference_time = %reference_time.to_rfc3339(),
            reminder_cutoff = %thresholds.reminder_cutoff.to_rfc3339(),
            closure_cutoff = %thresholds.closure_cutoff.to_rfc3339(),
            "starting cleanup pass"
        );

        let open_visits = self.directory.list_open_visits().await?;
        if open_visits.is_empty() {
            info!(%run_id, "no open visits");
            return Ok(finish(run_id, thresholds, PassStatus::NothingToDo, Vec::new()));
        }

        let (fresh, to_evaluate): (Vec<Visit>, Vec<Visit>) = open_visits
            .into_iter()
            .filter(|v| {
                if !v.is_open() {
                    warn!(visit_id = %v.id, "directory returned a closed visit; skipping");
                }
                v.is_open()
            })
            .partition(|v| thresholds.is_fresh(v.start_time));

        let mut decisions: Vec<Decision> = fresh.iter().map(fresh_decision).collect();

        if to_evaluate.is_empty() {
            info!(%run_id, fresh = decisions.len(), "no visits old enough to evaluate");
            return Ok(finish(run_id, thresholds, PassStatus::NothingToDo, decisions));
        }

        for visit in &to_evaluate {
            let decision = self.evaluate(visit, &thresholds).await;
            decisions.push(decision);
        }

        Ok(finish(run_id, thresholds, PassStatus::Completed, decisions))
    }

    async fn evaluate(&self, visit: &Visit, thresholds: &Thresholds) -> Decision {
        let (activities, test_results) = match self.gather_evidence(visit).await {
            Ok(evidence) => evidence,
            Err(e) => {
                warn!(visit_id = %visit.id, error = %e, "could not gather evidence for visit");
                return Decision {
                    visit_id: visit.id.clone(),
                    tester_staff_id: visit.tester_staff_id.clone(),
                    visit_start_time: visit.start_time,
                    last_action_time: None,
                    action: Action::NoAction,
                    reason: Reason::EvidenceUnavailable,
                    outcome: Outcome::Failure,
                    error: Some(e.to_string()),
                };
            }
        };

        let last_action = resolve_last_action(visit, &activities, &test_results);
        let classification = classify(visit.start_time, last_action, thresholds);
        let action = classification.action();

        debug!(
            visit_id = %visit.id,
            last_action = %last_action.to_rfc3339(),
            %action,
            "classified visit"
        );

        let effect = match action {
            Action::Close => self.directory.end_visit(&visit.id, last_action).await,
            Action::Notify => self.remind(visit).await,
            Action::NoAction => Ok(()),
        };

        let (outcome, error) = match effect {
            Ok(()) => (Outcome::Success, None),
            Err(e) => {
                warn!(visit_id = %visit.id, %action, error = %e, "side effect failed");
                (Outcome::Failure, Some(e.to_string()))
            }
        };

        Decision {
            visit_id: visit.id.clone(),
            tester_staff_id: visit.tester_staff_id.clone(),
            visit_start_time: visit.start_time,
            last_action_time: Some(last_action),
            action,
            reason: classification.reason(),
            outcome,
            error,
        }
    }

    /// Wait activities, unaccountable activities and test results, fetched
    /// together. The first failure wins and names its call.
    async fn gather_evidence(
        &self,
        visit: &Visit,
    ) -> Result<(Vec<ActivityEvent>, Vec<TestResultEvent>)> {
        let staff_id = visit.tester_staff_id.as_str();
        let (mut activities, unaccountable, test_results) = tokio::try_join!(
            self.directory
                .list_sub_activities(SubActivityKind::Wait, visit.start_time, staff_id),
            self.directory.list_sub_activities(
                SubActivityKind::UnaccountableTime,
                visit.start_time,
                staff_id
            ),
            self.archive.list_test_results(staff_id, visit.start_time),
        )?;
        activities.extend(unaccountable);
        Ok((activities, test_results))
    }

    async fn remind(&self, visit: &Visit) -> Result<()> {
        let email = visit
            .tester_email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| CleanupError::MissingTesterEmail(visit.id.clone()))?;
        self.notifier
            .send_reminder(&visit.tester_staff_id, email)
            .await
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fresh_decision(visit: &Visit) -> Decision {
    Decision {
        visit_id: visit.id.clone(),
        tester_staff_id: visit.tester_staff_id.clone(),
        visit_start_time: visit.start_time,
        last_action_time: Some(visit.start_time),
        action: Action::NoAction,
        reason: Reason::VisitWithinWindow,
        outcome: Outcome::Success,
        error: None,
    }
}

fn finish(
    run_id: Uuid,
    thresholds: Thresholds,
    status: PassStatus,
    decisions: Vec<Decision>,
) -> PassResult {
    let result = PassResult {
        run_id,
        thresholds,
        status,
        decisions,
    };

    match serde_json::to_string(&result.decisions) {
        Ok(log) => info!(
            %run_id,
            status = ?result.status,
            closed = result.count(Action::Close),
            notified = result.count(Action::Notify),
            failures = result.failures().count(),
            decisions = %log,
            "cleanup pass finished"
        ),
        Err(e) => warn!(%run_id, error = %e, "could not serialise decision log"),
    }

    result
}
