use crate::types::{ActivityEvent, TestResultEvent, Visit};
use chrono::{DateTime, Utc};

/// The most recent action attributable to a visit.
///
/// Takes the latest of the sub-activity end times and test end timestamps,
/// compared as instants. Falls back to the visit's own start time when
/// neither source has anything.
pub fn resolve_last_action(
    visit: &Visit,
    activities: &[ActivityEvent],
    test_results: &[TestResultEvent],
) -> DateTime<Utc> {
    let activity_ends = activities.iter().filter_map(|a| a.end_time);
    let test_ends = test_results.iter().filter_map(|t| t.test_end_timestamp);

    activity_ends
        .chain(test_ends)
        .max()
        .unwrap_or(visit.start_time)
}
