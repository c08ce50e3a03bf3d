use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cleanup_core::ports::ActivityDirectory;
use cleanup_core::types::{ActivityEvent, SubActivityKind, Visit};
use cleanup_core::{RemoteCall, Result};
use serde::Serialize;
use tracing::debug;

use crate::response::{expect_success, read_json, transport_error};
use crate::{endpoint_url, format_instant};

/// Earliest start time used when listing open visits. Open visits are not
/// bounded by age, so this predates any visit the directory can hold.
pub const OPEN_VISITS_FROM: &str = "2020-01-01T00:00:00.000Z";

const VISIT_ACTIVITY_TYPE: &str = "visit";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActivityQuery<'a> {
    from_start_time: &'a str,
    to_start_time: &'a str,
    activity_type: &'a str,
    is_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tester_staff_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EndVisitBody {
    end_time: String,
}

/// Activity directory reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpActivityDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpActivityDirectory {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn query<T: serde::de::DeserializeOwned>(
        &self,
        call: RemoteCall,
        query: &ActivityQuery<'_>,
    ) -> Result<Vec<T>> {
        let url = endpoint_url(&self.base_url, &["activities", "cleanup"])?;
        debug!(%call, %url, activity_type = query.activity_type, "querying activities");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(call, e))?;
        Ok(read_json(call, response).await?.unwrap_or_default())
    }
}

#[async_trait]
impl ActivityDirectory for HttpActivityDirectory {
    async fn list_open_visits(&self) -> Result<Vec<Visit>> {
        let now = format_instant(Utc::now());
        let query = ActivityQuery {
            from_start_time: OPEN_VISITS_FROM,
            to_start_time: &now,
            activity_type: VISIT_ACTIVITY_TYPE,
            is_open: true,
            tester_staff_id: None,
        };
        self.query(RemoteCall::ListOpenVisits, &query).await
    }

    async fn list_sub_activities(
        &self,
        kind: SubActivityKind,
        visit_start: DateTime<Utc>,
        tester_staff_id: &str,
    ) -> Result<Vec<ActivityEvent>> {
        let from = format_instant(visit_start);
        let now = format_instant(Utc::now());
        let query = ActivityQuery {
            from_start_time: &from,
            to_start_time: &now,
            activity_type: kind.as_str(),
            is_open: false,
            tester_staff_id: Some(tester_staff_id),
        };
        self.query(RemoteCall::ListSubActivities(kind), &query)
            .await
    }

    async fn end_visit(&self, visit_id: &str, end_time: DateTime<Utc>) -> Result<()> {
        let call = RemoteCall::EndVisit;
        let url = endpoint_url(&self.base_url, &["activities", visit_id, "end"])?;
        debug!(%url, "ending visit");
        let response = self
            .client
            .put(url)
            .json(&EndVisitBody {
                end_time: format_instant(end_time),
            })
            .send()
            .await
            .map_err(|e| transport_error(call, e))?;
        expect_success(call, response).await
    }
}
