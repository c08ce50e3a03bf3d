use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cleanup_core::ports::TestResultArchive;
use cleanup_core::types::TestResultEvent;
use cleanup_core::{RemoteCall, Result};
use serde::Serialize;
use tracing::debug;

use crate::response::{read_json, transport_error};
use crate::{endpoint_url, format_instant};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TestResultQuery<'a> {
    tester_staff_id: &'a str,
    from_date_time: String,
    to_date_time: String,
}

/// Test result archive reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTestResultArchive {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTestResultArchive {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TestResultArchive for HttpTestResultArchive {
    async fn list_test_results(
        &self,
        tester_staff_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<TestResultEvent>> {
        let call = RemoteCall::ListTestResults;
        let url = endpoint_url(
            &self.base_url,
            &["test-results", "getTestResultsByTesterStaffId"],
        )?;
        let query = TestResultQuery {
            tester_staff_id,
            from_date_time: format_instant(since),
            to_date_time: format_instant(Utc::now()),
        };
        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| transport_error(call, e))?;

        let results: Option<Vec<TestResultEvent>> = read_json(call, response).await?;
        if results.is_none() {
            debug!(tester_staff_id, "no test results returned");
        }
        Ok(results.unwrap_or_default())
    }
}
