//! `cleanup-client`: HTTP adapters for the collaborators of a cleanup pass.
//!
//! Each adapter implements one of the `cleanup_core::ports` traits over a
//! shared `reqwest::Client`:
//!
//! ```text
//! CleanupConfig
//!     │
//!     ▼
//! HttpServices::from_config ── one reqwest::Client (timeout from config)
//!     │
//!     ├── HttpActivityDirectory  → GET  /activities/cleanup
//!     │                            PUT  /activities/{id}/end
//!     ├── HttpTestResultArchive  → GET  /test-results/getTestResultsByTesterStaffId
//!     └── HttpNotifier           → POST /v2/notifications/email
//! ```
//!
//! A 404 from a listing endpoint is an empty result, never an error.

pub mod activities;
pub mod notify;
pub mod test_results;

mod response;

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use cleanup_core::config::CleanupConfig;
use cleanup_core::{CleanupError, Result};
use reqwest::Url;

pub use activities::HttpActivityDirectory;
pub use notify::HttpNotifier;
pub use test_results::HttpTestResultArchive;

/// The three HTTP adapters, built from one config.
#[derive(Debug, Clone)]
pub struct HttpServices {
    pub directory: HttpActivityDirectory,
    pub archive: HttpTestResultArchive,
    pub notifier: HttpNotifier,
}

impl HttpServices {
    pub fn from_config(config: &CleanupConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if config.services.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.services.request_timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| CleanupError::InvalidConfig(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            directory: HttpActivityDirectory::new(
                client.clone(),
                &config.services.activities_url,
            ),
            archive: HttpTestResultArchive::new(client.clone(), &config.services.test_results_url),
            notifier: HttpNotifier::new(
                client,
                &config.notify.base_url,
                &config.notify.template_id,
                config.notify.api_key(),
            ),
        })
    }
}

/// Timestamps go over the wire as fixed-width UTC with milliseconds.
pub(crate) fn format_instant(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Append percent-encoded path segments to a configured base URL.
pub(crate) fn endpoint_url(base: &str, segments: &[&str]) -> Result<Url> {
    let invalid = || CleanupError::InvalidConfig(format!("'{base}' cannot be used as a base URL"));
    let mut url = Url::parse(base).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instants_are_fixed_width_utc() {
        let t: DateTime<Utc> = "2020-03-05T17:29:45Z".parse().unwrap();
        assert_eq!(format_instant(t), "2020-03-05T17:29:45.000Z");
    }

    #[test]
    fn endpoint_url_handles_trailing_slash() {
        let segments = ["activities", "cleanup"];
        assert_eq!(
            endpoint_url("http://localhost:3004/", &segments).unwrap().as_str(),
            "http://localhost:3004/activities/cleanup"
        );
        assert_eq!(
            endpoint_url("http://localhost:3004", &segments).unwrap().as_str(),
            "http://localhost:3004/activities/cleanup"
        );
        assert_eq!(
            endpoint_url("http://gateway/api/", &segments).unwrap().as_str(),
            "http://gateway/api/activities/cleanup"
        );
    }

    #[test]
    fn endpoint_url_encodes_segments() {
        let url = endpoint_url("http://localhost:3004", &["activities", "v 1/x", "end"]).unwrap();
        assert_eq!(url.path(), "/activities/v%201%2Fx/end");
    }

    #[test]
    fn endpoint_url_rejects_bad_base() {
        let err = endpoint_url("localhost:3004", &["activities"]).unwrap_err();
        assert!(matches!(err, CleanupError::InvalidConfig(_)));
    }

    #[test]
    fn services_build_from_default_config() {
        assert!(HttpServices::from_config(&CleanupConfig::default()).is_ok());
    }
}
