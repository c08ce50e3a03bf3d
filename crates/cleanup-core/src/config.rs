use crate::error::{CleanupError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides `notify.template_id`.
pub const TEMPLATE_ID_ENV: &str = "TEMPLATE_ID";

/// Largest accepted threshold: one year.
pub const MAX_THRESHOLD_HOURS: u32 = 24 * 365;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ThresholdConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_reminder_after")]
    pub reminder_after_hours: u32,
    #[serde(default = "default_close_after")]
    pub close_after_hours: u32,
}

fn default_reminder_after() -> u32 {
    3
}

fn default_close_after() -> u32 {
    4
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            reminder_after_hours: default_reminder_after(),
            close_after_hours: default_close_after(),
        }
    }
}

impl ThresholdConfig {
    /// `None` when the hours do not fit a `chrono::Duration`.
    pub fn reminder_after(&self) -> Option<chrono::Duration> {
        chrono::Duration::try_hours(i64::from(self.reminder_after_hours))
    }

    pub fn close_after(&self) -> Option<chrono::Duration> {
        chrono::Duration::try_hours(i64::from(self.close_after_hours))
    }
}

// ---------------------------------------------------------------------------
// ServicesConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default = "default_activities_url")]
    pub activities_url: String,
    #[serde(default = "default_test_results_url")]
    pub test_results_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_activities_url() -> String {
    "http://localhost:3004".to_string()
}

fn default_test_results_url() -> String {
    "http://localhost:3005".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            activities_url: default_activities_url(),
            test_results_url: default_test_results_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// NotifyConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_notify_url")]
    pub base_url: String,
    #[serde(default)]
    pub template_id: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never lives in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_notify_url() -> String {
    "https://api.notifications.service.gov.uk".to_string()
}

fn default_api_key_env() -> String {
    "NOTIFY_API_KEY".to_string()
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            base_url: default_notify_url(),
            template_id: String::new(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl NotifyConfig {
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// CleanupConfig (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupConfig {
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl CleanupConfig {
    /// Load from `path` and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut cfg = Self::load_file(path)?;
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CleanupError::ConfigNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: CleanupConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(template_id) = lookup(TEMPLATE_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.notify.template_id = template_id;
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let t = &self.thresholds;

        if t.reminder_after_hours == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "thresholds.reminder_after_hours must be greater than zero".to_string(),
            });
        }

        if t.close_after_hours <= t.reminder_after_hours {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "thresholds.close_after_hours ({}) must be greater than reminder_after_hours ({})",
                    t.close_after_hours, t.reminder_after_hours
                ),
            });
        }

        for (field, hours) in [
            ("reminder_after_hours", t.reminder_after_hours),
            ("close_after_hours", t.close_after_hours),
        ] {
            if hours > MAX_THRESHOLD_HOURS {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "thresholds.{field} ({hours}) exceeds the maximum of {MAX_THRESHOLD_HOURS}"
                    ),
                });
            }
        }

        for (field, value) in [
            ("services.activities_url", &self.services.activities_url),
            ("services.test_results_url", &self.services.test_results_url),
            ("notify.base_url", &self.notify.base_url),
        ] {
            if let Err(message) = check_http_url(field, value) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message,
                });
            }
        }

        if self.services.request_timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "services.request_timeout_secs is 0; requests will never time out"
                    .to_string(),
            });
        }

        if self.notify.template_id.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "notify.template_id is empty and {TEMPLATE_ID_ENV} is not set; reminders will fail"
                ),
            });
        }

        warnings
    }

    pub fn has_errors(&self) -> bool {
        self.validate().iter().any(|w| w.level == WarnLevel::Error)
    }
}

fn check_http_url(field: &str, raw: &str) -> std::result::Result<Url, String> {
    let url = Url::parse(raw).map_err(|err| format!("{field} '{raw}' is not a valid URL: {err}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("{field} '{raw}' has unsupported scheme: {other}")),
    }
    if url.host_str().is_none() {
        return Err(format!("{field} '{raw}' has no host"));
    }
    Ok(url)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
