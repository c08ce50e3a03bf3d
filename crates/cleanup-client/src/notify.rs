use async_trait::async_trait;
use cleanup_core::ports::Notifier;
use cleanup_core::{CleanupError, RemoteCall, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::endpoint_url;
use crate::response::{expect_success, transport_error};

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    template_id: &'a str,
    email_address: &'a str,
    /// Lets operators trace a delivered email back to the tester.
    reference: &'a str,
}

/// Email notification service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    base_url: String,
    template_id: String,
    api_key: Option<String>,
}

impl HttpNotifier {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        template_id: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            template_id: template_id.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send_reminder(&self, tester_staff_id: &str, tester_email: &str) -> Result<()> {
        let call = RemoteCall::SendReminder;
        if self.template_id.trim().is_empty() {
            return Err(CleanupError::remote(call, None, "notify template id is not configured"));
        }

        let url = endpoint_url(&self.base_url, &["v2", "notifications", "email"])?;
        debug!(%url, tester_staff_id, "sending visit reminder");

        let mut request = self.client.post(url).json(&EmailRequest {
            template_id: &self.template_id,
            email_address: tester_email,
            reference: tester_staff_id,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| transport_error(call, e))?;
        expect_success(call, response).await?;
        info!(tester_staff_id, "visit reminder sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const TEMPLATE: &str = "2af4ff8e-af5b-4f32-80a9-d03719180647";

    #[tokio::test]
    async fn posts_template_and_address_with_bearer_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/notifications/email")
            .match_header("authorization", "Bearer secret-key")
            .match_body(Matcher::Json(serde_json::json!({
                "template_id": TEMPLATE,
                "email_address": "test1@test.com",
                "reference": "123456"
            })))
            .with_status(201)
            .with_body(r#"{"id":"n1"}"#)
            .create_async()
            .await;

        let notifier = HttpNotifier::new(
            reqwest::Client::new(),
            server.url(),
            TEMPLATE,
            Some("secret-key".into()),
        );
        notifier.send_reminder("123456", "test1@test.com").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_email_is_remote_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v2/notifications/email")
            .with_status(400)
            .with_body(r#"{"errors":[{"error":"ValidationError"}]}"#)
            .create_async()
            .await;

        let notifier = HttpNotifier::new(reqwest::Client::new(), server.url(), TEMPLATE, None);
        let err = notifier
            .send_reminder("123456", "not-an-email")
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("send_reminder failed with status 400"));
    }

    #[tokio::test]
    async fn missing_template_fails_without_calling_out() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/notifications/email")
            .expect(0)
            .create_async()
            .await;

        let notifier = HttpNotifier::new(reqwest::Client::new(), server.url(), "", None);
        let err = notifier
            .send_reminder("123456", "test1@test.com")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("template id is not configured"));
        mock.assert_async().await;
    }
}
