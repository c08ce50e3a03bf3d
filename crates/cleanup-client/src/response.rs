use cleanup_core::{CleanupError, RemoteCall, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Interpret a service response.
///
/// 200 and 201 carry a JSON body; 404 means "nothing there" and yields
/// `None`; anything else is a remote failure tagged with `call`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    call: RemoteCall,
    response: reqwest::Response,
) -> Result<Option<T>> {
    let status = response.status();
    match status {
        StatusCode::OK | StatusCode::CREATED => {
            let body = response
                .text()
                .await
                .map_err(|e| transport_error(call, e))?;
            if body.trim().is_empty() {
                return Err(CleanupError::remote(
                    call,
                    Some(status.as_u16()),
                    "service returned an empty body",
                ));
            }
            let parsed = serde_json::from_str(&body).map_err(|e| {
                CleanupError::remote(
                    call,
                    Some(status.as_u16()),
                    format!("service returned bad data: {e}"),
                )
            })?;
            Ok(Some(parsed))
        }
        StatusCode::NOT_FOUND => Ok(None),
        _ => Err(status_error(call, response).await),
    }
}

/// Interpret a response whose body does not matter.
pub(crate) async fn expect_success(call: RemoteCall, response: reqwest::Response) -> Result<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(status_error(call, response).await)
    }
}

pub(crate) fn transport_error(call: RemoteCall, err: reqwest::Error) -> CleanupError {
    CleanupError::remote(call, err.status().map(|s| s.as_u16()), err.to_string())
}

async fn status_error(call: RemoteCall, response: reqwest::Response) -> CleanupError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        "service returned an error with an empty body".to_string()
    } else {
        body
    };
    CleanupError::remote(call, Some(status), message)
}
