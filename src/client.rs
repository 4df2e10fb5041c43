use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::input::FeatureVector;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("request to prediction backend failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error(
        "prediction backend returned {status}: {}",
        .detail.as_deref().unwrap_or("no error detail")
    )]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("failed to parse prediction response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Sends feature vectors to the prediction endpoint. One POST per call, no
/// retries.
#[derive(Clone, Debug)]
pub struct PredictionClient {
    http: reqwest::Client,
    url: String,
}

impl PredictionClient {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the decoded JSON body of a 2xx response. Any other status is
    /// an error whatever the body says; the backend's `error` field, when
    /// present, is kept for the log.
    pub async fn predict(&self, features: &FeatureVector) -> Result<Value, SubmitError> {
        debug!(
            "[cardioml] POST {} with {} features",
            self.url,
            features.len()
        );
        let resp = self
            .http
            .post(&self.url)
            .json(features)
            .send()
            .await
            .map_err(SubmitError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.json::<Value>().await.ok().and_then(|body| {
                body.get("error")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            return Err(SubmitError::Status { status, detail });
        }

        resp.json::<Value>().await.map_err(SubmitError::Decode)
    }
}
