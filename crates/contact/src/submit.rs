use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ContactFormFields;

/// Error sentinel the verification route uses when the bot-verification
/// token is rejected.
pub const INVALID_RECAPTCHA: &str = "invalid-recaptcha";

/// Body of a contact submission, as posted to the verification route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(flatten)]
    pub fields: ContactFormFields,
    #[serde(default)]
    pub recaptcha_token: Option<String>,
}

/// Failure body returned by the verification route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(
        rename = "errorCodes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_codes: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// The bot-verification token was rejected; a fresh challenge is needed.
    CaptchaRejected,
    /// Transport failure, server failure or any other rejection.
    Rejected(String),
}

/// Delivers a submission and reports how it went. Implementations never
/// fail: every error is folded into [`SubmitOutcome::Rejected`].
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, request: &ContactRequest) -> SubmitOutcome;
}

/// Posts submissions as JSON to the remote verification route.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn submit(&self, request: &ContactRequest) -> SubmitOutcome {
        let response = match self.client.post(&self.endpoint).json(request).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("contact submission failed to send: {err}");
                return SubmitOutcome::Rejected(err.to_string());
            }
        };

        let status = response.status();
        if status.is_success() {
            return SubmitOutcome::Accepted;
        }

        match response.json::<ErrorBody>().await {
            Ok(body) if body.error == INVALID_RECAPTCHA => SubmitOutcome::CaptchaRejected,
            Ok(body) => {
                tracing::warn!(status = %status, error = %body.error, "contact submission rejected");
                SubmitOutcome::Rejected(body.message)
            }
            Err(err) => {
                tracing::warn!(status = %status, "unreadable contact rejection: {err}");
                SubmitOutcome::Rejected(format!("request failed with status {status}"))
            }
        }
    }
}
