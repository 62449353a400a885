use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use crate::{RecaptchaVerifier, Verification};

pub const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
    #[serde(default)]
    hostname: Option<String>,
}

/// Google reCAPTCHA `siteverify` client.
#[derive(Debug, Clone)]
pub struct GoogleRecaptcha {
    client: reqwest::Client,
    secret: String,
    verify_url: String,
}

impl GoogleRecaptcha {
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_url(secret, SITEVERIFY_URL)
    }

    pub fn with_url(secret: impl Into<String>, verify_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret: secret.into(),
            verify_url: verify_url.into(),
        }
    }
}

#[async_trait]
impl RecaptchaVerifier for GoogleRecaptcha {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> anyhow::Result<Verification> {
        let mut form = vec![("secret", self.secret.as_str()), ("response", token)];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip));
        }

        let response = self
            .client
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await
            .context("Failed to reach reCAPTCHA siteverify")?;

        if !response.status().is_success() {
            anyhow::bail!("reCAPTCHA siteverify answered {}", response.status());
        }

        let body: SiteVerifyResponse = response
            .json()
            .await
            .context("Failed to parse reCAPTCHA siteverify response")?;

        tracing::debug!(
            success = body.success,
            hostname = body.hostname.as_deref().unwrap_or_default(),
            "reCAPTCHA token verified"
        );

        Ok(Verification {
            success: body.success,
            error_codes: body.error_codes,
        })
    }
}
