use std::sync::Arc;

use async_trait::async_trait;
use strum::VariantArray;

use crate::{
    ContactFormFields, ContactRequest, ErrorBody, Field, INVALID_RECAPTCHA, SubmitOutcome,
    Submitter,
};

/// Answer of the bot-verification provider for one token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    pub success: bool,
    pub error_codes: Vec<String>,
}

#[async_trait]
pub trait RecaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> anyhow::Result<Verification>;
}

/// Destination of accepted inquiries.
#[async_trait]
pub trait Inbox: Send + Sync {
    async fn deliver(&self, message: &ContactMessage) -> federation_shared::Result<()>;
}

/// An inquiry that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl From<ContactFormFields> for ContactMessage {
    fn from(value: ContactFormFields) -> Self {
        Self {
            name: value.name.trim().to_owned(),
            email: value.email.trim().to_owned(),
            phone: value.phone.trim().to_owned(),
            subject: value.subject.trim().to_owned(),
            message: value.message.trim().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Verification token is required")]
    MissingCaptcha,

    #[error("Verification failed")]
    InvalidRecaptcha(Vec<String>),

    #[error("Internal server error")]
    Internal,
}

impl RouteError {
    pub fn code(&self) -> &'static str {
        match self {
            RouteError::MissingFields => "missing-fields",
            RouteError::MissingCaptcha => "missing-captcha",
            RouteError::InvalidRecaptcha(_) => INVALID_RECAPTCHA,
            RouteError::Internal => "internal-error",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            RouteError::Internal => 500,
            _ => 400,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.code().to_owned(),
            message: self.to_string(),
            error_codes: match self {
                RouteError::InvalidRecaptcha(codes) => Some(codes.clone()),
                _ => None,
            },
        }
    }
}

/// Server side of the contact form: checks presence of every field and of
/// the token, verifies the token with the provider and hands the message
/// to the inbox.
#[derive(Clone)]
pub struct ContactService {
    verifier: Arc<dyn RecaptchaVerifier>,
    inbox: Arc<dyn Inbox>,
}

impl ContactService {
    pub fn new(verifier: Arc<dyn RecaptchaVerifier>, inbox: Arc<dyn Inbox>) -> Self {
        Self { verifier, inbox }
    }

    #[tracing::instrument(skip_all, fields(subject = %request.fields.subject.trim()))]
    pub async fn receive(
        &self,
        request: ContactRequest,
        remote_ip: Option<&str>,
    ) -> Result<(), RouteError> {
        let missing = Field::VARIANTS
            .iter()
            .any(|field| request.fields.get(*field).trim().is_empty());

        if missing {
            return Err(RouteError::MissingFields);
        }

        let Some(token) = request
            .recaptcha_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
        else {
            return Err(RouteError::MissingCaptcha);
        };

        let verification = match self.verifier.verify(token, remote_ip).await {
            Ok(verification) => verification,
            Err(err) => {
                tracing::error!("recaptcha verification failed: {err:#}");
                return Err(RouteError::Internal);
            }
        };

        if !verification.success {
            tracing::info!(codes = ?verification.error_codes, "recaptcha token rejected");
            return Err(RouteError::InvalidRecaptcha(verification.error_codes));
        }

        let message = ContactMessage::from(request.fields);
        if let Err(err) = self.inbox.deliver(&message).await {
            tracing::error!("contact message delivery failed: {err}");
            return Err(RouteError::Internal);
        }

        tracing::info!("contact message accepted");

        Ok(())
    }
}

/// Submits through an in-process [`ContactService`], used when the form is
/// rendered and processed by the same server.
#[derive(Clone)]
pub struct LocalSubmitter {
    service: ContactService,
    remote_ip: Option<String>,
}

impl LocalSubmitter {
    pub fn new(service: ContactService, remote_ip: Option<String>) -> Self {
        Self { service, remote_ip }
    }
}

#[async_trait]
impl Submitter for LocalSubmitter {
    async fn submit(&self, request: &ContactRequest) -> SubmitOutcome {
        match self
            .service
            .receive(request.clone(), self.remote_ip.as_deref())
            .await
        {
            Ok(()) => SubmitOutcome::Accepted,
            Err(RouteError::InvalidRecaptcha(_)) => SubmitOutcome::CaptchaRejected,
            Err(err) => SubmitOutcome::Rejected(err.to_string()),
        }
    }
}
