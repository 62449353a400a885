use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use federation::{
    AppState,
    config::{
        Config, ContactConfig, LocaleConfig, ObservabilityConfig, RecaptchaConfig, ServerConfig,
    },
};
use federation_contact::{ContactMessage, ContactService, Inbox, RecaptchaVerifier, Verification};
use federation_notification::EmailConfig;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Verifier answering every token with the same verdict.
pub struct FakeVerifier {
    pub verdict: Option<Verification>,
}

#[async_trait]
impl RecaptchaVerifier for FakeVerifier {
    async fn verify(&self, _token: &str, _remote_ip: Option<&str>) -> anyhow::Result<Verification> {
        match &self.verdict {
            Some(verification) => Ok(verification.clone()),
            None => anyhow::bail!("siteverify unreachable"),
        }
    }
}

#[derive(Default)]
pub struct MemoryInbox {
    pub messages: Mutex<Vec<ContactMessage>>,
}

#[async_trait]
impl Inbox for MemoryInbox {
    async fn deliver(&self, message: &ContactMessage) -> federation_shared::Result<()> {
        self.messages.lock().unwrap().push(message.clone());

        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub inbox: Arc<MemoryInbox>,
}

pub fn config(detect_from_header: bool) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        email: EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: "noreply@federation.local".to_string(),
            contact_address: "info@federation.local".to_string(),
        },
        recaptcha: RecaptchaConfig {
            site_key: "test-site-key".to_string(),
            secret_key: "test-secret-key".to_string(),
            verify_url: "http://127.0.0.1:9/siteverify".to_string(),
        },
        locale: LocaleConfig { detect_from_header },
        contact: ContactConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

#[allow(dead_code)]
pub fn passed() -> Option<Verification> {
    Some(Verification {
        success: true,
        error_codes: vec![],
    })
}

#[allow(dead_code)]
pub fn create_test_app(verdict: Option<Verification>) -> TestApp {
    create_test_app_with(config(true), verdict)
}

pub fn create_test_app_with(config: Config, verdict: Option<Verification>) -> TestApp {
    let inbox = Arc::new(MemoryInbox::default());
    let state = AppState {
        config,
        contact: ContactService::new(Arc::new(FakeVerifier { verdict }), inbox.clone()),
    };

    TestApp {
        router: federation::router(state),
        inbox,
    }
}

#[allow(dead_code)]
pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn get(router: &Router, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    send(router, builder.body(Body::empty()).unwrap()).await
}

#[allow(dead_code)]
pub async fn post_form(router: &Router, uri: &str, form: &[(&str, &str)]) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(serde_urlencoded::to_string(form).unwrap()))
        .unwrap();

    send(router, request).await
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

#[allow(dead_code)]
pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
}
