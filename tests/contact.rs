use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use federation_contact::Verification;
use serde_json::{Value, json};

mod common;

const FILLED: [(&str, &str); 5] = [
    ("name", "Mariam Al Suwaidi"),
    ("email", "mariam@example.ae"),
    ("phone", "+971 50 123 4567"),
    ("subject", "Junior tryouts"),
    ("message", "When do the junior tryouts start this season?"),
];

fn with_token<'a>(token: &'a str) -> Vec<(&'a str, &'a str)> {
    let mut form: Vec<(&'a str, &'a str)> = FILLED.to_vec();
    form.push(("g-recaptcha-response", token));
    form
}

fn rejected() -> Option<Verification> {
    Some(Verification {
        success: false,
        error_codes: vec!["timeout-or-duplicate".to_owned()],
    })
}

async fn post_json(app: &common::TestApp, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header("content-type", "application/json")
        .header("x-forwarded-for", "203.0.113.7")
        .body(Body::from(body))
        .unwrap();

    let response = common::send(&app.router, request).await;
    let status = response.status();
    let body = common::body_string(response).await;

    (status, serde_json::from_str(&body).unwrap())
}

fn payload(token: Option<&str>) -> Value {
    json!({
        "name": "Omar",
        "email": "omar@example.ae",
        "phone": "501234567",
        "subject": "Membership",
        "message": "How do clubs register with the federation?",
        "recaptchaToken": token,
    })
}

#[tokio::test]
async fn test_api_accepts_verified_message() {
    let app = common::create_test_app(common::passed());

    let (status, body) = post_json(&app, payload(Some("token")).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let messages = app.inbox.messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].subject, "Membership");
}

#[tokio::test]
async fn test_api_missing_fields_and_token() {
    let app = common::create_test_app(common::passed());

    let mut incomplete = payload(Some("token"));
    incomplete["message"] = json!("   ");
    let (status, body) = post_json(&app, incomplete.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing-fields");

    let (status, body) = post_json(&app, payload(None).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing-captcha");
    assert!(body.get("errorCodes").is_none());

    let (status, body) = post_json(&app, "{not json".to_owned()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing-fields");

    assert!(app.inbox.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_api_reports_rejected_token() {
    let app = common::create_test_app(rejected());

    let (status, body) = post_json(&app, payload(Some("used")).to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid-recaptcha");
    assert_eq!(body["errorCodes"], json!(["timeout-or-duplicate"]));
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_api_provider_failure_is_internal() {
    let app = common::create_test_app(None);

    let (status, body) = post_json(&app, payload(Some("token")).to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal-error");
}

#[tokio::test]
async fn test_contact_page_renders_challenge() {
    let app = common::create_test_app(common::passed());

    let response = common::get(&app.router, "/ar/contact", &[]).await;
    let body = common::body_string(response).await;

    assert!(body.contains("https://www.google.com/recaptcha/api.js?hl=ar"));
    assert!(body.contains(r#"data-sitekey="test-site-key""#));
    assert!(body.contains(r#"action="/ar/contact""#));
    assert!(body.contains(r#"data-validate="/ar/contact/validate""#));
}

#[tokio::test]
async fn test_form_without_token_keeps_fields() {
    let app = common::create_test_app(common::passed());

    let response = common::post_form(&app.router, "/contact", &FILLED).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_string(response).await;
    assert!(body.contains("Please complete the verification"));
    assert!(body.contains(r#"value="Mariam Al Suwaidi""#));
    assert!(app.inbox.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_form_shows_field_errors() {
    let app = common::create_test_app(common::passed());

    let mut form = with_token("token");
    form[2] = ("phone", "12345");
    form[4] = ("message", "Too short");

    let response = common::post_form(&app.router, "/contact", &form).await;
    let body = common::body_string(response).await;

    assert!(body.contains("Enter a valid UAE phone number"));
    assert!(body.contains("Must be at least 10 characters"));
    assert!(app.inbox.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_form_success_shows_thank_you() {
    let app = common::create_test_app(common::passed());

    let response = common::post_form(&app.router, "/contact", &with_token("token")).await;
    let body = common::body_string(response).await;

    assert!(body.contains("Thank you"));
    assert!(body.contains("Send another message"));
    assert!(!body.contains("Mariam Al Suwaidi"));
    assert_eq!(app.inbox.messages.lock().unwrap()[0].phone, "+971 50 123 4567");
}

#[tokio::test]
async fn test_form_success_in_arabic() {
    let app = common::create_test_app(common::passed());

    let response = common::post_form(&app.router, "/ar/contact", &with_token("token")).await;
    let body = common::body_string(response).await;

    assert!(body.contains("شكراً لك"));
    assert!(body.contains(r#"href="/ar/contact""#));
}

#[tokio::test]
async fn test_form_rejected_token_asks_for_new_challenge() {
    let app = common::create_test_app(rejected());

    let response = common::post_form(&app.router, "/contact", &with_token("stale")).await;
    let body = common::body_string(response).await;

    assert!(body.contains("Verification failed, please try again"));
    assert!(body.contains(r#"value="mariam@example.ae""#));
    assert!(body.contains(r#"data-generation="1""#));
}

#[tokio::test]
async fn test_form_generic_failure_keeps_fields() {
    let app = common::create_test_app(None);

    let response = common::post_form(&app.router, "/contact", &with_token("token")).await;
    let body = common::body_string(response).await;

    assert!(body.contains("Your message could not be sent"));
    assert!(body.contains(r#"value="Junior tryouts""#));
}

#[tokio::test]
async fn test_validate_single_field() {
    let app = common::create_test_app(common::passed());

    let response = common::post_form(
        &app.router,
        "/contact/validate",
        &[("field", "phone"), ("value", "123")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains(r#"id="error-phone""#));
    assert!(body.contains("Enter a valid UAE phone number"));

    let response = common::post_form(
        &app.router,
        "/contact/validate",
        &[("field", "email"), ("value", "omar@example.ae")],
    )
    .await;
    let body = common::body_string(response).await;
    assert!(body.contains(r#"role="alert"></p>"#));

    let response = common::post_form(
        &app.router,
        "/ar/contact/validate",
        &[("field", "name"), ("value", "ab")],
    )
    .await;
    let body = common::body_string(response).await;
    assert!(body.contains("يجب ألا يقل عن 3 أحرف"));

    let response = common::post_form(
        &app.router,
        "/contact/validate",
        &[("field", "age"), ("value", "12")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
