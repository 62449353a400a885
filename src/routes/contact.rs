use std::str::FromStr;

use axum::{
    extract::{Form, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use federation_contact::{
    ContactForm, ContactFormFields, Field, FieldError, LocalSubmitter, SubmissionState,
    validate_field,
};
use serde::Deserialize;

use crate::{
    routes::{AppState, client_ip},
    template::{Page, Shell, Template, filters},
};

pub struct InputView {
    pub name: &'static str,
    pub label: String,
    pub kind: &'static str,
    pub autocomplete: &'static str,
    pub value: String,
    pub hint: Option<String>,
    pub error: Option<String>,
}

#[derive(askama::Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub shell: Shell,
    pub action: String,
    pub validate_url: String,
    pub site_key: String,
    pub challenge_generation: u64,
    pub succeeded: bool,
    pub inputs: Vec<InputView>,
    pub form_error: Option<String>,
}

#[derive(askama::Template)]
#[template(path = "partials/field-error.html")]
pub struct FieldErrorTemplate {
    pub name: &'static str,
    pub message: Option<String>,
}

fn field_error_message(template: &Template, error: FieldError) -> String {
    match error {
        FieldError::TooShort { min } => {
            rust_i18n::t!(error.key(), locale = template.locale().tag(), min = min).to_string()
        }
        _ => template.translate(error.key()),
    }
}

fn render(template: &Template, state: &AppState, form: &ContactForm) -> Response {
    let inputs = [
        (Field::Name, "text", "name", "contact_name", None),
        (Field::Email, "email", "email", "contact_email", None),
        (Field::Phone, "tel", "tel", "contact_phone", Some("contact_phone_hint")),
        (Field::Subject, "text", "off", "contact_subject", None),
        (Field::Message, "textarea", "off", "contact_message", None),
    ]
    .into_iter()
    .map(|(field, kind, autocomplete, label, hint)| InputView {
        name: field.into(),
        label: template.translate(label),
        kind,
        autocomplete,
        value: form.fields().get(field).to_owned(),
        hint: hint.map(|key| template.translate(key)),
        error: form
            .error(field)
            .map(|error| field_error_message(template, error)),
    })
    .collect();

    template.render(ContactTemplate {
        shell: template.shell(Some(Page::Contact)),
        action: template.link(Page::Contact.path()),
        validate_url: template.link("/contact/validate"),
        site_key: state.config.recaptcha.site_key.to_owned(),
        challenge_generation: form.challenge_generation(),
        succeeded: form.state() == &SubmissionState::Succeeded,
        inputs,
        form_error: form.form_error().map(|error| template.translate(error.key())),
    })
}

pub async fn page(template: Template, State(state): State<AppState>) -> impl IntoResponse {
    render(&template, &state, &ContactForm::new())
}

#[derive(Deserialize)]
pub struct ActionInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    /// Filled by the challenge widget.
    #[serde(rename = "g-recaptcha-response", default)]
    pub recaptcha_token: Option<String>,
}

/// POST /contact - submission from the server-rendered form.
pub async fn action(
    template: Template,
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<ActionInput>,
) -> impl IntoResponse {
    let fields = ContactFormFields {
        name: input.name,
        email: input.email,
        phone: input.phone,
        subject: input.subject,
        message: input.message,
    };

    let mut form = ContactForm::restore(fields, input.recaptcha_token);
    let submitter = LocalSubmitter::new(state.contact.clone(), client_ip(&headers));

    match form.submit(&submitter).await {
        Ok(outcome) => tracing::info!(outcome = ?outcome, "contact form submitted"),
        Err(blocked) => tracing::debug!("contact form not submitted: {blocked}"),
    }

    render(&template, &state, &form)
}

#[derive(Deserialize)]
pub struct ValidateInput {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

/// POST /contact/validate - checks one field on change or blur and returns
/// its inline error fragment.
pub async fn validate(template: Template, Form(input): Form<ValidateInput>) -> Response {
    let Ok(field) = Field::from_str(&input.field) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let message = validate_field(field, &input.value)
        .err()
        .map(|error| field_error_message(&template, error));

    template.render(FieldErrorTemplate {
        name: field.into(),
        message,
    })
}
