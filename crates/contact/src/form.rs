//! Contact form state machine.
//!
//! `Idle → Submitting → {Succeeded, Failed}`, `Succeeded → Idle` through
//! [`ContactForm::send_another`] and `Failed → Idle` as soon as the visitor
//! edits the form, re-verifies or retries.

use crate::{
    ContactFormFields, ContactRequest, Field, FieldError, FieldErrors, SubmitOutcome, Submitter,
    validate_field,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    CaptchaRejected,
    Generic(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(FailureReason),
}

/// Form-level message, shown apart from the per-field ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please complete the verification challenge")]
    CaptchaRequired,

    #[error("Verification failed, please complete the challenge again")]
    CaptchaRejected,

    #[error("Your message could not be sent, please try again later")]
    SubmissionFailed,
}

impl FormError {
    pub fn key(&self) -> &'static str {
        match self {
            FormError::CaptchaRequired => "captcha_required",
            FormError::CaptchaRejected => "captcha_rejected",
            FormError::SubmissionFailed => "submission_failed",
        }
    }
}

/// Why [`ContactForm::begin_submit`] refused to start a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Blocked {
    #[error("some fields are invalid")]
    Invalid,

    #[error("verification token missing")]
    CaptchaRequired,

    #[error("a submission is already in flight")]
    InFlight,

    #[error("message already sent")]
    Completed,

    #[error("form is no longer mounted")]
    Unmounted,
}

/// Ticket for the single in-flight submission. Hand it back to
/// [`ContactForm::finish`] with the outcome of the request.
#[derive(Debug)]
pub struct Submission {
    attempt: u64,
    request: ContactRequest,
}

impl Submission {
    pub fn request(&self) -> &ContactRequest {
        &self.request
    }
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    fields: ContactFormFields,
    errors: FieldErrors,
    form_error: Option<FormError>,
    captcha_token: Option<String>,
    state: SubmissionState,
    challenge_generation: u64,
    attempt: u64,
    mounted: bool,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            fields: ContactFormFields::default(),
            errors: FieldErrors::default(),
            form_error: None,
            captcha_token: None,
            state: SubmissionState::Idle,
            challenge_generation: 0,
            attempt: 0,
            mounted: true,
        }
    }

    /// Rebuilds a form from values posted by a browser without client-side
    /// scripting. Nothing is validated until the next change or submit.
    pub fn restore(fields: ContactFormFields, captcha_token: Option<String>) -> Self {
        let mut form = Self::new();
        form.fields = fields;
        form.captcha_token = captcha_token.filter(|token| !token.trim().is_empty());
        form
    }

    pub fn fields(&self) -> &ContactFormFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors.get(field)
    }

    pub fn form_error(&self) -> Option<FormError> {
        self.form_error
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn captcha_token(&self) -> Option<&str> {
        self.captcha_token.as_deref()
    }

    /// Bumped every time the verification widget must be reset and a fresh
    /// challenge requested. Widgets are keyed on it.
    pub fn challenge_generation(&self) -> u64 {
        self.challenge_generation
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.mounted
            && !matches!(
                self.state,
                SubmissionState::Submitting | SubmissionState::Succeeded
            )
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Change event: stores the value and revalidates only that field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if !self.mounted {
            return;
        }

        self.fields.set(field, value);
        self.revalidate(field);
        self.leave_failed();
    }

    /// Blur event: revalidates the field with its current value.
    pub fn blur(&mut self, field: Field) {
        if !self.mounted {
            return;
        }

        self.revalidate(field);
    }

    /// Callback of the verification widget; `None` when the challenge
    /// expired or was reset.
    pub fn set_captcha_token(&mut self, token: Option<String>) {
        if !self.mounted {
            return;
        }

        self.captcha_token = token.filter(|token| !token.trim().is_empty());

        if self.captcha_token.is_some() {
            if matches!(
                self.form_error,
                Some(FormError::CaptchaRequired | FormError::CaptchaRejected)
            ) {
                self.form_error = None;
            }
            self.leave_failed();
        }
    }

    /// Validates the whole form and, when everything passes, moves to
    /// `Submitting` and hands out the request to send.
    pub fn begin_submit(&mut self) -> Result<Submission, Blocked> {
        if !self.mounted {
            return Err(Blocked::Unmounted);
        }

        match self.state {
            SubmissionState::Submitting => return Err(Blocked::InFlight),
            SubmissionState::Succeeded => return Err(Blocked::Completed),
            SubmissionState::Idle | SubmissionState::Failed(_) => {}
        }

        self.errors = self.fields.check();

        let Some(token) = self.captcha_token.clone() else {
            self.state = SubmissionState::Idle;
            self.form_error = Some(FormError::CaptchaRequired);

            return Err(if self.errors.is_empty() {
                Blocked::CaptchaRequired
            } else {
                Blocked::Invalid
            });
        };

        if !self.errors.is_empty() {
            self.state = SubmissionState::Idle;
            self.form_error = None;
            return Err(Blocked::Invalid);
        }

        self.attempt += 1;
        self.state = SubmissionState::Submitting;
        self.form_error = None;

        tracing::debug!(attempt = self.attempt, "contact submission started");

        Ok(Submission {
            attempt: self.attempt,
            request: ContactRequest {
                fields: self.fields.clone(),
                recaptcha_token: Some(token),
            },
        })
    }

    /// Applies the outcome of `submission`. Returns `false` when the outcome
    /// was ignored because the form was torn down or the ticket is stale.
    pub fn finish(&mut self, submission: Submission, outcome: SubmitOutcome) -> bool {
        if !self.mounted
            || self.state != SubmissionState::Submitting
            || submission.attempt != self.attempt
        {
            tracing::debug!(
                attempt = submission.attempt,
                "ignoring contact submission outcome"
            );
            return false;
        }

        match outcome {
            SubmitOutcome::Accepted => {
                self.fields.clear();
                self.errors.clear();
                self.form_error = None;
                self.state = SubmissionState::Succeeded;
            }
            SubmitOutcome::CaptchaRejected => {
                self.reset_challenge();
                self.form_error = Some(FormError::CaptchaRejected);
                self.state = SubmissionState::Failed(FailureReason::CaptchaRejected);
            }
            SubmitOutcome::Rejected(reason) => {
                self.form_error = Some(FormError::SubmissionFailed);
                self.state = SubmissionState::Failed(FailureReason::Generic(reason));
            }
        }

        true
    }

    /// Runs a full submission through `submitter`: at most one request is
    /// issued and the form only awaits once.
    pub async fn submit<S: Submitter + ?Sized>(
        &mut self,
        submitter: &S,
    ) -> Result<&SubmissionState, Blocked> {
        let submission = self.begin_submit()?;
        let outcome = submitter.submit(submission.request()).await;
        self.finish(submission, outcome);

        Ok(&self.state)
    }

    /// "Send another" after a success: clears everything and asks for a
    /// fresh challenge.
    pub fn send_another(&mut self) -> bool {
        if !self.mounted || self.state != SubmissionState::Succeeded {
            return false;
        }

        self.fields.clear();
        self.errors.clear();
        self.form_error = None;
        self.reset_challenge();
        self.state = SubmissionState::Idle;

        true
    }

    /// The display language changed: the widget is rendered per locale so
    /// its token cannot be reused.
    pub fn locale_changed(&mut self) {
        if !self.mounted {
            return;
        }

        self.reset_challenge();
    }

    /// The form left the page. Late outcomes are ignored from now on.
    pub fn teardown(&mut self) {
        self.mounted = false;
    }

    fn revalidate(&mut self, field: Field) {
        let outcome = validate_field(field, self.fields.get(field));
        self.errors.apply(field, outcome);
    }

    fn reset_challenge(&mut self) {
        self.captcha_token = None;
        self.challenge_generation += 1;
    }

    fn leave_failed(&mut self) {
        if let SubmissionState::Failed(_) = self.state {
            self.state = SubmissionState::Idle;
            if self.form_error == Some(FormError::SubmissionFailed) {
                self.form_error = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        let mut form = ContactForm::new();
        form.set_field(Field::Name, "Mariam");
        form.set_field(Field::Email, "mariam@example.ae");
        form.set_field(Field::Phone, "+971 50 123 4567");
        form.set_field(Field::Subject, "Tryouts");
        form.set_field(Field::Message, "When do the junior tryouts start?");
        form
    }

    #[test]
    fn change_validates_only_the_edited_field() {
        let mut form = ContactForm::new();
        form.set_field(Field::Name, "Al");

        assert_eq!(form.error(Field::Name), Some(FieldError::TooShort { min: 3 }));
        assert_eq!(form.errors().len(), 1);

        form.set_field(Field::Name, "Ali");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn blur_flags_untouched_required_field() {
        let mut form = ContactForm::new();
        form.blur(Field::Email);

        assert_eq!(form.error(Field::Email), Some(FieldError::Required));
    }

    #[test]
    fn missing_token_blocks_without_field_errors() {
        let mut form = filled();

        assert_eq!(form.begin_submit().unwrap_err(), Blocked::CaptchaRequired);
        assert_eq!(form.state(), &SubmissionState::Idle);
        assert_eq!(form.form_error(), Some(FormError::CaptchaRequired));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn invalid_fields_block_even_with_token() {
        let mut form = ContactForm::new();
        form.set_captcha_token(Some("token".to_owned()));

        assert_eq!(form.begin_submit().unwrap_err(), Blocked::Invalid);
        assert_eq!(form.errors().len(), 5);
        assert_eq!(form.state(), &SubmissionState::Idle);
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let mut form = filled();
        form.set_captcha_token(Some("  ".to_owned()));

        assert_eq!(form.captcha_token(), None);
        assert_eq!(form.begin_submit().unwrap_err(), Blocked::CaptchaRequired);
    }

    #[test]
    fn second_submit_while_in_flight_is_refused() {
        let mut form = filled();
        form.set_captcha_token(Some("token".to_owned()));

        let submission = form.begin_submit().unwrap();
        assert_eq!(submission.request().recaptcha_token.as_deref(), Some("token"));
        assert!(!form.can_submit());
        assert_eq!(form.begin_submit().unwrap_err(), Blocked::InFlight);

        assert!(form.finish(submission, SubmitOutcome::Accepted));
        assert_eq!(form.state(), &SubmissionState::Succeeded);
    }

    #[test]
    fn late_outcome_after_teardown_is_ignored() {
        let mut form = filled();
        form.set_captcha_token(Some("token".to_owned()));
        let submission = form.begin_submit().unwrap();

        form.teardown();

        assert!(!form.finish(submission, SubmitOutcome::Accepted));
        assert_eq!(form.state(), &SubmissionState::Submitting);
        assert_eq!(form.fields().name, "Mariam");
        assert_eq!(form.begin_submit().unwrap_err(), Blocked::Unmounted);
    }

    #[test]
    fn locale_change_discards_token() {
        let mut form = filled();
        form.set_captcha_token(Some("token".to_owned()));
        let generation = form.challenge_generation();

        form.locale_changed();

        assert_eq!(form.captcha_token(), None);
        assert_eq!(form.challenge_generation(), generation + 1);
        assert_eq!(form.begin_submit().unwrap_err(), Blocked::CaptchaRequired);
    }

    #[test]
    fn generic_failure_returns_to_idle_on_edit() {
        let mut form = filled();
        form.set_captcha_token(Some("token".to_owned()));
        let submission = form.begin_submit().unwrap();
        form.finish(submission, SubmitOutcome::Rejected("boom".to_owned()));

        assert_eq!(form.form_error(), Some(FormError::SubmissionFailed));

        form.set_field(Field::Subject, "Tryouts 2025");

        assert_eq!(form.state(), &SubmissionState::Idle);
        assert_eq!(form.form_error(), None);
        assert_eq!(form.captcha_token(), Some("token"));
    }

    fn submitted(outcome: SubmitOutcome) -> ContactForm {
        let mut form = filled();
        form.set_captcha_token(Some("token".to_owned()));
        let submission = form.begin_submit().unwrap();
        assert!(form.finish(submission, outcome));
        form
    }

    #[test]
    fn success_clears_every_field() {
        let form = submitted(SubmitOutcome::Accepted);

        assert_eq!(form.state(), &SubmissionState::Succeeded);
        for field in <Field as strum::VariantArray>::VARIANTS {
            assert_eq!(form.fields().get(*field), "", "{field}");
        }
        assert!(!form.can_submit());
    }

    #[test]
    fn send_another_starts_over_with_fresh_challenge() {
        let mut form = submitted(SubmitOutcome::Accepted);
        let generation = form.challenge_generation();

        assert_eq!(form.begin_submit().unwrap_err(), Blocked::Completed);
        assert!(form.send_another());

        assert_eq!(form.state(), &SubmissionState::Idle);
        assert_eq!(form.captcha_token(), None);
        assert_eq!(form.challenge_generation(), generation + 1);
        assert!(form.fields().is_empty());
        assert!(form.errors().is_empty());
        assert_eq!(form.form_error(), None);
        assert!(form.can_submit());

        assert!(!form.send_another());
    }

    #[test]
    fn rejected_token_requires_new_challenge() {
        let mut form = submitted(SubmitOutcome::CaptchaRejected);
        let generation = form.challenge_generation();

        assert_eq!(
            form.state(),
            &SubmissionState::Failed(FailureReason::CaptchaRejected)
        );
        assert_eq!(form.form_error(), Some(FormError::CaptchaRejected));
        assert_eq!(form.captcha_token(), None);
        assert_eq!(form.fields().name, "Mariam");

        assert_eq!(form.begin_submit().unwrap_err(), Blocked::CaptchaRequired);
        assert_eq!(form.challenge_generation(), generation);

        form.set_captcha_token(Some("fresh".to_owned()));
        assert_eq!(form.state(), &SubmissionState::Idle);

        let submission = form.begin_submit().unwrap();
        assert_eq!(submission.request().recaptcha_token.as_deref(), Some("fresh"));
    }

    #[test]
    fn generic_failure_keeps_every_field() {
        let before = filled().fields().clone();
        let mut form = submitted(SubmitOutcome::Rejected("502 Bad Gateway".to_owned()));

        assert_eq!(
            form.state(),
            &SubmissionState::Failed(FailureReason::Generic("502 Bad Gateway".to_owned()))
        );
        assert_eq!(form.fields(), &before);
        assert_eq!(form.captcha_token(), Some("token"));

        let retry = form.begin_submit().unwrap();
        assert_eq!(retry.request().fields, before);
    }

    #[test]
    fn restore_ignores_blank_token() {
        let form = ContactForm::restore(ContactFormFields::default(), Some(String::new()));

        assert_eq!(form.captcha_token(), None);
        assert!(form.errors().is_empty());
    }
}
