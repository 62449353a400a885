use anyhow::Result;
use clap::Args;
use federation::config::Config;
use federation_contact::{ContactForm, Field, HttpSubmitter, SubmissionState};

#[derive(Args)]
pub struct ContactArgs {
    /// Verification route receiving the submission
    #[arg(long, default_value = "http://127.0.0.1:3000/api/contact")]
    endpoint: String,

    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    subject: String,

    #[arg(long)]
    message: String,

    /// Bot-verification token; any value passes with the provider's test keys
    #[arg(long)]
    token: String,
}

pub async fn send(config: Config, args: ContactArgs) -> Result<()> {
    let submitter = match config.contact.submit_timeout() {
        Some(timeout) => HttpSubmitter::with_timeout(args.endpoint, timeout)?,
        None => HttpSubmitter::new(args.endpoint),
    };

    let mut form = ContactForm::new();
    form.set_field(Field::Name, args.name);
    form.set_field(Field::Email, args.email);
    form.set_field(Field::Phone, args.phone);
    form.set_field(Field::Subject, args.subject);
    form.set_field(Field::Message, args.message);
    form.set_captcha_token(Some(args.token));

    let outcome = form.submit(&submitter).await.cloned();

    match outcome {
        Ok(SubmissionState::Succeeded) => {
            tracing::info!(endpoint = submitter.endpoint(), "inquiry delivered");
            Ok(())
        }
        Ok(state) => anyhow::bail!("inquiry not delivered: {state:?}"),
        Err(blocked) => {
            for (field, error) in form.errors().iter() {
                tracing::error!(field = %field, "{error}");
            }

            anyhow::bail!("inquiry not sent: {blocked}")
        }
    }
}
