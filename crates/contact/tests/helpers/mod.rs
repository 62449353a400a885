use std::sync::Mutex;

use async_trait::async_trait;
use federation_contact::{
    ContactForm, ContactFormFields, ContactMessage, Inbox, RecaptchaVerifier, Verification,
};

/// Verifier answering every token with the same result.
pub struct StaticVerifier(pub anyhow::Result<Verification>);

#[async_trait]
impl RecaptchaVerifier for StaticVerifier {
    async fn verify(&self, _token: &str, _remote_ip: Option<&str>) -> anyhow::Result<Verification> {
        match &self.0 {
            Ok(verification) => Ok(verification.clone()),
            Err(err) => Err(anyhow::anyhow!("{err}")),
        }
    }
}

#[derive(Default)]
pub struct MemoryInbox {
    pub messages: Mutex<Vec<ContactMessage>>,
    pub fail: bool,
}

#[async_trait]
impl Inbox for MemoryInbox {
    async fn deliver(&self, message: &ContactMessage) -> federation_shared::Result<()> {
        if self.fail {
            return Err(anyhow::anyhow!("smtp unavailable").into());
        }

        self.messages.lock().unwrap().push(message.clone());

        Ok(())
    }
}

pub fn filled_form() -> ContactForm {
    ContactForm::restore(
        ContactFormFields {
            name: "Mariam Al Suwaidi".to_owned(),
            email: "mariam@example.ae".to_owned(),
            phone: "+971 50 123 4567".to_owned(),
            subject: "Junior tryouts".to_owned(),
            message: "When do the junior tryouts start this season?".to_owned(),
        },
        None,
    )
}
