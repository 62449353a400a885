use async_trait::async_trait;
use federation_contact::{ContactMessage, Inbox};

use crate::EmailService;

/// Mails accepted contact inquiries to the federation mailbox.
#[derive(Clone)]
pub struct ContactInbox {
    email: EmailService,
    to: String,
}

impl ContactInbox {
    pub fn new(email: EmailService, to: impl Into<String>) -> Self {
        Self {
            email,
            to: to.into(),
        }
    }
}

/// Subject line and plain text body of the notification for one inquiry.
pub fn compose(message: &ContactMessage) -> (String, String) {
    let subject = format!("Contact form: {}", message.subject);
    let body = format!(
        r#"
Name: {}
Email: {}
Phone: {}
Subject: {}
Message: {}
"#,
        message.name, message.email, message.phone, message.subject, message.message
    );

    (subject, body)
}

#[async_trait]
impl Inbox for ContactInbox {
    async fn deliver(&self, message: &ContactMessage) -> federation_shared::Result<()> {
        let (subject, body) = compose(message);

        self.email
            .send_plain(&self.to, Some(&message.email), subject, body)
            .await?;

        Ok(())
    }
}
