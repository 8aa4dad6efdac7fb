//! Public contact form.
//!
//! A submission is mailed separately to every address in the
//! `contact_emails` setting with Reply-To set to the sender. Delivery is
//! best-effort per recipient: the request succeeds even if no mail could be
//! sent, and the receipt reports how many went out.

use serde::{Deserialize, Serialize};

use crate::services::mail::{self, OutgoingMail};
use crate::services::{ContentError, require_text, settings, verification};
use crate::state::AppState;

const CONTACT_TEMPLATE: &str = include_str!("../../templates/contact.html");
const DEFAULT_SUBJECT: &str = "Neue Nachricht";
const NO_SUBJECT: &str = "Kein Betreff";

#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub bereich: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactReceipt {
    pub success: bool,
    pub message: &'static str,
    pub email_sent: bool,
    pub recipients_count: usize,
}

impl ContactReceipt {
    fn from_sent(sent: usize) -> Self {
        Self {
            success: true,
            message: if sent > 0 { "Nachricht erfolgreich gesendet" } else { "Nachricht wurde empfangen" },
            email_sent: sent > 0,
            recipients_count: sent,
        }
    }
}

impl ContactForm {
    fn subject(&self) -> Option<&str> {
        self.subject.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Check required fields and normalize the sender address.
    fn validate(mut self) -> Result<Self, ContentError> {
        require_text(&self.name, "Name")?;
        require_text(&self.message, "Nachricht")?;
        self.email = verification::normalize_email(&self.email)
            .ok_or_else(|| ContentError::Invalid("Ungültige E-Mail-Adresse".into()))?;
        Ok(self)
    }
}

/// Build the mail for one recipient.
#[must_use]
pub fn contact_mail(to: &str, form: &ContactForm) -> OutgoingMail {
    let bereich = form.bereich.trim();
    let prefix = if bereich.is_empty() { String::new() } else { format!("[{bereich}] ") };
    let subject = format!("{prefix}{}", form.subject().unwrap_or(DEFAULT_SUBJECT));

    let html = mail::render(
        CONTACT_TEMPLATE,
        &[
            ("NAME", form.name.trim()),
            ("EMAIL", form.email.as_str()),
            ("BEREICH", if bereich.is_empty() { "-" } else { bereich }),
            ("SUBJECT", form.subject().unwrap_or("Kein Betreff angegeben")),
            ("MESSAGE", form.message.as_str()),
        ],
    );
    let text = format!(
        "Neue Kontaktanfrage über das ÖH Wirtschaft Kontaktformular\n\n\
         Name: {name}\n\
         E-Mail: {email}\n\
         Bereich: {bereich}\n\
         Betreff: {subject}\n\n\
         Nachricht:\n{message}\n",
        name = form.name.trim(),
        email = form.email,
        subject = form.subject().unwrap_or(NO_SUBJECT),
        message = form.message,
    );

    OutgoingMail { to: to.to_owned(), subject, html, text, reply_to: Some(form.email.clone()) }
}

/// Validate a submission and forward it to the configured recipients.
///
/// # Errors
///
/// `Invalid` for a blank name or message or a malformed address;
/// `Database` if the recipient setting cannot be read.
pub async fn submit(state: &AppState, form: ContactForm) -> Result<ContactReceipt, ContentError> {
    let form = form.validate()?;
    let recipients = settings::contact_recipients(&state.pool).await?;

    let mut sent = 0;
    match &state.mailer {
        Some(mailer) => {
            for recipient in &recipients {
                match mailer.send(contact_mail(recipient, &form)).await {
                    Ok(()) => sent += 1,
                    Err(e) => tracing::warn!(error = %e, recipient, "contact mail failed"),
                }
            }
        }
        None if !recipients.is_empty() => tracing::warn!("mail not configured; contact form not forwarded"),
        None => {}
    }

    tracing::info!(
        from = %form.email,
        bereich = %form.bereich,
        subject = form.subject().unwrap_or(NO_SUBJECT),
        sent,
        recipients = recipients.len(),
        "contact form received"
    );
    Ok(ContactReceipt::from_sent(sent))
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
