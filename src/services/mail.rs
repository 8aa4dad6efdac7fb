//! Outgoing mail.
//!
//! DESIGN
//! ======
//! Delivery sits behind the `Mailer` trait so handlers and tests can swap the
//! Resend client for an in-memory mock. Templates are compiled into the
//! binary and filled with HTML-escaped values in a single pass, so a value
//! that itself contains `{{...}}` is never expanded.

use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;

use crate::config::MailConfig;

const VERIFICATION_TEMPLATE: &str = include_str!("../../templates/verification_code.html");

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

/// A single message to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: Option<String>,
}

#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Delivery`] when the provider rejects the message
    /// or cannot be reached.
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Mailer backed by the Resend HTTP API.
pub struct ResendMailer {
    client: Resend,
    from: String,
}

impl ResendMailer {
    #[must_use]
    pub fn new(config: &MailConfig) -> Self {
        Self { client: Resend::new(&config.api_key), from: config.sender() }
    }
}

#[async_trait::async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let mut email = CreateEmailBaseOptions::new(&self.from, [mail.to.as_str()], &mail.subject)
            .with_html(&mail.html)
            .with_text(&mail.text);
        if let Some(reply_to) = mail.reply_to.as_deref() {
            email = email.with_reply(reply_to);
        }
        self.client
            .emails
            .send(email)
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;
        tracing::info!(to = %mail.to, subject = %mail.subject, "mail sent");
        Ok(())
    }
}

// =============================================================================
// RENDERING
// =============================================================================

#[must_use]
pub fn html_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace `{{KEY}}` placeholders with HTML-escaped values. Unknown
/// placeholders are left as-is.
#[must_use]
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(&html_escape(value)),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Mail carrying a rating verification code.
#[must_use]
pub fn verification_mail(to: &str, code: &str, lva_name: &str, ttl_minutes: i64) -> OutgoingMail {
    let ttl = ttl_minutes.to_string();
    let html = render(
        VERIFICATION_TEMPLATE,
        &[("LVA_NAME", lva_name), ("CODE", code), ("TTL_MINUTES", ttl.as_str())],
    );
    let text = format!(
        "ÖH Wirtschaft - Verifizierungscode\n\n\
         Hallo!\n\n\
         Du hast einen Verifizierungscode angefordert, um folgende LVA zu bewerten:\n\
         {lva_name}\n\n\
         Dein Verifizierungscode: {code}\n\n\
         Wichtig:\n\
         - Deine E-Mail-Adresse wird NICHT gespeichert\n\
         - Der Code ist {ttl} Minuten gültig\n\n\
         ÖH Wirtschaft - Studienvertretung\n\
         wirtschaft@oeh.jku.at\n"
    );
    OutgoingMail {
        to: to.to_owned(),
        subject: "Dein Verifizierungscode für die LVA-Bewertung".to_owned(),
        html,
        text,
        reply_to: None,
    }
}

#[cfg(test)]
#[path = "mail_test.rs"]
mod tests;
