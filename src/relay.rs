//! Form submission relay: one admin notification plus an optional auto-reply.

use std::sync::Mutex;

use crate::foundation::error::{ScrollError, ScrollResult};

/// Sender display name used when `EMAIL_SENDER_NAME` is unset.
pub const DEFAULT_SENDER_NAME: &str = "Canzzy";
/// Response error when credentials are missing.
pub const CONFIG_ERROR: &str = "Server configuration error";

/// Newsletter sign-up.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Newsletter {
    pub email: String,
}

/// Contact form message.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Retail, bulk, distribution, ...
    #[serde(default)]
    pub inquiry_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Question about one product.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInquiry {
    pub product_name: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Request body: `{"type": "...", "data": {...}}`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Submission {
    Newsletter(Newsletter),
    Contact(ContactMessage),
    Inquiry(ProductInquiry),
}

/// One composed mail.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Submission {
    /// Address of the submitter, if given.
    pub fn reply_address(&self) -> Option<&str> {
        let email = match self {
            Self::Newsletter(n) => &n.email,
            Self::Contact(c) => &c.email,
            Self::Inquiry(i) => &i.email,
        };
        let email = email.trim();
        (!email.is_empty()).then_some(email)
    }

    /// Subject of the admin notification, before the `[Admin]` prefix.
    pub fn admin_subject(&self) -> String {
        match self {
            Self::Newsletter(_) => "New Newsletter Subscription".to_string(),
            Self::Contact(c) => format!("Contact Inquiry: {}", c.name),
            Self::Inquiry(i) => format!("Product Inquiry: {}", i.product_name),
        }
    }

    fn admin_body(&self) -> String {
        let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
        match self {
            Self::Newsletter(n) => format!("New subscriber: {}", n.email),
            Self::Contact(c) => format!(
                "Name: {}\nEmail: {}\nType: {}\nCompany: {}\nQuantity: {}\nMessage:\n{}",
                c.name,
                c.email,
                c.inquiry_type,
                or_na(&c.company),
                or_na(&c.quantity),
                c.message
            ),
            Self::Inquiry(i) => format!(
                "Product: {}\nName: {}\nEmail: {}\nMessage:\n{}",
                i.product_name, i.name, i.email, i.message
            ),
        }
    }

    fn reply(&self) -> (String, String) {
        match self {
            Self::Newsletter(_) => (
                "Welcome to the Tangy Revolution!".to_string(),
                "Thanks for subscribing. Exclusive flavour drops are on the way.".to_string(),
            ),
            Self::Contact(c) => (
                "We received your message! | Canzzy".to_string(),
                format!(
                    "Hello {}, we have received your {} inquiry and will reply within 24 hours.",
                    c.name, c.inquiry_type
                ),
            ),
            Self::Inquiry(i) => (
                format!("Thanks for your interest in {} | Canzzy", i.product_name),
                format!(
                    "Hi {}, pricing and catalogue details for {} are on their way.",
                    i.name, i.product_name
                ),
            ),
        }
    }

    /// Admin notification and, when the submitter left an address, the auto-reply.
    pub fn compose(&self, config: &RelayConfig) -> (OutgoingMail, Option<OutgoingMail>) {
        let from = config.sender_address();
        let admin = OutgoingMail {
            from: from.clone(),
            to: config.admin_address.clone(),
            subject: format!("[Admin] {}", self.admin_subject()),
            body: self.admin_body(),
        };
        let reply = self.reply_address().map(|to| {
            let (subject, body) = self.reply();
            OutgoingMail {
                from,
                to: to.to_string(),
                subject,
                body,
            }
        });
        (admin, reply)
    }
}

/// Transport credentials and addressing.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub user: String,
    pub pass: String,
    /// Recipient of admin notifications.
    pub admin_address: String,
    pub sender_name: String,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("admin_address", &self.admin_address)
            .field("sender_name", &self.sender_name)
            .finish()
    }
}

impl RelayConfig {
    /// Read `EMAIL_USER`, `EMAIL_PASS`, `EMAIL_ADMIN` and `EMAIL_SENDER_NAME`.
    /// `None` when either credential is missing or empty.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let user = get("EMAIL_USER")?;
        let pass = get("EMAIL_PASS")?;
        Some(Self {
            admin_address: get("EMAIL_ADMIN").unwrap_or_else(|| user.clone()),
            sender_name: get("EMAIL_SENDER_NAME")
                .unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string()),
            user,
            pass,
        })
    }

    /// `"Name" <user>`.
    pub fn sender_address(&self) -> String {
        format!("\"{}\" <{}>", self.sender_name, self.user)
    }
}

/// Outbound mail delivery. One attempt per mail.
pub trait MailTransport: Send + Sync {
    fn send(&self, mail: &OutgoingMail) -> ScrollResult<()>;
}

/// Records mails instead of sending them.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<OutgoingMail>>,
    fail_with: Option<String>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that rejects every mail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl MailTransport for MemoryTransport {
    fn send(&self, mail: &OutgoingMail) -> ScrollResult<()> {
        if let Some(msg) = &self.fail_with {
            return Err(ScrollError::relay(msg.clone()));
        }
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(mail.clone());
        Ok(())
    }
}

/// Response body returned to the form.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Turns submissions into mails on a [`MailTransport`].
#[derive(Debug)]
pub struct MailRelay<T> {
    config: Option<RelayConfig>,
    transport: T,
}

impl<T: MailTransport> MailRelay<T> {
    pub fn new(config: Option<RelayConfig>, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[tracing::instrument(skip_all, fields(kind = submission_kind(submission)))]
    pub fn dispatch(&self, submission: &Submission) -> RelayResponse {
        let Some(config) = &self.config else {
            tracing::warn!("mail relay has no credentials (EMAIL_USER / EMAIL_PASS)");
            return RelayResponse::failure(CONFIG_ERROR);
        };
        let (admin, reply) = submission.compose(config);
        let sent = self
            .transport
            .send(&admin)
            .and_then(|()| reply.map_or(Ok(()), |m| self.transport.send(&m)));
        match sent {
            Ok(()) => RelayResponse::ok(),
            Err(err) => {
                tracing::warn!(%err, "mail send failed");
                RelayResponse::failure(match err {
                    ScrollError::Relay(msg) => msg,
                    other => other.to_string(),
                })
            }
        }
    }

    /// Parse a raw request body, then dispatch it.
    pub fn dispatch_json(&self, body: &str) -> RelayResponse {
        match serde_json::from_str::<Submission>(body) {
            Ok(s) => self.dispatch(&s),
            Err(err) => RelayResponse::failure(format!("invalid submission: {err}")),
        }
    }
}

fn submission_kind(s: &Submission) -> &'static str {
    match s {
        Submission::Newsletter(_) => "newsletter",
        Submission::Contact(_) => "contact",
        Submission::Inquiry(_) => "inquiry",
    }
}

#[cfg(test)]
#[path = "../tests/unit/relay.rs"]
mod tests;
