//! Message models for the provider inbox

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a message (provider-assigned)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An email address with optional display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Display name (e.g., "John Doe")
    pub name: Option<String>,
    /// Email address (e.g., "john@example.com")
    pub address: String,
}

impl EmailAddress {
    /// Create a new email address with just the address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    /// Create a new email address with a display name
    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
        }
    }

    /// Parse an email address from a string like "John Doe <john@example.com>"
    pub fn parse(s: &str) -> Self {
        let s = s.trim();

        if let Some(angle_start) = s.rfind('<')
            && let Some(angle_end) = s.rfind('>')
            && angle_start < angle_end
        {
            let name = s[..angle_start].trim();
            let address = s[angle_start + 1..angle_end].trim();
            return Self {
                name: if name.is_empty() {
                    None
                } else {
                    Some(name.to_string())
                },
                address: address.to_string(),
            };
        }

        Self {
            name: None,
            address: s.to_string(),
        }
    }

    /// Format the email address for display
    pub fn display(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.address),
            None => self.address.clone(),
        }
    }
}

/// A message as listed in the inbox (no body content)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Provider message ID
    pub id: MessageId,
    /// Sender's email address
    pub from: EmailAddress,
    /// Recipients (To field)
    pub to: Vec<EmailAddress>,
    /// Subject line
    pub subject: String,
    /// Short plain-text preview of the body
    pub preview: String,
    /// Whether the message has been marked seen on the provider
    pub seen: bool,
    /// Whether the message carries attachments
    pub has_attachments: bool,
    /// Message size in bytes, when reported
    pub size: Option<u64>,
    /// When the message was received
    pub received_at: DateTime<Utc>,
}

impl Message {
    /// Subject line suitable for display, substituting a placeholder when empty
    pub fn display_subject(&self) -> &str {
        if self.subject.is_empty() {
            "(no subject)"
        } else {
            &self.subject
        }
    }

    /// Sender suitable for display, substituting a placeholder when unknown
    pub fn display_sender(&self) -> String {
        if self.from.address.is_empty() {
            "(unknown sender)".to_string()
        } else {
            self.from.display()
        }
    }
}

/// Attachment metadata (content is fetched separately, if at all)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub size: Option<u64>,
}

/// A fully fetched message, including body content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDetail {
    /// The inbox-level fields
    pub meta: Message,
    /// CC recipients
    pub cc: Vec<EmailAddress>,
    /// BCC recipients
    pub bcc: Vec<EmailAddress>,
    /// Plain text body, when the provider extracted one
    pub text: Option<String>,
    /// HTML body parts
    pub html: Vec<String>,
    /// Attachment metadata
    pub attachments: Vec<Attachment>,
}

impl MessageDetail {
    /// The first HTML part, when present. HTML is preferred for rendering.
    pub fn body_html(&self) -> Option<&str> {
        self.html.first().map(|s| s.as_str()).filter(|s| !s.is_empty())
    }

    /// Plain-text rendition: the text body, falling back to the preview.
    pub fn body_text(&self) -> &str {
        match &self.text {
            Some(text) if !text.is_empty() => text,
            _ => &self.meta.preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_email_with_name() {
        let addr = EmailAddress::parse("John Doe <john@example.com>");
        assert_eq!(addr.name, Some("John Doe".to_string()));
        assert_eq!(addr.address, "john@example.com");
    }

    #[test]
    fn test_parse_email_without_name() {
        let addr = EmailAddress::parse("john@example.com");
        assert_eq!(addr.name, None);
        assert_eq!(addr.address, "john@example.com");
    }

    #[test]
    fn test_parse_email_with_angle_brackets_no_name() {
        let addr = EmailAddress::parse("<john@example.com>");
        assert_eq!(addr.name, None);
        assert_eq!(addr.address, "john@example.com");
    }

    #[test]
    fn test_display_with_name() {
        let addr = EmailAddress::with_name("John Doe", "john@example.com");
        assert_eq!(addr.display(), "John Doe <john@example.com>");
    }

    #[test]
    fn test_display_without_name() {
        let addr = EmailAddress::new("john@example.com");
        assert_eq!(addr.display(), "john@example.com");
    }

    fn make_detail(text: Option<&str>, html: Vec<&str>) -> MessageDetail {
        MessageDetail {
            meta: Message {
                id: MessageId::new("m1"),
                from: EmailAddress::new("a@b.test"),
                to: vec![],
                subject: String::new(),
                preview: "intro text".to_string(),
                seen: false,
                has_attachments: false,
                size: None,
                received_at: Utc::now(),
            },
            cc: vec![],
            bcc: vec![],
            text: text.map(String::from),
            html: html.into_iter().map(String::from).collect(),
            attachments: vec![],
        }
    }

    #[test]
    fn test_body_html_prefers_first_part() {
        let detail = make_detail(Some("plain"), vec!["<p>one</p>", "<p>two</p>"]);
        assert_eq!(detail.body_html(), Some("<p>one</p>"));
    }

    #[test]
    fn test_body_html_skips_empty_part() {
        let detail = make_detail(Some("plain"), vec![""]);
        assert_eq!(detail.body_html(), None);
    }

    #[test]
    fn test_body_text_falls_back_to_preview() {
        let detail = make_detail(None, vec![]);
        assert_eq!(detail.body_text(), "intro text");

        let detail = make_detail(Some(""), vec![]);
        assert_eq!(detail.body_text(), "intro text");

        let detail = make_detail(Some("actual body"), vec![]);
        assert_eq!(detail.body_text(), "actual body");
    }

    #[test]
    fn test_display_subject_placeholder() {
        let detail = make_detail(None, vec![]);
        assert_eq!(detail.meta.display_subject(), "(no subject)");
    }
}
