//! Mailbox model: the locally persisted credential record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credentials for a provisioned disposable mailbox.
///
/// This is the single record persisted across runs (as one JSON blob).
/// The account id is captured at creation time; records written by older
/// versions may lack it, in which case teardown resolves it via `/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mailbox {
    /// Provider account id, when known
    #[serde(default)]
    pub account_id: Option<String>,
    /// The disposable address
    pub address: String,
    /// Account password (needed to re-issue a token)
    pub password: String,
    /// Bearer token for authenticated calls
    pub token: String,
    /// When the mailbox was provisioned
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Mailbox {
    /// Create a new mailbox record
    pub fn new(
        account_id: impl Into<String>,
        address: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            account_id: Some(account_id.into()),
            address: address.into(),
            password: password.into(),
            token: token.into(),
            created_at: Utc::now(),
        }
    }

    /// A record is usable only if it can authenticate requests
    pub fn is_complete(&self) -> bool {
        !self.address.is_empty() && !self.token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_mailbox_is_complete() {
        let mb = Mailbox::new("acct1", "user@example.test", "pw", "tok");
        assert!(mb.is_complete());
        assert_eq!(mb.account_id.as_deref(), Some("acct1"));
    }

    #[test]
    fn test_incomplete_without_token() {
        let mut mb = Mailbox::new("acct1", "user@example.test", "pw", "tok");
        mb.token.clear();
        assert!(!mb.is_complete());
    }

    #[test]
    fn test_deserialize_legacy_record_without_account_id() {
        // Records written before the account id was captured
        let json = r#"{
            "address": "user@example.test",
            "password": "pw",
            "token": "tok"
        }"#;
        let mb: Mailbox = serde_json::from_str(json).unwrap();
        assert!(mb.account_id.is_none());
        assert!(mb.is_complete());
    }

    #[test]
    fn test_roundtrip() {
        let mb = Mailbox::new("acct1", "user@example.test", "pw", "tok");
        let json = serde_json::to_string(&mb).unwrap();
        let back: Mailbox = serde_json::from_str(&json).unwrap();
        assert_eq!(mb, back);
    }
}
