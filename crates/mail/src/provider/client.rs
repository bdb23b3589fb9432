//! Provider REST client
//!
//! Wraps the provider's account, token, and message endpoints.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use log::debug;
use url::Url;

use super::api::{
    AccountResource, DomainResource, HydraCollection, MessageListItem, MessageResource,
    TokenResponse,
};
use crate::models::MessageId;

/// Error indicating the provider rejected the stored token.
/// Callers clear local credentials when they see this.
#[derive(Debug, thiserror::Error)]
#[error("Session expired or rejected by the provider")]
pub struct SessionExpired;

/// Error indicating a message no longer exists on the provider.
/// Disposable mailboxes shed messages without notice.
#[derive(Debug, thiserror::Error)]
#[error("Message no longer exists on the provider")]
pub struct MessageGone;

/// REST client for the mail provider
pub struct ProviderClient {
    base_url: String,
}

impl ProviderClient {
    /// Default provider endpoint
    pub const DEFAULT_BASE_URL: &'static str = "https://api.mail.tm";

    /// Create a client against the given base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed: Url = base_url
            .parse()
            .with_context(|| format!("Invalid provider base URL: {}", base_url))?;
        anyhow::ensure!(
            matches!(parsed.scheme(), "http" | "https"),
            "Provider base URL must be http(s): {}",
            base_url
        );

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List the domains accounts can be created under
    pub fn list_domains(&self) -> Result<Vec<DomainResource>> {
        let url = format!("{}/domains?page=1", self.base_url);
        debug!("GET {}", url);

        let mut response = ureq::get(&url)
            .call()
            .context("Failed to fetch domain list")?;

        let collection: HydraCollection<DomainResource> = response
            .body_mut()
            .read_json()
            .context("Failed to parse domain list response")?;

        Ok(collection.member)
    }

    /// Create a provider account with the given address and password
    pub fn create_account(&self, address: &str, password: &str) -> Result<AccountResource> {
        let url = format!("{}/accounts", self.base_url);
        debug!("POST {}", url);

        let mut response = ureq::post(&url)
            .send_json(serde_json::json!({
                "address": address,
                "password": password,
            }))
            .with_context(|| format!("Failed to create account {}", address))?;

        response
            .body_mut()
            .read_json()
            .context("Failed to parse account response")
    }

    /// Exchange address/password for a bearer token
    pub fn request_token(&self, address: &str, password: &str) -> Result<String> {
        let url = format!("{}/token", self.base_url);
        debug!("POST {}", url);

        let mut response = ureq::post(&url)
            .send_json(serde_json::json!({
                "address": address,
                "password": password,
            }))
            .context("Failed to request auth token")?;

        let token: TokenResponse = response
            .body_mut()
            .read_json()
            .context("Failed to parse token response")?;

        match token.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => anyhow::bail!("Provider issued no auth token for {}", address),
        }
    }

    /// Look up the account the token belongs to
    pub fn me(&self, token: &str) -> Result<AccountResource> {
        let url = format!("{}/me", self.base_url);
        debug!("GET {}", url);

        match ureq::get(&url).header("Authorization", &bearer(token)).call() {
            Ok(mut response) => response
                .body_mut()
                .read_json()
                .context("Failed to parse account lookup response"),
            Err(ureq::Error::StatusCode(401)) => Err(SessionExpired.into()),
            Err(e) => Err(e).context("Failed to look up account"),
        }
    }

    /// Delete the provider account. Returns 204 with an empty body.
    pub fn delete_account(&self, token: &str, account_id: &str) -> Result<()> {
        let url = format!("{}/accounts/{}", self.base_url, account_id);
        debug!("DELETE {}", url);

        match ureq::delete(&url).header("Authorization", &bearer(token)).call() {
            Ok(_) => Ok(()),
            Err(ureq::Error::StatusCode(401)) => Err(SessionExpired.into()),
            Err(e) => Err(e).context("Failed to delete account"),
        }
    }

    /// List the messages currently in the mailbox
    pub fn list_messages(&self, token: &str) -> Result<Vec<MessageListItem>> {
        let url = format!("{}/messages?page=1", self.base_url);
        debug!("GET {}", url);

        match ureq::get(&url).header("Authorization", &bearer(token)).call() {
            Ok(mut response) => {
                let collection: HydraCollection<MessageListItem> = response
                    .body_mut()
                    .read_json()
                    .context("Failed to parse message list response")?;
                Ok(collection.member)
            }
            Err(ureq::Error::StatusCode(401)) => Err(SessionExpired.into()),
            Err(e) => Err(e).context("Failed to fetch messages"),
        }
    }

    /// Get full message details by ID
    pub fn get_message(&self, token: &str, id: &MessageId) -> Result<MessageResource> {
        let url = format!("{}/messages/{}", self.base_url, id.as_str());
        debug!("GET {}", url);

        match ureq::get(&url).header("Authorization", &bearer(token)).call() {
            Ok(mut response) => response
                .body_mut()
                .read_json()
                .context("Failed to parse message response"),
            Err(ureq::Error::StatusCode(401)) => Err(SessionExpired.into()),
            Err(ureq::Error::StatusCode(404)) => Err(MessageGone.into()),
            Err(e) => Err(e).context("Failed to fetch message"),
        }
    }

    /// Mark a message as seen on the provider
    pub fn mark_seen(&self, token: &str, id: &MessageId) -> Result<()> {
        let url = format!("{}/messages/{}", self.base_url, id.as_str());
        debug!("PATCH {}", url);

        // The provider only accepts merge-patch for partial updates
        match ureq::patch(&url)
            .header("Authorization", &bearer(token))
            .header("Content-Type", "application/merge-patch+json")
            .send(r#"{"seen":true}"#)
        {
            Ok(_) => Ok(()),
            Err(ureq::Error::StatusCode(401)) => Err(SessionExpired.into()),
            Err(ureq::Error::StatusCode(404)) => Err(MessageGone.into()),
            Err(e) => Err(e).context("Failed to mark message seen"),
        }
    }

    /// Delete a message from the mailbox
    pub fn delete_message(&self, token: &str, id: &MessageId) -> Result<()> {
        let url = format!("{}/messages/{}", self.base_url, id.as_str());
        debug!("DELETE {}", url);

        match ureq::delete(&url).header("Authorization", &bearer(token)).call() {
            Ok(_) => Ok(()),
            Err(ureq::Error::StatusCode(401)) => Err(SessionExpired.into()),
            Err(ureq::Error::StatusCode(404)) => Err(MessageGone.into()),
            Err(e) => Err(e).context("Failed to delete message"),
        }
    }
}

/// Format a bearer Authorization header value
fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
