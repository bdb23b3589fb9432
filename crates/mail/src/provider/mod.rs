//! Mail provider integration
//!
//! This module provides:
//! - A REST client for the provider's account/token/message endpoints
//! - Wire types for the provider's JSON-LD responses
//! - Response normalization to domain models

mod client;
mod normalize;

pub use client::{MessageGone, ProviderClient, SessionExpired};
pub use normalize::{normalize_listing, normalize_message};

/// Provider API response types.
///
/// The provider is an API Platform service: collections arrive wrapped in
/// a JSON-LD envelope with items under `hydra:member`. Unknown keys
/// (`@context`, `@id`, retention fields, ...) are ignored.
pub mod api {
    use serde::Deserialize;

    /// JSON-LD collection envelope
    #[derive(Debug, Deserialize)]
    #[serde(bound(deserialize = "T: Deserialize<'de>"))]
    pub struct HydraCollection<T> {
        #[serde(rename = "hydra:member", default)]
        pub member: Vec<T>,
        #[serde(rename = "hydra:totalItems")]
        pub total_items: Option<u64>,
    }

    /// A domain accounts can be created under
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DomainResource {
        pub id: String,
        pub domain: String,
        #[serde(default)]
        pub is_active: bool,
        #[serde(default)]
        pub is_private: bool,
    }

    /// Provider account record (from creation or `/me`)
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountResource {
        pub id: String,
        #[serde(default)]
        pub address: String,
        pub quota: Option<u64>,
        pub used: Option<u64>,
        #[serde(default)]
        pub is_disabled: bool,
    }

    /// Response from the token endpoint
    #[derive(Debug, Deserialize)]
    pub struct TokenResponse {
        pub token: Option<String>,
        pub id: Option<String>,
    }

    /// Address field as the provider reports it
    #[derive(Debug, Deserialize)]
    pub struct AddressField {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub address: String,
    }

    /// A message as it appears in the inbox listing
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessageListItem {
        pub id: String,
        pub from: Option<AddressField>,
        #[serde(default)]
        pub to: Vec<AddressField>,
        pub subject: Option<String>,
        pub intro: Option<String>,
        #[serde(default)]
        pub seen: bool,
        #[serde(default)]
        pub has_attachments: bool,
        pub size: Option<u64>,
        pub created_at: Option<String>,
    }

    /// A fully fetched message
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessageResource {
        pub id: String,
        pub from: Option<AddressField>,
        #[serde(default)]
        pub to: Vec<AddressField>,
        #[serde(default)]
        pub cc: Vec<AddressField>,
        #[serde(default)]
        pub bcc: Vec<AddressField>,
        pub subject: Option<String>,
        pub intro: Option<String>,
        #[serde(default)]
        pub seen: bool,
        #[serde(default)]
        pub has_attachments: bool,
        pub size: Option<u64>,
        pub created_at: Option<String>,
        pub text: Option<String>,
        #[serde(default)]
        pub html: Vec<String>,
        #[serde(default)]
        pub attachments: Vec<AttachmentResource>,
    }

    /// Attachment metadata on a fetched message
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AttachmentResource {
        pub id: String,
        pub filename: Option<String>,
        pub content_type: Option<String>,
        pub size: Option<u64>,
    }
}
