//! Mail crate - core logic for the disposable mailbox client
//!
//! This crate provides UI-independent functionality:
//! - Domain models (Mailbox, Message, EmailAddress)
//! - REST client for the mail provider (accounts, tokens, messages)
//! - Local credential persistence
//! - Mailbox session lifecycle (idle -> creating -> active -> deleting)
//! - Inbox polling with new-message detection
//!
//! All HTTP is synchronous (ureq) to stay executor-agnostic; nothing here
//! depends on a UI toolkit or an async runtime.

pub mod config;
pub mod creds;
pub mod inbox;
pub mod models;
pub mod provider;
pub mod session;

pub use config::ClientConfig;
pub use creds::CredentialStore;
pub use inbox::{DEFAULT_POLL_INTERVAL_SECS, InboxTracker, poll_due};
pub use models::{Attachment, EmailAddress, Mailbox, Message, MessageDetail, MessageId};
pub use provider::{MessageGone, ProviderClient, SessionExpired};
pub use session::{NoMailbox, Phase, PollReport, Session};
