//! Domain models for mailbox entities

mod mailbox;
mod message;

pub use mailbox::Mailbox;
pub use message::{Attachment, EmailAddress, Message, MessageDetail, MessageId};
