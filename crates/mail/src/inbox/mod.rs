//! Inbox polling and new-message detection

mod timing;
mod tracker;

pub use timing::{DEFAULT_POLL_INTERVAL_SECS, poll_due};
pub use tracker::InboxTracker;
