//! Poll timing
//!
//! Pure functions so the loop cadence can be tested without a clock.

use chrono::{DateTime, Utc};

/// Default seconds between inbox polls
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Check if enough time has elapsed since the last poll to run another.
///
/// # Arguments
/// * `last_poll_at` - When the last poll completed (None if never polled)
/// * `interval_secs` - Minimum seconds between polls
///
/// # Returns
/// `true` if the interval has passed (or the inbox was never polled)
pub fn poll_due(last_poll_at: Option<DateTime<Utc>>, interval_secs: u64) -> bool {
    match last_poll_at {
        Some(last) => {
            let elapsed = Utc::now() - last;
            elapsed.num_seconds() >= interval_secs as i64
        }
        None => true, // Never polled, so a poll is due immediately
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_poll_due_never_polled() {
        assert!(poll_due(None, 5));
        assert!(poll_due(None, 0));
        assert!(poll_due(None, 3600));
    }

    #[test]
    fn test_poll_due_recent_poll() {
        let last = Utc::now() - Duration::seconds(2);
        assert!(!poll_due(Some(last), 5));

        let last = Utc::now() - Duration::milliseconds(100);
        assert!(!poll_due(Some(last), 5));
    }

    #[test]
    fn test_poll_due_old_poll() {
        let last = Utc::now() - Duration::seconds(10);
        assert!(poll_due(Some(last), 5));

        // Exactly at the boundary counts as due
        let last = Utc::now() - Duration::seconds(5);
        assert!(poll_due(Some(last), 5));
    }

    #[test]
    fn test_poll_due_zero_interval() {
        let last = Utc::now();
        assert!(poll_due(Some(last), 0));
    }
}
