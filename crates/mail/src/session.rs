//! Mailbox session lifecycle
//!
//! Drives the account state machine:
//! idle -> creating -> active -> deleting -> idle. Two extra paths lead
//! back to idle: a failed provision (creating -> idle) and session expiry
//! (active -> idle, local-only). Restoring a stored record re-enters
//! active directly, since no remote provisioning happens.

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::creds::CredentialStore;
use crate::inbox::InboxTracker;
use crate::models::{Mailbox, Message, MessageDetail, MessageId};
use crate::provider::{ProviderClient, SessionExpired, normalize_listing, normalize_message};

/// Error for operations that need an active mailbox
#[derive(Debug, thiserror::Error)]
#[error("No active mailbox; generate one first")]
pub struct NoMailbox;

/// Lifecycle phase of the mailbox session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Creating,
    Active,
    Deleting,
}

impl Phase {
    /// Whether moving to `to` is a legal lifecycle step
    pub fn can_transition(self, to: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, to),
            (Idle, Creating)      // provision started
                | (Idle, Active)  // stored record restored
                | (Creating, Active)
                | (Creating, Idle) // provision failed
                | (Active, Deleting)
                | (Active, Idle)  // session expired
                | (Deleting, Idle)
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::Creating => "creating",
            Phase::Active => "active",
            Phase::Deleting => "deleting",
        };
        f.write_str(s)
    }
}

/// Outcome of a single inbox poll
#[derive(Debug, Clone)]
pub struct PollReport {
    /// Every message currently in the inbox, as listed by the provider
    pub messages: Vec<Message>,
    /// Ids that were not present in the previous poll
    pub new_ids: Vec<MessageId>,
    /// True when this poll primed the baseline (new_ids is empty then)
    pub primed: bool,
}

impl PollReport {
    pub fn has_new(&self) -> bool {
        !self.new_ids.is_empty()
    }
}

/// Owns the provisioned mailbox and everything needed to operate it
pub struct Session {
    client: ProviderClient,
    store: CredentialStore,
    tracker: InboxTracker,
    mailbox: Option<Mailbox>,
    phase: Phase,
}

impl Session {
    pub fn new(client: ProviderClient, store: CredentialStore) -> Self {
        Self {
            client,
            store,
            tracker: InboxTracker::new(),
            mailbox: None,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mailbox(&self) -> Option<&Mailbox> {
        self.mailbox.as_ref()
    }

    /// Ids seen in the last poll
    pub fn seen_count(&self) -> usize {
        self.tracker.seen_count()
    }

    /// Load a previously stored mailbox record, if a usable one exists.
    ///
    /// Returns `true` when a mailbox was restored.
    pub fn restore(&mut self) -> Result<bool> {
        match self.store.load() {
            Some(mailbox) => {
                info!("Restored mailbox {}", mailbox.address);
                self.mailbox = Some(mailbox);
                self.tracker.reset();
                self.transition(Phase::Active)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Provision a fresh mailbox, replacing any current one.
    ///
    /// The old account is torn down first so the provider doesn't
    /// accumulate orphans. On any failure the session ends up idle with
    /// no stored record.
    pub fn provision(&mut self) -> Result<&Mailbox> {
        if self.mailbox.is_some() {
            self.teardown(true)?;
        }

        self.transition(Phase::Creating)?;
        let provisioned = self
            .provision_inner()
            .and_then(|mailbox| self.store.save(&mailbox).map(|()| mailbox));

        match provisioned {
            Ok(mailbox) => {
                info!("Provisioned mailbox {}", mailbox.address);
                self.tracker.reset();
                self.transition(Phase::Active)?;
                Ok(self.mailbox.insert(mailbox))
            }
            Err(e) => {
                self.transition(Phase::Idle)?;
                Err(e).context("Failed to provision mailbox")
            }
        }
    }

    fn provision_inner(&self) -> Result<Mailbox> {
        let domains = self.client.list_domains()?;
        let domain = domains
            .iter()
            .find(|d| d.is_active && !d.is_private)
            .or_else(|| domains.first())
            .context("No mail domains available")?;

        let address = format!("user{}@{}", random_string(6), domain.domain);
        let password = format!("pass{}", random_string(12));

        let account = self.client.create_account(&address, &password)?;
        let token = self.client.request_token(&address, &password)?;

        // Prefer the provider's canonical spelling of the address
        let address = if account.address.is_empty() {
            address
        } else {
            account.address
        };

        Ok(Mailbox::new(account.id, address, password, token))
    }

    /// Tear down the current mailbox.
    ///
    /// With `remote`, the provider account is deleted first, best effort:
    /// an expired token only means the remote record is already doomed.
    /// Local state is cleared unconditionally.
    pub fn teardown(&mut self, remote: bool) -> Result<()> {
        let Some(mailbox) = self.mailbox.take() else {
            // Nothing active; make sure no stale record lingers
            return self.store.clear();
        };

        self.transition(Phase::Deleting)?;

        if remote
            && let Err(e) = self.delete_remote(&mailbox)
        {
            warn!("Could not delete remote account {}: {:#}", mailbox.address, e);
        }

        self.store.clear()?;
        self.tracker.reset();
        self.transition(Phase::Idle)?;
        info!("Mailbox {} removed", mailbox.address);
        Ok(())
    }

    fn delete_remote(&self, mailbox: &Mailbox) -> Result<()> {
        let account_id = match &mailbox.account_id {
            Some(id) => id.clone(),
            // Records written before the id was captured: resolve it now
            None => self.client.me(&mailbox.token)?.id,
        };
        self.client.delete_account(&mailbox.token, &account_id)
    }

    /// Forget the mailbox locally after the provider rejected its token.
    /// No remote call is made; the token no longer works anyway.
    pub fn expire(&mut self) -> Result<()> {
        self.mailbox = None;
        self.tracker.reset();
        self.store.clear()?;
        if self.phase != Phase::Idle {
            self.transition(Phase::Idle)?;
        }
        Ok(())
    }

    /// Fetch the inbox and report which messages are new since last poll
    pub fn poll(&mut self) -> Result<PollReport> {
        let mailbox = self.mailbox.as_ref().ok_or(NoMailbox)?;

        let listing = match self.client.list_messages(&mailbox.token) {
            Ok(listing) => listing,
            Err(e) => return self.fail_authenticated(e),
        };

        let primed = !self.tracker.is_primed();
        let messages: Vec<Message> = listing.into_iter().map(normalize_listing).collect();
        let new_ids = self.tracker.observe(messages.iter().map(|m| m.id.clone()));

        debug!(
            "Polled {} messages, {} new",
            messages.len(),
            new_ids.len()
        );
        Ok(PollReport {
            messages,
            new_ids,
            primed,
        })
    }

    /// Fetch a full message, optionally marking it seen on the provider
    pub fn read(&mut self, id: &MessageId, mark_seen: bool) -> Result<MessageDetail> {
        let mailbox = self.mailbox.as_ref().ok_or(NoMailbox)?;
        let token = mailbox.token.clone();

        let resource = match self.client.get_message(&token, id) {
            Ok(resource) => resource,
            Err(e) => return self.fail_authenticated(e),
        };

        if mark_seen
            && !resource.seen
            && let Err(e) = self.client.mark_seen(&token, id)
        {
            warn!("Could not mark message {} seen: {:#}", id, e);
        }

        Ok(normalize_message(resource))
    }

    /// Delete a single message from the mailbox
    pub fn delete_message(&mut self, id: &MessageId) -> Result<()> {
        let mailbox = self.mailbox.as_ref().ok_or(NoMailbox)?;
        let token = mailbox.token.clone();

        match self.client.delete_message(&token, id) {
            Ok(()) => Ok(()),
            Err(e) => self.fail_authenticated(e),
        }
    }

    /// Shared 401 handling: clear local credentials, then surface the error
    fn fail_authenticated<T>(&mut self, e: anyhow::Error) -> Result<T> {
        if e.downcast_ref::<SessionExpired>().is_some() {
            warn!("Provider rejected the stored token; clearing local credentials");
            self.expire()?;
        }
        Err(e)
    }

    fn transition(&mut self, to: Phase) -> Result<()> {
        anyhow::ensure!(
            self.phase.can_transition(to),
            "Illegal session transition: {} -> {}",
            self.phase,
            to
        );
        debug!("Session phase {} -> {}", self.phase, to);
        self.phase = to;
        Ok(())
    }
}

/// Generate a random lowercase-alphanumeric string.
///
/// Seeded from the stdlib's randomly keyed hasher; these accounts are
/// disposable, so no stronger source is needed.
fn random_string(len: usize) -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

    let mut out = String::with_capacity(len);
    while out.len() < len {
        let mut hasher = RandomState::new().build_hasher();
        hasher.write_usize(out.len());
        let mut bits = hasher.finish();
        for _ in 0..8 {
            if out.len() == len {
                break;
            }
            out.push(ALPHABET[(bits % ALPHABET.len() as u64) as usize] as char);
            bits /= ALPHABET.len() as u64;
        }
    }
    out
}
