//! Local persistence of the mailbox credential record
//!
//! The record lives as a single JSON blob in the Vapor config directory,
//! created on provisioning, read at startup, removed on teardown.

use anyhow::{Context, Result};
use log::warn;
use std::path::{Path, PathBuf};

use crate::models::Mailbox;

/// Credential record filename in the Vapor config directory
pub const ACCOUNT_FILE: &str = "account.json";

/// Reads and writes the stored mailbox record
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store at the default location (~/.config/vapor/account.json)
    pub fn new() -> Result<Self> {
        let path =
            config::config_path(ACCOUNT_FILE).context("Could not determine config directory")?;
        Ok(Self { path })
    }

    /// Store at an explicit path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the stored record, if there is a usable one.
    ///
    /// A missing, malformed, or incomplete record loads as `None`;
    /// stale garbage on disk is treated the same as no account at all.
    pub fn load(&self) -> Option<Mailbox> {
        if !self.path.exists() {
            return None;
        }
        match config::load_json_file::<Mailbox>(&self.path) {
            Ok(mailbox) if mailbox.is_complete() => Some(mailbox),
            Ok(_) => {
                warn!("Stored mailbox record is incomplete, ignoring it");
                None
            }
            Err(e) => {
                warn!("Stored mailbox record is unreadable, ignoring it: {:#}", e);
                None
            }
        }
    }

    /// Persist the record
    pub fn save(&self, mailbox: &Mailbox) -> Result<()> {
        config::save_json_file(&self.path, mailbox)
    }

    /// Remove the record; removing an absent record succeeds
    pub fn clear(&self) -> Result<()> {
        config::remove_file(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> CredentialStore {
        CredentialStore::at_path(dir.path().join(ACCOUNT_FILE))
    }

    #[test]
    fn test_load_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(store_in(&tmp).load().is_none());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        let mailbox = Mailbox::new("acct1", "user@example.test", "pw", "tok");
        store.save(&mailbox).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, mailbox);
    }

    #[test]
    fn test_malformed_record_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_incomplete_record_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        // Parses fine, but there is no token to authenticate with
        std::fs::write(
            store.path(),
            r#"{ "address": "user@example.test", "password": "pw", "token": "" }"#,
        )
        .unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        store
            .save(&Mailbox::new("acct1", "user@example.test", "pw", "tok"))
            .unwrap();
        store.clear().unwrap();
        assert!(!store.exists());
        store.clear().unwrap();
    }
}
