//! Wisp - a disposable mailbox on the command line
//!
//! Provisions a throwaway address on the mail provider, watches its inbox,
//! and tears it down when you're done.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::error;
use mail::{ClientConfig, CredentialStore, ProviderClient, Session};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "wisp", version, about = "Disposable mailbox client")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Provision a fresh mailbox, replacing any current one
    Generate,
    /// Print the current mailbox address
    Address,
    /// Show the session status
    Status,
    /// List the messages currently in the inbox
    Inbox {
        /// Emit the message list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Poll the inbox continuously and report new mail
    Watch {
        /// Seconds between polls (defaults to the configured interval)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Show a full message
    Read {
        /// Message id, as shown by `wisp inbox`
        id: String,
        /// Emit the message as JSON
        #[arg(long)]
        json: bool,
        /// Open the message body in the system browser
        #[arg(long)]
        open: bool,
        /// Mark the message seen on the provider
        #[arg(long)]
        mark_seen: bool,
    },
    /// Tear down the mailbox
    Delete {
        /// Only clear local credentials, leave the remote account alone
        #[arg(long)]
        local_only: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();

    // Bootstrap the config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let cfg = ClientConfig::load();
    let client = ProviderClient::new(&cfg.base_url)?;
    let store = CredentialStore::new()?;

    let mut session = Session::new(client, store);
    session
        .restore()
        .context("Failed to restore stored mailbox")?;

    match args.command {
        Command::Generate => commands::generate(&mut session),
        Command::Address => commands::address(&session),
        Command::Status => commands::status(&session, &cfg),
        Command::Inbox { json } => commands::inbox(&mut session, json),
        Command::Watch { interval } => {
            commands::watch(&mut session, interval.unwrap_or(cfg.poll_interval_secs))
        }
        Command::Read {
            id,
            json,
            open,
            mark_seen,
        } => commands::read(&mut session, &id, json, open, mark_seen),
        Command::Delete { local_only } => commands::delete(&mut session, local_only),
    }
}
