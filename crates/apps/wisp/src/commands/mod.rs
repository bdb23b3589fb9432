//! Command implementations
//!
//! Each command drives the mailbox session and prints for humans (or,
//! where it makes sense, JSON for scripts).

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use log::warn;
use mail::{ClientConfig, MessageId, NoMailbox, Session, SessionExpired, poll_due};

use crate::render;

/// Provision a fresh mailbox and print its address
pub fn generate(session: &mut Session) -> Result<()> {
    let mailbox = session.provision()?;
    println!("{}", mailbox.address);
    Ok(())
}

/// Print the current address (pipe it to your clipboard tool of choice)
pub fn address(session: &Session) -> Result<()> {
    let mailbox = session.mailbox().ok_or(NoMailbox)?;
    println!("{}", mailbox.address);
    Ok(())
}

/// Show what the session currently looks like, without touching the network
pub fn status(session: &Session, cfg: &ClientConfig) -> Result<()> {
    println!("Provider: {}", cfg.base_url);
    println!("Phase:    {}", session.phase());
    match session.mailbox() {
        Some(mailbox) => {
            println!("Address:  {}", mailbox.address);
            println!(
                "Created:  {}",
                mailbox
                    .created_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
            );
        }
        None => println!("No mailbox; run `wisp generate` to provision one."),
    }
    Ok(())
}

/// One-shot inbox listing
pub fn inbox(session: &mut Session, json: bool) -> Result<()> {
    let report = session.poll()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.messages)?);
        return Ok(());
    }

    if report.messages.is_empty() {
        println!("No messages yet.");
        return Ok(());
    }
    for msg in &report.messages {
        println!("{}", render::message_line(msg));
    }
    Ok(())
}

/// Poll on a fixed interval and report new arrivals until interrupted
pub fn watch(session: &mut Session, interval_secs: u64) -> Result<()> {
    let interval_secs = interval_secs.max(1);

    // First poll primes the baseline; the backlog isn't "new mail"
    let report = session.poll()?;
    let address = session
        .mailbox()
        .map(|m| m.address.clone())
        .unwrap_or_default();
    println!(
        "Watching {}: {} message(s), polling every {}s. Ctrl-C to stop.",
        address,
        report.messages.len(),
        interval_secs
    );
    for msg in &report.messages {
        println!("{}", render::message_line(msg));
    }

    let mut last_poll = Some(Utc::now());
    loop {
        thread::sleep(Duration::from_millis(250));
        if !poll_due(last_poll, interval_secs) {
            continue;
        }

        match session.poll() {
            Ok(report) => {
                for id in &report.new_ids {
                    if let Some(msg) = report.messages.iter().find(|m| &m.id == id) {
                        println!("NEW {}", render::message_line(msg));
                    }
                }
            }
            Err(e) if e.downcast_ref::<SessionExpired>().is_some() => {
                println!("Session expired; local credentials cleared. Run `wisp generate`.");
                return Ok(());
            }
            // One failed poll doesn't stop the loop; the next tick retries
            Err(e) => warn!("Poll failed: {:#}", e),
        }
        last_poll = Some(Utc::now());
    }
}

/// Fetch and show a full message
pub fn read(
    session: &mut Session,
    id: &str,
    json: bool,
    open_in_browser: bool,
    mark_seen: bool,
) -> Result<()> {
    let id = MessageId::new(id);
    let detail = session.read(&id, mark_seen)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    if open_in_browser {
        let path = std::env::temp_dir().join(format!("wisp-{}.html", detail.meta.id));
        std::fs::write(&path, render::message_page(&detail))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        open::that(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        println!("Opened {} in the browser.", path.display());
        return Ok(());
    }

    print!("{}", render::message_text(&detail));
    Ok(())
}

/// Tear down the mailbox (remote account included unless told otherwise)
pub fn delete(session: &mut Session, local_only: bool) -> Result<()> {
    if session.mailbox().is_none() {
        println!("No mailbox to delete.");
        return Ok(());
    }
    session.teardown(!local_only)?;
    println!("Mailbox deleted.");
    Ok(())
}
