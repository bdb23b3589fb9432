//! Plain-text and HTML rendering of messages

use chrono::Local;
use mail::{EmailAddress, Message, MessageDetail};

/// One-line inbox listing entry
pub fn message_line(msg: &Message) -> String {
    let marker = if msg.seen { ' ' } else { '*' };
    let when = msg
        .received_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M");
    let attachments = if msg.has_attachments { " [att]" } else { "" };
    format!(
        "{} {}  {}  {:<32}  {}{}",
        marker,
        msg.id,
        when,
        truncate(&msg.display_sender(), 32),
        msg.display_subject(),
        attachments
    )
}

/// Full plain-text rendition of a message
pub fn message_text(detail: &MessageDetail) -> String {
    let meta = &detail.meta;
    let mut out = String::new();

    out.push_str(&format!("From:    {}\n", meta.display_sender()));
    if !meta.to.is_empty() {
        out.push_str(&format!("To:      {}\n", join_addresses(&meta.to)));
    }
    if !detail.cc.is_empty() {
        out.push_str(&format!("Cc:      {}\n", join_addresses(&detail.cc)));
    }
    out.push_str(&format!(
        "Date:    {}\n",
        meta.received_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("Subject: {}\n", meta.display_subject()));
    for att in &detail.attachments {
        out.push_str(&format!(
            "Attach:  {} ({})\n",
            att.filename, att.content_type
        ));
    }

    out.push('\n');
    out.push_str(detail.body_text());
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// HTML page for browser viewing: the message's own HTML when present,
/// otherwise the plain text wrapped in a pre block
pub fn message_page(detail: &MessageDetail) -> String {
    let meta = &detail.meta;
    let content = match detail.body_html() {
        Some(html) => html.to_string(),
        None => format!(
            "<pre style=\"white-space:pre-wrap\">{}</pre>",
            escape_html(detail.body_text())
        ),
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h3>From: {from}</h3>\n<h4>Subject: {title}</h4>\n<hr>\n{content}\n</body>\n</html>\n",
        title = escape_html(meta.display_subject()),
        from = escape_html(&meta.display_sender()),
        content = content,
    )
}

fn join_addresses(addresses: &[EmailAddress]) -> String {
    addresses
        .iter()
        .map(|a| a.display())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Minimal HTML escaping for text interpolated into the page
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
