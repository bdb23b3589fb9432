//! Provider response normalization
//!
//! Converts provider wire types to domain models.

use chrono::{DateTime, Utc};

use super::api::{AddressField, AttachmentResource, MessageListItem, MessageResource};
use crate::models::{Attachment, EmailAddress, Message, MessageDetail, MessageId};

/// Normalize an inbox listing entry to a domain Message
pub fn normalize_listing(item: MessageListItem) -> Message {
    Message {
        id: MessageId::new(item.id),
        from: normalize_address(item.from),
        to: normalize_address_list(item.to),
        subject: item.subject.unwrap_or_default(),
        preview: item.intro.unwrap_or_default(),
        seen: item.seen,
        has_attachments: item.has_attachments,
        size: item.size,
        received_at: parse_timestamp(item.created_at.as_deref()),
    }
}

/// Normalize a fully fetched message to a domain MessageDetail
pub fn normalize_message(resource: MessageResource) -> MessageDetail {
    let meta = Message {
        id: MessageId::new(resource.id),
        from: normalize_address(resource.from),
        to: normalize_address_list(resource.to),
        subject: resource.subject.unwrap_or_default(),
        preview: resource.intro.unwrap_or_default(),
        seen: resource.seen,
        has_attachments: resource.has_attachments,
        size: resource.size,
        received_at: parse_timestamp(resource.created_at.as_deref()),
    };

    MessageDetail {
        meta,
        cc: normalize_address_list(resource.cc),
        bcc: normalize_address_list(resource.bcc),
        text: resource.text,
        html: resource.html,
        attachments: resource
            .attachments
            .into_iter()
            .map(normalize_attachment)
            .collect(),
    }
}

fn normalize_address(field: Option<AddressField>) -> EmailAddress {
    match field {
        Some(field) => {
            // The provider reports empty display names as ""
            let name = field.name.filter(|n| !n.is_empty());
            EmailAddress {
                name,
                address: field.address,
            }
        }
        None => EmailAddress::new(""),
    }
}

fn normalize_address_list(fields: Vec<AddressField>) -> Vec<EmailAddress> {
    fields.into_iter().map(|f| normalize_address(Some(f))).collect()
}

fn normalize_attachment(resource: AttachmentResource) -> Attachment {
    Attachment {
        id: resource.id,
        filename: resource.filename.unwrap_or_default(),
        content_type: resource
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string()),
        size: resource.size,
    }
}

/// Parse the provider's RFC 3339 timestamps, falling back to now
fn parse_timestamp(s: Option<&str>) -> DateTime<Utc> {
    s.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::api;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_listing_from_fixture() {
        let json = r#"{
            "@id": "/messages/68b1",
            "@type": "Message",
            "id": "68b1",
            "accountId": "/accounts/1a2b",
            "msgid": "<1234@example.test>",
            "from": { "address": "sender@example.test", "name": "Sender" },
            "to": [{ "address": "user@example.test", "name": "" }],
            "subject": "Hello",
            "intro": "First line of the body...",
            "seen": false,
            "isDeleted": false,
            "hasAttachments": true,
            "size": 2048,
            "downloadUrl": "/messages/68b1/download",
            "createdAt": "2024-03-01T12:30:00+00:00",
            "updatedAt": "2024-03-01T12:30:00+00:00"
        }"#;

        let item: api::MessageListItem = serde_json::from_str(json).unwrap();
        let msg = normalize_listing(item);

        assert_eq!(msg.id.as_str(), "68b1");
        assert_eq!(msg.from.address, "sender@example.test");
        assert_eq!(msg.from.name.as_deref(), Some("Sender"));
        assert_eq!(msg.to.len(), 1);
        assert_eq!(msg.to[0].name, None); // empty name collapses
        assert_eq!(msg.subject, "Hello");
        assert_eq!(msg.preview, "First line of the body...");
        assert!(!msg.seen);
        assert!(msg.has_attachments);
        assert_eq!(msg.size, Some(2048));
        assert_eq!(
            msg.received_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_normalize_listing_minimal() {
        // Only the id is guaranteed; everything else defaults
        let json = r#"{ "id": "x1" }"#;
        let item: api::MessageListItem = serde_json::from_str(json).unwrap();
        let msg = normalize_listing(item);

        assert_eq!(msg.id.as_str(), "x1");
        assert_eq!(msg.from.address, "");
        assert_eq!(msg.display_sender(), "(unknown sender)");
        assert_eq!(msg.display_subject(), "(no subject)");
        assert!(msg.to.is_empty());
    }

    #[test]
    fn test_normalize_message_bodies_and_attachments() {
        let json = r#"{
            "id": "68b1",
            "from": { "address": "sender@example.test" },
            "to": [{ "address": "user@example.test" }],
            "cc": [{ "address": "cc@example.test", "name": "Copy" }],
            "subject": "Hello",
            "intro": "First line...",
            "seen": true,
            "hasAttachments": true,
            "createdAt": "2024-03-01T12:30:00+00:00",
            "text": "Full plain body",
            "html": ["<p>Full html body</p>"],
            "attachments": [{
                "id": "att1",
                "filename": "invoice.pdf",
                "contentType": "application/pdf",
                "size": 512
            }]
        }"#;

        let resource: api::MessageResource = serde_json::from_str(json).unwrap();
        let detail = normalize_message(resource);

        assert_eq!(detail.meta.id.as_str(), "68b1");
        assert_eq!(detail.cc[0].display(), "Copy <cc@example.test>");
        assert_eq!(detail.body_text(), "Full plain body");
        assert_eq!(detail.body_html(), Some("<p>Full html body</p>"));
        assert_eq!(detail.attachments.len(), 1);
        assert_eq!(detail.attachments[0].filename, "invoice.pdf");
        assert_eq!(detail.attachments[0].content_type, "application/pdf");
    }

    #[test]
    fn test_parse_timestamp_fallback() {
        // Garbage and absent timestamps fall back to "now" rather than failing
        let before = Utc::now();
        let parsed = parse_timestamp(Some("not-a-date"));
        assert!(parsed >= before);

        let parsed = parse_timestamp(None);
        assert!(parsed >= before);
    }

    #[test]
    fn test_hydra_collection_parsing() {
        let json = r#"{
            "hydra:member": [
                { "id": "d1", "domain": "example.test", "isActive": true, "isPrivate": false }
            ],
            "hydra:totalItems": 1
        }"#;

        let collection: api::HydraCollection<api::DomainResource> =
            serde_json::from_str(json).unwrap();
        assert_eq!(collection.total_items, Some(1));
        assert_eq!(collection.member.len(), 1);
        assert_eq!(collection.member[0].domain, "example.test");
        assert!(collection.member[0].is_active);
    }

    #[test]
    fn test_hydra_collection_missing_member_defaults_empty() {
        let json = r#"{ "hydra:totalItems": 0 }"#;
        let collection: api::HydraCollection<api::DomainResource> =
            serde_json::from_str(json).unwrap();
        assert!(collection.member.is_empty());
    }
}
