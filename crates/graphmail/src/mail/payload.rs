//! The Graph `sendMail` request body.

use serde::Serialize;

use super::attachment::AttachmentDescriptor;

const FILE_ATTACHMENT_ODATA_TYPE: &str = "#microsoft.graph.fileAttachment";

/// A single-recipient, plain-text message.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: String,
    pub attachment: Option<AttachmentDescriptor>,
}

/// Top-level sendMail body. Borrows from the [`EmailMessage`] it was built from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMailRequest<'a> {
    pub message: GraphMessage<'a>,
    pub save_to_sent_items: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMessage<'a> {
    pub subject: &'a str,
    pub body: ItemBody<'a>,
    pub to_recipients: Vec<Recipient<'a>>,
    /// Always present; empty when there is no attachment.
    pub attachments: Vec<FileAttachment<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody<'a> {
    pub content_type: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient<'a> {
    pub email_address: EmailAddress<'a>,
}

#[derive(Debug, Serialize)]
pub struct EmailAddress<'a> {
    pub address: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment<'a> {
    #[serde(rename = "@odata.type")]
    pub odata_type: &'static str,
    pub name: &'a str,
    pub content_type: &'a str,
    pub content_bytes: &'a str,
}

impl<'a> From<&'a AttachmentDescriptor> for FileAttachment<'a> {
    fn from(attachment: &'a AttachmentDescriptor) -> Self {
        Self {
            odata_type: FILE_ATTACHMENT_ODATA_TYPE,
            name: &attachment.name,
            content_type: &attachment.content_type,
            content_bytes: &attachment.base64_content,
        }
    }
}

/// Builds the sendMail body.
///
/// The body is always sent as `Text`, whatever it contains, and the message
/// is always saved to Sent Items.
pub fn build_payload(message: &EmailMessage) -> SendMailRequest<'_> {
    SendMailRequest {
        message: GraphMessage {
            subject: &message.subject,
            body: ItemBody {
                content_type: "Text",
                content: &message.body_text,
            },
            to_recipients: vec![Recipient {
                email_address: EmailAddress {
                    address: &message.to,
                },
            }],
            attachments: message
                .attachment
                .iter()
                .map(FileAttachment::from)
                .collect(),
        },
        save_to_sent_items: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use serde_json::json;

    fn message(attachment: Option<AttachmentDescriptor>) -> EmailMessage {
        EmailMessage {
            to: "user@example.com".to_string(),
            subject: "Line 3 stopped".to_string(),
            body_text: "<b>not html</b>".to_string(),
            attachment,
        }
    }

    #[test]
    fn test_payload_without_attachment() {
        let msg = message(None);
        let value = serde_json::to_value(build_payload(&msg)).unwrap();

        assert_eq!(
            value,
            json!({
                "message": {
                    "subject": "Line 3 stopped",
                    "body": { "contentType": "Text", "content": "<b>not html</b>" },
                    "toRecipients": [ { "emailAddress": { "address": "user@example.com" } } ],
                    "attachments": []
                },
                "saveToSentItems": true
            })
        );
    }

    #[test]
    fn test_payload_with_attachment() {
        let bytes = b"%PDF-1.7 fake document";
        let msg = message(Some(AttachmentDescriptor::from_bytes("alarm.pdf", bytes)));
        let value = serde_json::to_value(build_payload(&msg)).unwrap();

        let attachments = value["message"]["attachments"].as_array().unwrap();
        assert_eq!(attachments.len(), 1);

        let entry = &attachments[0];
        assert_eq!(entry["@odata.type"], "#microsoft.graph.fileAttachment");
        assert_eq!(entry["name"], "alarm.pdf");
        assert_eq!(entry["contentType"], "application/pdf");

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(entry["contentBytes"].as_str().unwrap())
            .unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_single_recipient() {
        let msg = message(None);
        let payload = build_payload(&msg);
        assert_eq!(payload.message.to_recipients.len(), 1);
    }
}
