//! Inbound webhook payload shapes for the Cloud API.
//!
//! The provider posts a deeply nested envelope; only text messages inside
//! a `whatsapp_business_account` event are interesting. Everything else is
//! ignored before reaching the dialogue engine.

use serde::Deserialize;

/// One text message ready for the dialogue engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    /// Sender phone number, used as the session key.
    pub from: String,
    pub text: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub value: ChangeValue,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: String,
    #[serde(rename = "type", default)]
    pub message_type: String,
    pub text: Option<TextBody>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: String,
}

/// Walks the envelope and keeps only text messages with a sender.
pub fn extract_text_messages(payload: &WebhookPayload) -> Vec<InboundMessage> {
    if payload.object != "whatsapp_business_account" {
        return Vec::new();
    }

    payload
        .entry
        .iter()
        .flat_map(|entry| &entry.changes)
        .flat_map(|change| &change.value.messages)
        .filter(|message| message.message_type == "text" && !message.from.is_empty())
        .filter_map(|message| {
            message.text.as_ref().map(|text| InboundMessage {
                from: message.from.clone(),
                text: text.body.clone(),
            })
        })
        .collect()
}
