use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::domain::SubscriberEmail;

/// Transactional delivery transport for the public surface: opt-in
/// notifications and data-export attachments. One narrow operation: hand a
/// message to the provider, report failure.
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: SubscriberEmail,
    authorization_token: Secret<String>,
}

/// A message to deliver. Attachments are carried as raw bytes and encoded
/// at the wire boundary.
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<Attachment>,
}

pub struct Attachment {
    pub name: String,
    pub content: Vec<u8>,
    pub content_type: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentPayload>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AttachmentPayload {
    name: String,
    /// Base64 of the attachment bytes.
    content: String,
    content_type: String,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: SubscriberEmail,
        authorization_token: Secret<String>,
        timeout: Duration,
    ) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build the HTTP client.");

        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        }
    }

    #[tracing::instrument(name = "Push outbound e-mail", skip_all, fields(subject = %message.subject))]
    pub async fn push(&self, message: OutboundMessage) -> Result<(), reqwest::Error> {
        let url = format!("{}/email", self.base_url);
        let attachments = message
            .attachments
            .iter()
            .map(|a| AttachmentPayload {
                name: a.name.clone(),
                content: STANDARD.encode(&a.content),
                content_type: a.content_type.clone(),
            })
            .collect();
        let request_body = SendEmailRequest {
            from: self.sender.as_ref(),
            to: &message.to,
            subject: &message.subject,
            html_body: &message.html_body,
            attachments,
        };

        self.http_client
            .post(&url)
            .header(
                "X-Server-Token",
                self.authorization_token.expose_secret().as_str(),
            )
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
