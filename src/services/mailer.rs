use reqwest::Client as HttpClient;
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::ContactMessage,
};

/// Delivers contact form submissions to the site's mailbox
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContactMailer: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> AppResult<()>;
}

/// Payload accepted by the HTTP mail relay
#[derive(Debug, Serialize)]
struct RelayMail<'a> {
    from: &'a str,
    to: &'a str,
    reply_to: &'a str,
    subject: String,
    text: String,
    html: String,
}

/// Sends mail through a JSON HTTP relay
#[derive(Clone)]
pub struct HttpMailer {
    http_client: HttpClient,
    relay_url: String,
    api_key: String,
    from: String,
    recipient: String,
}

impl HttpMailer {
    pub fn new(relay_url: String, api_key: String, from: String, recipient: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            relay_url,
            api_key,
            from,
            recipient,
        }
    }
}

#[async_trait::async_trait]
impl ContactMailer for HttpMailer {
    async fn send(&self, message: &ContactMessage) -> AppResult<()> {
        let mail = RelayMail {
            from: &self.from,
            to: &self.recipient,
            reply_to: &message.email,
            subject: message.subject(),
            text: message.text_body(),
            html: message.html_body(),
        };

        let response = self
            .http_client
            .post(&self.relay_url)
            .bearer_auth(&self.api_key)
            .json(&mail)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Mail relay rejected message");
            return Err(AppError::ExternalApi(format!(
                "Mail relay returned status {}",
                status
            )));
        }

        tracing::info!(recipient = %self.recipient, "Contact message relayed");
        Ok(())
    }
}

/// Validates a submission and hands it to the mailer
pub async fn deliver_contact_message(
    mailer: &dyn ContactMailer,
    message: ContactMessage,
) -> AppResult<ContactMessage> {
    let message = message.normalized()?;
    mailer.send(&message).await?;
    Ok(message)
}
