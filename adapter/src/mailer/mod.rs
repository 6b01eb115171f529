use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use derive_new::new;
use kernel::notifier::MailNotifier;
use reqwest::Client;
use shared::{
    config::MailConfig,
    error::{AppError, AppResult},
};

pub struct GmailNotifier {
    client: Client,
    config: MailConfig,
}

impl GmailNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl MailNotifier for GmailNotifier {
    async fn notify(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let message = format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\n{}",
            self.config.sender, to, subject, body
        );
        let raw = general_purpose::URL_SAFE_NO_PAD.encode(message.as_bytes());

        let res = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.access_token)
            .json(&serde_json::json!({ "raw": raw }))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("mail send failed: {e}")))?;

        if !res.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "mail send failed with status {}",
                res.status()
            )));
        }

        Ok(())
    }
}

/// メール送信が構成されていない環境向けの実装。送信内容をログに書くだけ
#[derive(new)]
pub struct LogOnlyNotifier;

#[async_trait]
impl MailNotifier for LogOnlyNotifier {
    async fn notify(&self, to: &str, subject: &str, _body: &str) -> AppResult<()> {
        tracing::info!(%to, %subject, "mail notification (log only)");
        Ok(())
    }
}
