use async_trait::async_trait;

use crate::errors::AppResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbound e-mail delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> AppResult<()>;
}

/// Writes messages to the log instead of delivering them.
#[derive(Clone, Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> AppResult<()> {
        log::info!(
            "Mail from {} to {}: {}\n{}",
            email.from,
            email.to,
            email.subject,
            email.body
        );
        Ok(())
    }
}
