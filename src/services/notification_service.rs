use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::models::message::NewMessage;

/// Secondary delivery path for contact submissions.
///
/// `notify` must return immediately; delivery happens in the background and
/// its outcome never reaches the submitter.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn notify(&self, msg: NewMessage);
}

/// Forwards submissions to the external message server.
#[derive(Clone)]
pub struct HttpNotifier {
    client: Client,
    target_url: String,
    password: Option<String>,
}

impl HttpNotifier {
    pub fn new(target_url: String, password: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            target_url,
            password,
        })
    }

    pub async fn deliver_once(&self, msg: &NewMessage) -> Result<()> {
        let mut request = self.client.post(&self.target_url).json(msg);
        if let Some(password) = &self.password {
            request = request.query(&[("password", password)]);
        }
        // The request URL carries the password, so it is dropped from any error.
        request
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(reqwest::Error::without_url)?;
        Ok(())
    }
}

impl Notifier for HttpNotifier {
    fn is_enabled(&self) -> bool {
        true
    }

    fn notify(&self, msg: NewMessage) {
        let notifier = self.clone();
        tokio::spawn(async move {
            match notifier.deliver_once(&msg).await {
                Ok(()) => tracing::info!(email = %msg.email, "contact message forwarded"),
                Err(e) => tracing::warn!(error = %e, "failed to forward contact message"),
            }
        });
    }
}

/// Used when no message server is configured.
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn is_enabled(&self) -> bool {
        false
    }

    fn notify(&self, _msg: NewMessage) {}
}
