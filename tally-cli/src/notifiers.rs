//! Alert transports for the `budget` command.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tally_core::AlertEvent;
use tally_finance::{Notifier, NotifyError};

use crate::config::{NotifierKind, NotifySection};
use crate::state::{default_outbox_path, ensure_tally_home};

/// Prints alerts to stdout
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    fn deliver(&self, alert: &AlertEvent) -> Result<(), NotifyError> {
        println!("[{}] {}", alert.period, alert.message());
        Ok(())
    }
}

/// Appends one JSON object per alert to a file
pub struct OutboxNotifier {
    path: PathBuf,
}

impl OutboxNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Notifier for OutboxNotifier {
    fn name(&self) -> &str {
        "outbox"
    }

    fn deliver(&self, alert: &AlertEvent) -> Result<(), NotifyError> {
        let line = serde_json::to_string(alert).map_err(|e| NotifyError::Rejected(e.to_string()))?;
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| NotifyError::Transport(format!("open {}: {e}", self.path.display())))?;
        writeln!(f, "{line}")
            .map_err(|e| NotifyError::Transport(format!("write {}: {e}", self.path.display())))
    }
}

/// POSTs each alert as JSON
pub struct WebhookNotifier {
    url: String,
    client: reqwest::blocking::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("build http client")?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    fn deliver(&self, alert: &AlertEvent) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({
                "subject": alert.subject(),
                "message": alert.message(),
                "alert": alert,
            }))
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NotifyError::Rejected(format!("HTTP {status}")))
        }
    }
}

pub fn build_notifier(section: &NotifySection) -> Result<Box<dyn Notifier>> {
    Ok(match section.kind {
        NotifierKind::Console => Box::new(ConsoleNotifier),
        NotifierKind::Outbox => {
            let path = match &section.outbox_path {
                Some(p) => p.clone(),
                None => {
                    ensure_tally_home()?;
                    default_outbox_path()?
                }
            };
            Box::new(OutboxNotifier::new(path))
        }
        NotifierKind::Webhook => {
            let url = section
                .webhook_url
                .as_deref()
                .context("notify.webhook_url is not set")?;
            Box::new(WebhookNotifier::new(url)?)
        }
    })
}
