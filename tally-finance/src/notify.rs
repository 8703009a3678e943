//! Delivery seam between budget evaluation and outbound transports.
//!
//! Transports implement [`Notifier`]. [`dispatch`] hands every alert to the
//! notifier in order; a failed delivery is logged and recorded, and the
//! remaining alerts are still attempted.

use serde::{Deserialize, Serialize};
use tally_core::AlertEvent;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    /// The transport could not be reached or failed mid-delivery
    #[error("transport failure: {0}")]
    Transport(String),
    /// The transport answered but refused the alert
    #[error("delivery rejected: {0}")]
    Rejected(String),
}

pub trait Notifier {
    /// Short transport name for logs
    fn name(&self) -> &str;

    fn deliver(&self, alert: &AlertEvent) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFailure {
    pub category: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Categories whose alert was delivered
    pub delivered: Vec<String>,
    pub failed: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deliver each alert independently
pub fn dispatch<N>(alerts: &[AlertEvent], notifier: &N) -> DeliveryReport
where
    N: Notifier + ?Sized,
{
    let mut report = DeliveryReport::default();

    for alert in alerts {
        match notifier.deliver(alert) {
            Ok(()) => {
                tracing::info!(
                    notifier = notifier.name(),
                    category = %alert.category,
                    period = %alert.period,
                    "alert delivered"
                );
                report.delivered.push(alert.category.clone());
            }
            Err(e) => {
                tracing::warn!(
                    notifier = notifier.name(),
                    category = %alert.category,
                    error = %e,
                    "alert delivery failed"
                );
                report.failed.push(DeliveryFailure {
                    category: alert.category.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    report
}
