//! tally-finance: categorization, aggregation, anomaly detection and budget alerts

pub mod aggregator;
pub mod anomaly;
pub mod budget;
pub mod category_rules;
pub mod notify;
pub mod pipeline;
pub mod stats;

pub use aggregator::{Aggregates, CategoryTotal, DailyTotal, PeriodTotal, RollingPoint};
pub use anomaly::{AnomalyDetector, PeriodAnomaly};
pub use budget::{BudgetEvaluator, BudgetStatus};
pub use category_rules::Categorizer;
pub use notify::{DeliveryReport, Notifier, NotifyError, dispatch};
pub use pipeline::{Pipeline, RunOutput, Settings};
