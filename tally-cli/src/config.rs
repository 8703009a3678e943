use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::budget::default_limits;
use tally_core::rules::default_rules;
use tally_core::{BudgetLimit, BudgetLimits, CategoryRule, CategoryRuleSet};
use tally_finance::Settings;
use tally_finance::aggregator::DEFAULT_ROLLING_WINDOW;
use tally_finance::anomaly::DEFAULT_THRESHOLD;

use crate::state::{default_config_path, ensure_tally_home};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA zone used to decide which month "now" is in
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub analysis: AnalysisSection,
    /// Match order is array order
    #[serde(default = "default_rules")]
    pub categories: Vec<CategoryRule>,
    /// Alert order is array order
    #[serde(default = "default_limits")]
    pub budgets: Vec<BudgetLimit>,
    #[serde(default)]
    pub notify: NotifySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSection {
    #[serde(default = "default_threshold", with = "rust_decimal::serde::float")]
    pub anomaly_threshold: Decimal,
    #[serde(default = "default_window")]
    pub rolling_window_days: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Console,
    Outbox,
    Webhook,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifySection {
    #[serde(default)]
    pub kind: NotifierKind,
    /// Required for kind = "webhook"
    pub webhook_url: Option<String>,
    /// For kind = "outbox" (default: ~/.tally/alerts.jsonl)
    pub outbox_path: Option<PathBuf>,
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

fn default_threshold() -> Decimal {
    DEFAULT_THRESHOLD
}

fn default_window() -> usize {
    DEFAULT_ROLLING_WINDOW
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            anomaly_threshold: default_threshold(),
            rolling_window_days: default_window(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            analysis: AnalysisSection::default(),
            categories: default_rules(),
            budgets: default_limits(),
            notify: NotifySection::default(),
        }
    }
}

impl Config {
    pub fn rule_set(&self) -> Result<CategoryRuleSet> {
        CategoryRuleSet::new(self.categories.clone()).context("invalid [[categories]]")
    }

    pub fn budget_limits(&self) -> Result<BudgetLimits> {
        BudgetLimits::new(self.budgets.clone()).context("invalid [[budgets]]")
    }

    pub fn settings(&self) -> Result<Settings> {
        if self.analysis.rolling_window_days == 0 {
            bail!("analysis.rolling_window_days must be at least 1");
        }
        if self.analysis.anomaly_threshold <= Decimal::ZERO {
            bail!("analysis.anomaly_threshold must be positive");
        }
        Ok(Settings {
            rolling_window: self.analysis.rolling_window_days,
            anomaly_threshold: self.analysis.anomaly_threshold,
        })
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone: {}", self.timezone))
    }

    /// Today's date in the configured timezone
    pub fn today(&self) -> Result<NaiveDate> {
        Ok(Utc::now().with_timezone(&self.tz()?).date_naive())
    }

    /// Check every section up front so commands fail before doing work
    pub fn validate(&self) -> Result<()> {
        self.rule_set()?;
        self.budget_limits()?;
        self.settings()?;
        self.tz()?;
        if self.notify.kind == NotifierKind::Webhook && self.notify.webhook_url.is_none() {
            bail!("notify.kind = \"webhook\" requires notify.webhook_url");
        }
        Ok(())
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s).context("parse config.toml")?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load from `path`, or from `~/.tally/config.toml` when none is given.
/// Only the default location may be absent (built-in defaults apply).
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = default_config_path()?;
            if !p.exists() {
                tracing::debug!(path = %p.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("load {}", p.display()))
}

pub fn init_config(path: Option<&Path>) -> Result<PathBuf> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => ensure_tally_home()?.join("config.toml"),
    };
    if p.exists() {
        bail!("config already exists: {}", p.display());
    }
    let s = toml::to_string_pretty(&Config::default()).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}
