use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `~/.tally`, the home for config and the alert outbox
pub fn tally_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

pub fn ensure_tally_home() -> Result<PathBuf> {
    let dir = tally_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

pub fn default_outbox_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("alerts.jsonl"))
}

/// Statement used when `--csv` is not given
pub fn default_statement_csv() -> PathBuf {
    PathBuf::from("sample_bank_statement.csv")
}
