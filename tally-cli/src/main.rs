use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tally_core::Period;
use tally_finance::{Pipeline, RunOutput, dispatch};
use tally_ingest::read_statement_csv;

mod config;
mod logging;
mod notifiers;
mod report;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Categorize a bank statement, summarize spending and check budgets"
)]
struct Cli {
    /// Config file (default: ~/.tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals, category breakdown, calendar buckets, rolling average and anomalies
    Report {
        /// Statement CSV (defaults to ./sample_bank_statement.csv if present)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Budget month as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,

        /// Print the full run as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check this month's spending against budgets and deliver alerts
    Budget {
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Month to evaluate as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,

        /// Print alerts instead of delivering them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the category a description maps to
    Categorize {
        #[arg(required = true)]
        description: Vec<String>,
    },

    /// Write the default config (refuses to overwrite)
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Command::InitConfig => {
            let p = config::init_config(cli.config.as_deref())?;
            println!("Wrote {}", p.display());
        }

        Command::Categorize { description } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let rules = cfg.rule_set()?;
            println!("{}", rules.categorize(&description.join(" ")));
        }

        Command::Report { csv, month, json } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let out = run(&cfg, csv, month.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&out).context("serialize report")?);
            } else {
                print!("{}", report::render(&out));
                println!();
                print!("{}", report::render_budget(&out));
            }
        }

        Command::Budget {
            csv,
            month,
            dry_run,
        } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let out = run(&cfg, csv, month.as_deref())?;
            print!("{}", report::render_budget(&out));

            if out.alerts.is_empty() {
                println!("\nNo budgets exceeded for {}.", out.period);
                return Ok(());
            }

            println!();
            if dry_run {
                for a in &out.alerts {
                    println!("[dry-run] {}", a.message());
                }
                return Ok(());
            }

            let notifier = notifiers::build_notifier(&cfg.notify)?;
            let delivery = dispatch(&out.alerts, notifier.as_ref());
            println!(
                "Alerts: {} delivered, {} failed (via {})",
                delivery.delivered.len(),
                delivery.failed.len(),
                notifier.name()
            );
            for f in &delivery.failed {
                println!("- {}: {}", f.category, f.error);
            }
        }
    }

    Ok(())
}

fn run(cfg: &Config, csv: Option<PathBuf>, month: Option<&str>) -> Result<RunOutput> {
    let csv_path = csv.unwrap_or_else(state::default_statement_csv);
    if !csv_path.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", csv_path.display());
    }

    let period = evaluation_period(cfg, month)?;
    let pipeline = Pipeline::new(cfg.rule_set()?, cfg.budget_limits()?, cfg.settings()?);
    let rows = read_rows(&csv_path)?;
    Ok(pipeline.run(rows, period))
}

fn read_rows(path: &Path) -> Result<Vec<tally_ingest::RawRow>> {
    read_statement_csv(path).with_context(|| format!("parsing {}", path.display()))
}

/// Explicit `--month`, else the month containing today in the configured zone
fn evaluation_period(cfg: &Config, month: Option<&str>) -> Result<Period> {
    match month {
        Some(m) => m.parse::<Period>().with_context(|| format!("--month {m}")),
        None => Ok(Period::month_of(cfg.today()?)),
    }
}
