//! Command-line parsing for the `covid` status tool.
//!
//! The goal of this module is to keep **argument parsing** separate from data
//! access and growth math.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Date format accepted by `--since` and `--compare`.
pub const DATE_LAYOUT: &str = "%Y-%m-%d";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "covid", version, about = "Worldwide situation of COVID-19")]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for where data comes from and how long it is cached.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Base URL of the time-series files (env: COVID_ORIGIN).
    #[arg(long, global = true)]
    pub origin: Option<String>,

    /// Directory for cached CSV files (env: COVID_CACHE_DIR).
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Hours before cached files are refetched (env: COVID_CACHE_TTL_HOURS).
    #[arg(long, global = true)]
    pub ttl_hours: Option<String>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a tweet-long message about the situation of COUNTRY.
    ///
    /// COUNTRY is one of the names listed by `covid countries`; leave it empty or
    /// use "world" for the whole world.
    Status(StatusArgs),
    /// Ordered list of the countries with the best control.
    Top(TopArgs),
    /// List the countries with reported cases.
    Countries,
}

#[derive(Debug, Args, Clone)]
pub struct StatusArgs {
    /// Country name (case-insensitive); "world" or empty for the global total.
    #[arg(default_value = "")]
    pub country: String,

    /// Estimate over the last n days.
    #[arg(short, long)]
    pub days: Option<i64>,

    /// Start the estimate at this date (YYYY-MM-DD); overrides --days.
    #[arg(short, long, value_parser = parse_date)]
    pub since: Option<NaiveDate>,

    /// Length of the comparison window in days (defaults to twice --days).
    #[arg(short = 'c', long)]
    pub compare_days: Option<i64>,

    /// Start the comparison window at this date (YYYY-MM-DD); overrides --compare-days.
    #[arg(long, value_parser = parse_date)]
    pub compare: Option<NaiveDate>,

    /// Print the full assessment as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct TopArgs {
    /// Sort worst first.
    #[arg(short, long)]
    pub worse: bool,

    /// Estimate over the last n days.
    #[arg(short, long, default_value_t = 7)]
    pub days: i64,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_LAYOUT)
        .map_err(|e| format!("expected {DATE_LAYOUT}: {e}"))
}
