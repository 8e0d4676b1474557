//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves settings and opens the cached database
//! - runs the assessment pipeline
//! - prints reports

use clap::Parser;
use tracing::debug;

use crate::cli::{Command, SourceArgs, StatusArgs, TopArgs};
use crate::config::{Settings, parse_ttl_hours};
use crate::data::Database;
use crate::domain::Window;
use crate::error::{AppError, ErrorKind};

pub mod pipeline;

const SUBCOMMANDS: [&str; 3] = ["status", "top", "countries"];

/// Entry point for the `covid` binary.
pub fn run() -> Result<(), AppError> {
    // `covid` and `covid italy` behave like `covid status ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let settings = settings_from_args(Settings::from_env()?, &cli.source)?;
    let mut db = settings.open_database()?;

    match cli.command {
        Command::Status(args) => handle_status(&mut db, &args),
        Command::Top(args) => handle_top(&mut db, &args),
        Command::Countries => handle_countries(&mut db),
    }
}

fn handle_status(db: &mut Database, args: &StatusArgs) -> Result<(), AppError> {
    let snapshot = db.snapshot()?;
    let window = Window::resolve(
        snapshot.latest(),
        args.days,
        args.since,
        args.compare_days,
        args.compare,
    )?;
    debug!(?window, country = %args.country, "resolved window");

    let assessment = pipeline::assess(&snapshot, &args.country, &window)?;

    if args.json {
        let json = serde_json::to_string_pretty(&assessment)
            .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to serialize assessment: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_status(&assessment));
    }
    Ok(())
}

fn handle_top(db: &mut Database, args: &TopArgs) -> Result<(), AppError> {
    let list = pipeline::assess_all(db, args.days, args.worse)?;
    print!("{}", crate::report::format_top(&list));
    Ok(())
}

fn handle_countries(db: &mut Database) -> Result<(), AppError> {
    let countries = db.countries()?;
    print!("{}", crate::report::format_countries(&countries));
    Ok(())
}

/// Apply CLI overrides on top of environment settings.
pub fn settings_from_args(mut settings: Settings, args: &SourceArgs) -> Result<Settings, AppError> {
    if let Some(origin) = &args.origin {
        settings.origin = origin.clone();
    }
    if let Some(dir) = &args.cache_dir {
        settings.cache_dir = dir.clone();
    }
    if let Some(raw) = &args.ttl_hours {
        settings.ttl = parse_ttl_hours(raw)?;
    }
    Ok(settings)
}

/// Rewrite argv so `covid` defaults to `covid status`.
///
/// Rules:
/// - `covid`                         -> `covid status`
/// - `covid italy -d 5`              -> `covid status italy -d 5`
/// - `covid --help/--version/-h/-V`  -> unchanged (show top-level help/version)
/// - `covid --cache-dir X top`       -> unchanged (global flags before a subcommand)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("status".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if argv.iter().skip(1).any(|a| SUBCOMMANDS.contains(&a.as_str())) {
        return argv;
    }

    argv.insert(1, "status".to_string());
    argv
}
