use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Parser;
use itertools::Itertools;

use date_scopes::{
    errors, phrase,
    preset::{COUNTED_FAMILIES, NAMED_PRESETS},
    timestamp, CalendarUnit, DateScopes, Preset, RangeMode, Scope, Settings, Table,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// JSON settings file, applied before DATE_SCOPES_* variables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Window {
    /// Preset name or phrase, e.g. `ofLast7Days` or "last 7 days"
    name: String,
    #[arg(long)]
    count: Option<i64>,
    #[arg(long)]
    mode: Option<RangeMode>,
    /// Defaults to the current time in the configured timezone
    #[arg(long)]
    anchor: Option<String>,
}

impl Window {
    fn preset(&self) -> errors::Result<Preset> {
        match self.count {
            Some(count) => Preset::named(&self.name, Some(count)),
            None => phrase::parse(&self.name),
        }
    }

    fn scope(&self, scopes: &DateScopes) -> errors::Result<Scope> {
        let mut scope = Scope::new(self.preset()?);
        if let Some(anchor) = parse_anchor(self.anchor.as_deref(), scopes)? {
            scope = scope.anchor(anchor);
        }
        if let Some(mode) = self.mode {
            scope = scope.mode(mode);
        }
        Ok(scope)
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Range covering the last `count` units
    Range {
        #[arg(long)]
        unit: CalendarUnit,
        #[arg(long)]
        count: i64,
        #[arg(long)]
        mode: Option<RangeMode>,
        #[arg(long)]
        anchor: Option<String>,
    },
    /// Range of a named preset or phrase
    Preset {
        #[command(flatten)]
        window: Window,
    },
    /// Rows of a JSON array file that fall within a preset
    Filter {
        file: PathBuf,
        #[command(flatten)]
        window: Window,
        /// Column for this call only
        #[arg(long)]
        column: Option<String>,
        /// Column the file uses instead of the configured one
        #[arg(long)]
        entity_column: Option<String>,
    },
    /// List the preset names by unit
    Presets,
}

/// Unix seconds are read in the configured timezone, like record columns.
fn parse_anchor(value: Option<&str>, scopes: &DateScopes) -> errors::Result<Option<NaiveDateTime>> {
    value
        .map(|value| {
            timestamp::parse_in(value, scopes.settings().timezone)
                .ok_or_else(|| errors::Error::InvalidAnchor(value.to_string()))
        })
        .transpose()
}

fn print_presets() {
    for unit in CalendarUnit::ALL {
        let names = NAMED_PRESETS
            .iter()
            .filter(|(_, preset)| preset.unit() == unit)
            .map(|(name, _)| *name)
            .join(", ");
        let family = COUNTED_FAMILIES
            .iter()
            .find(|(_, u)| *u == unit)
            .map(|(name, _)| format!("{}(n)", name))
            .unwrap_or_default();
        println!("{}: {}, {}", unit.plural(), names, family);
    }
}

fn run() -> errors::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let scopes = DateScopes::new(Settings::load(cli.config.as_deref())?);

    match cli.command {
        Commands::Range {
            unit,
            count,
            mode,
            anchor,
        } => {
            let anchor = parse_anchor(anchor.as_deref(), &scopes)?.unwrap_or_else(|| scopes.now());
            let range = scopes
                .settings()
                .calculator()
                .compute(unit, count, anchor, mode)?;
            println!("{}", serde_json::to_string_pretty(&range)?);
        }
        Commands::Preset { window } => {
            let scope = window.scope(&scopes)?;
            let range = scopes.range(&scope)?;
            let output = serde_json::json!({
                "preset": scope.preset().to_string(),
                "range": range,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Filter {
            file,
            window,
            column,
            entity_column,
        } => {
            let mut table = Table::from_path(&file)?;
            if let Some(entity_column) = entity_column {
                table = table.with_timestamp_column(entity_column);
            }
            let mut scope = window.scope(&scopes)?;
            if let Some(column) = column {
                scope = scope.column(column);
            }

            let matched = scopes.apply(&scope, &table)?;
            log::info!(
                "{} of {} rows in {}",
                matched.len(),
                table.len(),
                scope.preset()
            );
            println!("{}", serde_json::to_string_pretty(matched.rows())?);
        }
        Commands::Presets => print_presets(),
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log::error!("{}", e);
        ::std::process::exit(1);
    }
}
