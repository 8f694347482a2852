//! Daily Metrics CLI
//!
//! Command-line access to the daily metrics table:
//! - List the rows of a day
//! - Add, update and delete rows
//! - Generate a config file

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use daily_metrics::config::Config;
use daily_metrics::dashboard::{local_today, Confirmation};
use daily_metrics::i18n::{Language, TextKey};
use daily_metrics::records::{
    round_liquidity, FieldValue, MetricField, MetricPatch, MetricRecord, NewMetricRecord, RecordId,
};

#[derive(Parser)]
#[command(name = "daily-metrics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Record and review daily business metrics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Display language for headers and prompts (ar, en)
    #[arg(long, global = true)]
    pub lang: Option<Language>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the rows of a day, newest first
    List {
        /// Day to list (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Add a row
    Add {
        /// Day the metrics belong to (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "0")]
        visits: u64,
        #[arg(long, default_value = "0")]
        downloads: u64,
        #[arg(long, default_value = "0")]
        operations: u64,
        #[arg(long, default_value = "0")]
        liquidity: Decimal,
    },

    /// Change some fields of a row
    Update {
        /// Row id
        id: String,
        #[arg(long)]
        visits: Option<u64>,
        #[arg(long)]
        downloads: Option<u64>,
        #[arg(long)]
        operations: Option<u64>,
        #[arg(long)]
        liquidity: Option<Decimal>,
    },

    /// Delete a row
    Delete {
        /// Row id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Asks on the terminal; anything but y/yes declines
struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let config = daily_metrics::config::generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &config)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", config),
        }
        return Ok(());
    }

    let config = Config::load_from(cli.config.as_deref())?;
    daily_metrics::logging::init(&config.logging).context("Failed to initialize logging")?;

    let language = match cli.lang {
        Some(language) => language,
        None => config
            .dashboard
            .language_preference()?
            .resolve(std::env::var("LANG").ok().as_deref()),
    };
    let backend = config
        .backend
        .build()
        .context("Failed to create metrics backend")?;

    match cli.command {
        Commands::List { date, format } => {
            let date = date.unwrap_or_else(local_today);
            let rows = backend.fetch_by_date(date).await?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                OutputFormat::Csv => print_csv(&rows)?,
                OutputFormat::Table => print_table(language, date, &rows),
            }
        }

        Commands::Add {
            date,
            visits,
            downloads,
            operations,
            liquidity,
        } => {
            let row = backend
                .insert(NewMetricRecord {
                    metric_date: date.unwrap_or_else(local_today),
                    website_visits: visits,
                    app_downloads: downloads,
                    finished_operations: operations,
                    liquidity: round_liquidity(liquidity),
                })
                .await?;
            println!("Added {} for {}", row.id, row.metric_date);
        }

        Commands::Update {
            id,
            visits,
            downloads,
            operations,
            liquidity,
        } => {
            let changes = [
                (MetricField::WebsiteVisits, visits.map(FieldValue::Count)),
                (MetricField::AppDownloads, downloads.map(FieldValue::Count)),
                (MetricField::FinishedOperations, operations.map(FieldValue::Count)),
                (MetricField::Liquidity, liquidity.map(FieldValue::Amount)),
            ];
            let patch = changes
                .into_iter()
                .filter_map(|(field, value)| value.map(|v| (field, v)))
                .fold(MetricPatch::new(), |patch, (field, value)| {
                    patch.with(field, value)
                });
            if patch.is_empty() {
                bail!("Nothing to update: pass at least one of --visits, --downloads, --operations, --liquidity");
            }

            let row = backend.update(&RecordId::new(id), &patch).await?;
            println!("Updated {}", row.id);
        }

        Commands::Delete { id, yes } => {
            let confirmation: &dyn Confirmation = if yes { &true } else { &StdinConfirmation };
            if !confirmation.confirm(language.text(TextKey::ConfirmDelete)) {
                println!("Cancelled");
                return Ok(());
            }

            let id = RecordId::new(id);
            backend.delete(&id).await?;
            println!("Deleted {}", id);
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn print_table(language: Language, date: NaiveDate, rows: &[MetricRecord]) {
    println!("{} {}", language.text(TextKey::MetricsFor), date);
    println!();

    if rows.is_empty() {
        println!("{}", language.text(TextKey::NoDataForThisDate));
        return;
    }

    println!(
        "{:<38} {:<20} {:>14} {:>14} {:>14} {:>14}",
        "ID",
        language.text(TextKey::CreatedAt),
        language.text(TextKey::WebsiteVisitsHeader),
        language.text(TextKey::AppDownloadsHeader),
        language.text(TextKey::FinishedOperationsHeader),
        language.text(TextKey::LiquidityHeader)
    );
    println!("{}", "-".repeat(119));

    for row in rows {
        println!(
            "{:<38} {:<20} {:>14} {:>14} {:>14} {:>14}",
            row.id.as_str(),
            row.created_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            row.website_visits,
            row.app_downloads,
            row.finished_operations,
            FieldValue::Amount(row.liquidity).to_string()
        );
    }
}

fn print_csv(rows: &[MetricRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record([
        "id",
        "created_at",
        "metric_date",
        "website_visits",
        "app_downloads",
        "finished_operations",
        "liquidity",
    ])?;

    for row in rows {
        writer.write_record([
            row.id.to_string(),
            row.created_at.to_rfc3339(),
            row.metric_date.to_string(),
            row.website_visits.to_string(),
            row.app_downloads.to_string(),
            row.finished_operations.to_string(),
            FieldValue::Amount(row.liquidity).to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
