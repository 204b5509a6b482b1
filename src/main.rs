use analytics::{Ledger, ProfitSummary};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{Config, StorageBackend};
use std::net::IpAddr;
use std::path::PathBuf;

/// The main entry point for the Lucrabet ledger.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; everything can come from the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Held until exit so buffered file logs are flushed.
    let _guard = configuration::init_tracing(&config.logging)?;

    match cli.command {
        Commands::Serve(args) => {
            args.apply(&mut config);
            web_server::run_server(&config).await
        }
        Commands::Migrate => handle_migrate(&config).await,
        Commands::Summary(args) => handle_summary(args, &config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Bookkeeping for betting-site operations: accounts, platforms and daily profit.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. It may be absent.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API.
    Serve(ServeArgs),
    /// Apply pending database migrations and exit.
    Migrate,
    /// Print profit, deposit and net totals.
    Summary(SummaryArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind, overriding `server.host`.
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to bind, overriding `server.port`.
    #[arg(long)]
    port: Option<u16>,

    /// Storage backend, overriding `storage.backend`.
    #[arg(long, value_enum)]
    backend: Option<StorageBackend>,

    /// Shorthand for `--backend memory`.
    #[arg(long, conflicts_with = "backend")]
    memory: bool,
}

impl ServeArgs {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.memory {
            config.storage.backend = StorageBackend::Memory;
        } else if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
    }
}

#[derive(Args)]
struct SummaryArgs {
    /// A single day (format: YYYY-MM-DD).
    #[arg(long, conflicts_with_all = ["from", "to"])]
    date: Option<NaiveDate>,

    /// The first day of an inclusive range (format: YYYY-MM-DD).
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// The last day of an inclusive range (format: YYYY-MM-DD).
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = database::connect(&config.database).await?;
    database::run_migrations(&pool).await?;
    println!("Migrations applied.");
    Ok(())
}

async fn handle_summary(args: SummaryArgs, config: &Config) -> anyhow::Result<()> {
    let store = database::open_store(config.storage.backend, &config.database).await?;
    let ledger = Ledger::new(store);

    let (scope, summary) = match (args.date, args.from, args.to) {
        (Some(date), _, _) => (date.to_string(), ledger.daily_summary(date).await?),
        (None, Some(from), Some(to)) => (
            format!("{from} .. {to}"),
            ledger.period_summary(from, to).await?,
        ),
        _ => ("all time".to_string(), ledger.overall_summary().await?),
    };

    println!("{}", summary_table(&scope, &summary));
    Ok(())
}

fn summary_table(scope: &str, summary: &ProfitSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Scope", "Profit", "Deposit", "Net profit"])
        .add_row(vec![
            scope.to_string(),
            summary.profit_total.to_string(),
            summary.deposit_total.to_string(),
            summary.net_profit.to_string(),
        ]);
    table
}
