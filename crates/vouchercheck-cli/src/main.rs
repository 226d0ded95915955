mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "vouchercheck-cli")]
#[command(about = "VoucherCheck command line interface")]
struct Cli {
    /// Path to the voucher catalog file.
    #[arg(
        long,
        global = true,
        env = "VOUCHERCHECK_VOUCHERS_PATH",
        default_value = "./config/vouchers.yaml"
    )]
    vouchers_path: PathBuf,

    /// Path to the validation table file.
    #[arg(
        long,
        global = true,
        env = "VOUCHERCHECK_VALIDATION_PATH",
        default_value = "./config/validation.yaml"
    )]
    validation_path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the voucher catalog with a free-text query.
    Discover {
        query: String,
        /// City for location-exclusive backfill when few results match.
        #[arg(long)]
        location: Option<String>,
    },
    /// Check whether a specific store code is still redeemable.
    Validate { store: String, code: String },
    /// List active validation records, for one store or all of them.
    Active { store: Option<String> },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Discover { query, location } => {
            let catalog = vouchercheck_discovery::load_catalog(&cli.vouchers_path)?;
            commands::run_discover(&catalog, &query, location.as_deref());
        }
        Commands::Validate { store, code } => {
            let table = vouchercheck_validation::load_validation(&cli.validation_path)?;
            commands::run_validate(&table, &store, &code);
        }
        Commands::Active { store } => {
            let table = vouchercheck_validation::load_validation(&cli.validation_path)?;
            commands::run_active(&table, store.as_deref());
        }
    }

    Ok(())
}
