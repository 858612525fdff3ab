use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use valora_core::config::BlobFormat;

mod commands;

#[derive(Parser)]
#[command(name = "valora-state")]
#[command(about = "Inspect, migrate and hydrate persisted Valora wallet state", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate a stored state blob to the latest version
    Migrate {
        /// Blob to read, in either encoding
        input: PathBuf,
        /// Write the migrated tree here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Encoding of the migrated tree
        #[arg(long, value_enum, default_value_t = Format::Plain)]
        format: Format,
    },
    /// Check a state blob against the latest schema
    Validate {
        input: PathBuf,
        /// Config file whose blacklist applies (defaults to the user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Migrate, strip and reconcile as hydration does before validating
        #[arg(long)]
        migrate: bool,
        /// Maximum number of violations to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Hydrate from configured storage, as the app does at startup
    Hydrate {
        /// Config file (defaults to the user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the hydrated tree
        #[arg(long)]
        print: bool,
        /// Write the hydrated tree back to storage
        #[arg(long)]
        persist: bool,
    },
    /// Print the latest root-state schema as JSON
    Schema,
    /// List the registered migration steps
    Versions,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Plain,
    ReduxPersist,
}

impl From<Format> for BlobFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Plain => BlobFormat::Plain,
            Format::ReduxPersist => BlobFormat::ReduxPersist,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Migrate {
            input,
            output,
            format,
        } => commands::migrate::run(&input, output.as_deref(), format.into())?,
        Commands::Validate {
            input,
            config,
            migrate,
            limit,
        } => commands::validate::run(&input, config.as_deref(), migrate, limit).await?,
        Commands::Hydrate {
            config,
            print,
            persist,
        } => commands::hydrate::run(config.as_deref(), print, persist).await?,
        Commands::Schema => commands::schema::print()?,
        Commands::Versions => commands::versions::list()?,
    }

    Ok(())
}
