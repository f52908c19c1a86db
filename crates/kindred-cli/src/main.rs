use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use kindred_core::config::StorageBackend;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "kindred")]
#[command(about = "Kindred - a rule-based supportive companion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or resume an interactive conversation
    Chat {
        /// Session to resume; a new one is created when omitted
        #[arg(long)]
        session: Option<String>,
        /// Seed for template selection (reproducible replies)
        #[arg(long)]
        seed: Option<u64>,
        /// Where the session context is kept
        #[arg(long, value_enum)]
        store: Option<StoreArg>,
        /// Config file to use instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the stage an utterance would be routed to
    Classify {
        text: String,
        /// Exchanges already completed in the session
        #[arg(long, default_value_t = 3)]
        exchanges: u64,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StoreArg {
    Memory,
    File,
}

impl From<StoreArg> for StorageBackend {
    fn from(value: StoreArg) -> Self {
        match value {
            StoreArg::Memory => StorageBackend::Memory,
            StoreArg::File => StorageBackend::File,
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            session,
            seed,
            store,
            config,
        } => {
            let options = commands::chat::ChatOptions {
                session,
                seed,
                store: store.map(StorageBackend::from),
                config,
            };
            commands::chat::run(options).await?
        }
        Commands::Classify {
            text,
            exchanges,
            config,
        } => commands::classify::run(&text, exchanges, config.as_deref())?,
    }

    Ok(())
}
