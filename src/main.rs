use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use esd::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for esd::AppCommand {
    fn from(cmd: Commands) -> esd::AppCommand {
        match cmd {
            Commands::Dashboard { no_prompt } => esd::AppCommand::Dashboard {
                interactive: !no_prompt && console::user_attended(),
            },
            Commands::Market => esd::AppCommand::Market,
            Commands::Forecast => esd::AppCommand::Forecast,
            Commands::Sentiment => esd::AppCommand::Sentiment,
            Commands::Health => esd::AppCommand::Health,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the stability dashboard
    Dashboard {
        /// Exit instead of offering a retry when every source fails
        #[arg(long)]
        no_prompt: bool,
    },
    /// Display detailed market indicators
    Market,
    /// Display the 7-day market forecast
    Forecast,
    /// Display news sentiment analysis
    Sentiment,
    /// Check that the backend responds
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => esd::cli::setup::setup_at_path(path),
            None => esd::cli::setup::setup(),
        },
        Some(cmd) => esd::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
