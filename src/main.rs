//! gymlog - Workout session tracker bot

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gymlog")]
#[command(author, version, about = "Workout session tracker bot")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start Telegram bot
    Bot {
        /// Telegram bot token (or set TELOXIDE_TOKEN env var)
        #[arg(short, long, env = "TELOXIDE_TOKEN")]
        token: String,
    },

    /// Chat with the bot in the terminal
    Console {
        /// Chat id to act as
        #[arg(short, long, default_value = "1")]
        chat: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // stdout belongs to the console front end
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bot { token } => {
            println!("Starting Telegram bot...");
            gymlog::bot::run_bot(token).await?;
        }

        Commands::Console { chat } => {
            let stdin = std::io::stdin();
            gymlog::console::run_console(chat.into(), stdin.lock(), std::io::stdout())?;
        }
    }

    Ok(())
}
