//! Bridge Telegram bot binary.
//!
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx cargo run -p bridge-telegram
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bridge_telegram::TelegramBot;

#[derive(Parser, Debug)]
#[command(name = "bridge-telegram")]
#[command(about = "Telegram adapter for driving a local coding agent remotely")]
struct Args {
    /// Use webhook mode with ngrok (default: polling mode).
    #[arg(short, long)]
    webhook: bool,

    /// Webhook port (default: 8443).
    #[arg(short, long, default_value = "8443")]
    port: u16,

    /// Verbose logging (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let env_path = bridge_core::config::env_file();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let filter = match args.verbose {
        0 => "bridge_telegram=info,teloxide=warn",
        1 => "bridge_telegram=debug,teloxide=info",
        2 => "bridge_telegram=trace,teloxide=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let state_dir = bridge_core::config::state_dir();
    if let Err(e) = bridge_core::config::ensure_state_dir() {
        tracing::warn!(error = %e, "failed to create state directory");
    }

    let mut bot = TelegramBot::new(&state_dir).await?;

    let username = bot.get_me().await?;
    tracing::info!(username = %username, "bridge-telegram started");
    println!("\nBridge Telegram bot");
    println!("  Bot: @{username}");
    println!("  Mode: {}", if args.webhook { "webhook" } else { "polling" });
    println!("\nOpen Telegram and send /start to begin. Press Ctrl+C to stop.\n");

    if args.webhook {
        bot.start_webhook(args.port).await?;
    } else {
        bot.start_polling().await?;
    }

    Ok(())
}
