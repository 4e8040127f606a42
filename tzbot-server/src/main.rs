use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use tzbot_common::traits::platform_traits::{ConnectionStatus, PlatformIntegration};
use tzbot_core::eventbus::EventBus;
use tzbot_core::platforms::discord::DiscordPlatform;
use tzbot_core::repositories::{JsonTimezoneRepository, TimezoneRepository};
use tzbot_core::services::{CommandService, MessageService};
use tzbot_core::{BotConfig, Error};

#[derive(Parser, Clone)]
#[command(name = "tzbot")]
#[command(author, version, about = "tzbot - per-server timezone registry for Discord")]
struct Args {
    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    token: String,

    /// JSON file holding every server's timezone records
    #[arg(long, env = "TZBOT_DATA_FILE", default_value = "data/timezones.json")]
    data_file: PathBuf,

    /// Leading marker for chat commands
    #[arg(long, env = "TZBOT_PREFIX", default_value = "!")]
    prefix: String,
}

impl Args {
    fn bot_config(&self) -> Result<BotConfig, Error> {
        let prefix = self.prefix.trim();
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!(
                "command prefix must be non-empty and contain no whitespace, got '{}'",
                self.prefix
            )));
        }
        Ok(BotConfig {
            data_file: self.data_file.clone(),
            command_prefix: prefix.to_string(),
            ..BotConfig::default()
        })
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("tzbot=info".parse()?);
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing()?;
    let args = Args::parse();
    info!(
        "tzbot starting. data_file={}, prefix='{}'",
        args.data_file.display(),
        args.prefix
    );

    if let Err(e) = run_bot(args).await {
        error!("Bot error: {:?}", e);
        return Err(e.into());
    }
    info!("Main finished. Goodbye!");
    Ok(())
}

async fn run_bot(args: Args) -> Result<(), Error> {
    let config = args.bot_config()?;

    // 1) Reload stored timezones
    let repo: Arc<dyn TimezoneRepository> =
        Arc::new(JsonTimezoneRepository::open(&config.data_file).await?);

    // 2) Wire the bus, services and Discord sender
    let event_bus = Arc::new(EventBus::new());
    let mut platform = DiscordPlatform::new(args.token, event_bus.clone());
    let command_service = Arc::new(CommandService::new(repo, config));
    let message_service = Arc::new(MessageService::new(
        event_bus.clone(),
        command_service,
        Arc::new(platform.sender()),
    ));
    let listener = message_service.start().await;

    // 3) Connect to the gateway
    platform.connect().await?;

    // 4) Handle Ctrl-C to signal shutdown
    let eb_clone = event_bus.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {:?}", e);
        }
        info!("Ctrl-C detected; shutting down event bus...");
        eb_clone.shutdown();
    });

    // 5) Wait for shutdown
    let mut shutdown_rx = event_bus.shutdown_rx.clone();
    while !event_bus.is_shutdown() {
        if shutdown_rx.changed().await.is_err() {
            break;
        }
    }

    if platform.get_connection_status().await? == ConnectionStatus::Connected {
        info!("Shutdown signaled; disconnecting from Discord...");
        platform.disconnect().await?;
    }
    if let Err(e) = listener.await {
        error!("Message listener ended abnormally: {:?}", e);
    }
    Ok(())
}
