use std::time::Instant;

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ratechart::services::session_service;
use ratechart::{commands, BotConfig, BotData, ChartSessions, RatesApi, RatesClient, Settings};

struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        commands::handle_message(&ctx, &msg).await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        if let Err(e) = ctx.http.get_current_user().await {
            warn!("Failed to check Discord connection status: {}", e);
        }
    }
}

fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    for raw in ["ratechart=debug", "serenity=warn"] {
        match raw.parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("Ignoring log directive {}: {}", raw, e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    info!("📊 Starting ratechart v{}...", env!("CARGO_PKG_VERSION"));

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    info!("Rates API: {}", config.rates_api_url);
    info!("Chart size: {}x{}", config.chart_width, config.chart_height);

    let intents = GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGES;

    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(Handler)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create client: {}", e);
            return;
        }
    };

    {
        let mut data = client.data.write().await;
        data.insert::<BotData>(Instant::now());
        data.insert::<ChartSessions>(session_service::new_store());
        data.insert::<RatesApi>(RatesClient::with_base_url(config.rates_api_url.clone()));
        data.insert::<Settings>(config);
    }

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }
}
