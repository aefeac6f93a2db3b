use std::time::{Duration, Instant};

use serenity::builder::CreateEmbed;
use serenity::prelude::*;

use crate::models::ping::PingMetrics;
use crate::{BotData, ChartSessions, RatesApi};

pub async fn get_ping_metrics(ctx: &Context, start_time: Instant) -> PingMetrics {
    let response_roundtrip = start_time.elapsed().as_millis() as u64;

    let data = ctx.data.read().await;
    let uptime = data
        .get::<BotData>()
        .map(|started| format_uptime(started.elapsed()))
        .unwrap_or_else(|| "Unknown".to_string());

    let open_sessions = match data.get::<ChartSessions>() {
        Some(store) => store.lock().await.len(),
        None => 0,
    };

    let rates_endpoint = data
        .get::<RatesApi>()
        .map(|client| client.base_url().to_string())
        .unwrap_or_default();

    PingMetrics {
        response_roundtrip,
        uptime,
        open_sessions,
        rates_endpoint,
    }
}

pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

pub fn create_ping_embed(metrics: &PingMetrics) -> CreateEmbed {
    CreateEmbed::default()
        .title("Pong! 🏓")
        .field("Response Roundtrip", format!("{}ms", metrics.response_roundtrip), true)
        .field("Open Charts", metrics.open_sessions.to_string(), true)
        .field("Uptime", &metrics.uptime, false)
        .field("Rates API", &metrics.rates_endpoint, false)
        .color(0x00b0f4)
}
