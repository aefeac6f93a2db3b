use serenity::builder::CreateMessage;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::time::Instant;

use crate::services::ping_service;

pub async fn execute(ctx: &Context, msg: &Message) -> Result<(), String> {
    let start_time = Instant::now();

    // Roundtrip is measured against a throwaway message
    let response = msg
        .channel_id
        .send_message(ctx, CreateMessage::default().content("📊 Calculating metrics..."))
        .await
        .map_err(|e| e.to_string())?;

    let metrics = ping_service::get_ping_metrics(ctx, start_time).await;
    let embed = ping_service::create_ping_embed(&metrics);

    response.delete(ctx).await.map_err(|e| e.to_string())?;

    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
