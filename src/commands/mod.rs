pub mod help;
pub mod ping;
pub mod rates;

use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;

pub async fn handle_message(ctx: &Context, msg: &Message) {
    if msg.author.bot {
        return;
    }

    let parts: Vec<&str> = msg.content.split_whitespace().collect();
    let Some((&command, args)) = parts.split_first() else {
        return;
    };

    let result = match command {
        "$ping" => ping::execute(ctx, msg).await,
        "$help" => help::execute(ctx, msg).await,
        "$rates" | "$chart" => rates::execute(ctx, msg, args).await,
        _ => return,
    };

    if let Err(error_msg) = result {
        tracing::error!("❌ Error executing command {}: {}", command, error_msg);

        let user_message = if error_msg.contains("429") || error_msg.contains("rate limit") {
            "⚠️ **Rate Limited**: Discord is rate limiting us. Please try again in a moment.".to_string()
        } else if error_msg.is_empty() {
            "❌ An error occurred while executing the command.".to_string()
        } else {
            format!("❌ {}", error_msg)
        };

        let embed = CreateEmbed::default()
            .title("Command Error")
            .description(user_message)
            .color(0xff0000);

        if let Err(e) = msg
            .channel_id
            .send_message(ctx, CreateMessage::default().embed(embed))
            .await
        {
            tracing::warn!("Failed to send error message: {}", e);
        }
    }
}
