use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;

pub async fn execute(ctx: &Context, msg: &Message) -> Result<(), String> {
    let embed = CreateEmbed::default()
        .title("📖 Rate Chart Help")
        .description("Charts exchange rates per channel. Each channel keeps its own date, base currency and currency selection.")
        .color(0x00b0f4)
        .field(
            "🎯 General",
            "`$ping` - Check bot latency\n`$help` - Show this help message",
            false,
        )
        .field(
            "📊 Chart",
            "`$rates` - Show the chart for this channel\n`$rates table` - Rates as text\n`$rates info <CODE>` - One currency's rate",
            false,
        )
        .field(
            "🎛️ Selection",
            "`$rates date <YYYY-MM-DD>` - Pick a date\n`$rates base <CODE>` - Pick the base currency\n`$rates toggle <CODE>...` - Select currencies\n`$rates submit` - Apply selected currencies\n`$rates reset` - Start over\n`$rates currencies` - Show options",
            false,
        );

    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(embed))
        .await
        .map_err(|e| format!("Failed to send help message: {}", e))?;

    Ok(())
}
