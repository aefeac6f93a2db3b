use chrono::Utc;
use serenity::builder::{CreateAttachment, CreateEmbed, CreateEmbedFooter, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::api::ratesapi::RatesClient;
use crate::config::BotConfig;
use crate::models::{known_codes, CurrencyCode, RatesSnapshot};
use crate::services::session_service::{self, FetchOutcome, FetchTicket, LoadStatus, SessionStore};
use crate::services::chart_service;
use crate::utils::{Align, ChartError, Table};
use crate::{ChartSessions, RatesApi, Settings};

/// Shared state the rates command needs, cloned out of the client data
struct ChartHandles {
    sessions: SessionStore,
    client: RatesClient,
    config: BotConfig,
}

impl ChartHandles {
    async fn load(ctx: &Context) -> Result<Self, String> {
        let data = ctx.data.read().await;
        let sessions = data
            .get::<ChartSessions>()
            .ok_or("Chart sessions not initialized".to_string())?
            .clone();
        let client = data
            .get::<RatesApi>()
            .ok_or("Rates client not initialized".to_string())?
            .clone();
        let config = data
            .get::<Settings>()
            .ok_or("Settings not initialized".to_string())?
            .clone();

        Ok(Self {
            sessions,
            client,
            config,
        })
    }
}

enum ShowPlan {
    Render(RatesSnapshot, LoadStatus),
    Wait,
    Fetch(FetchTicket),
}

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    tracing::info!("📊 Rates command called in channel {} with args: {:?}", msg.channel_id, args);

    let handles = ChartHandles::load(ctx).await?;
    let subcommand = args.first().map(|arg| arg.to_lowercase());
    let rest = args.get(1..).unwrap_or(&[]);

    match subcommand.as_deref() {
        None => show(ctx, msg, &handles).await,
        Some("date") => select_date(ctx, msg, &handles, rest).await,
        Some("base") => select_base(ctx, msg, &handles, rest).await,
        Some("toggle") => toggle(ctx, msg, &handles, rest).await,
        Some("submit") => submit(ctx, msg, &handles).await,
        Some("reset") => reset(ctx, msg, &handles).await,
        Some("currencies") | Some("list") => list_currencies(ctx, msg, &handles).await,
        Some("info") => info(ctx, msg, &handles, rest).await,
        Some("table") => table(ctx, msg, &handles).await,
        Some("help") => send_usage(ctx, msg).await,
        Some(other) => Err(format!("Unknown option '{}'. See `$rates help`", other)),
    }
}

async fn show(ctx: &Context, msg: &Message, h: &ChartHandles) -> Result<(), String> {
    let plan = session_service::with_session(&h.sessions, msg.channel_id, h.client.base_url(), |session| {
        if let Some(snapshot) = session.snapshot() {
            return ShowPlan::Render(snapshot.clone(), session.status().clone());
        }
        if session.is_loading() {
            ShowPlan::Wait
        } else {
            ShowPlan::Fetch(session.begin_fetch())
        }
    })
    .await;

    match plan {
        ShowPlan::Render(snapshot, status) => {
            let note = match status {
                LoadStatus::Idle => None,
                LoadStatus::Loading => Some("⏳ Newer rates are loading.".to_string()),
                LoadStatus::Failed(reason) => Some(format!("⚠️ Last update failed: {}", reason)),
            };
            post_chart(ctx, msg, h, &snapshot, note).await
        }
        ShowPlan::Wait => {
            msg.reply(ctx, "⏳ Rates are loading, the chart will be posted shortly.")
                .await
                .map_err(|e| e.to_string())?;
            Ok(())
        }
        ShowPlan::Fetch(ticket) => refresh(ctx, msg, h, ticket).await,
    }
}

async fn select_date(ctx: &Context, msg: &Message, h: &ChartHandles, args: &[&str]) -> Result<(), String> {
    let raw = args
        .first()
        .ok_or("Usage: `$rates date YYYY-MM-DD`".to_string())?;
    let today = Utc::now().date_naive();
    let date = session_service::parse_chart_date(raw, today).map_err(|e| e.to_string())?;

    let ticket = session_service::with_session(&h.sessions, msg.channel_id, h.client.base_url(), |session| {
        session.select_date(date, today)
    })
    .await
    .map_err(|e| e.to_string())?;

    tracing::info!("Channel {} picked date {}", msg.channel_id, date);
    refresh(ctx, msg, h, ticket).await
}

async fn select_base(ctx: &Context, msg: &Message, h: &ChartHandles, args: &[&str]) -> Result<(), String> {
    let raw = args
        .first()
        .ok_or("Usage: `$rates base <CODE>`, see `$rates currencies` for options".to_string())?;

    let ticket = session_service::with_session(&h.sessions, msg.channel_id, h.client.base_url(), |session| {
        session.select_base(raw)
    })
    .await
    .map_err(|e| e.to_string())?;

    tracing::info!("Channel {} picked base {}", msg.channel_id, raw);
    refresh(ctx, msg, h, ticket).await
}

async fn toggle(ctx: &Context, msg: &Message, h: &ChartHandles, args: &[&str]) -> Result<(), String> {
    let codes: Vec<&str> = args
        .iter()
        .flat_map(|arg| arg.split(','))
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect();
    if codes.is_empty() {
        return Err("Usage: `$rates toggle <CODE> [CODE...]`".to_string());
    }

    let selected = session_service::with_session(&h.sessions, msg.channel_id, h.client.base_url(), |session| {
        session.toggle_many(&codes)?;
        Ok::<_, ChartError>(session.selected_symbols())
    })
    .await
    .map_err(|e| e.to_string())?;

    let summary = if selected.is_empty() {
        "No currencies selected. `$rates submit` will show all of them.".to_string()
    } else {
        format!(
            "Selected: **{}**\nRun `$rates submit` to update the chart.",
            join_codes(&selected)
        )
    };

    msg.reply(ctx, summary).await.map_err(|e| e.to_string())?;
    Ok(())
}

async fn submit(ctx: &Context, msg: &Message, h: &ChartHandles) -> Result<(), String> {
    let ticket = session_service::with_session(&h.sessions, msg.channel_id, h.client.base_url(), |session| {
        session.submit()
    })
    .await;
    refresh(ctx, msg, h, ticket).await
}

async fn reset(ctx: &Context, msg: &Message, h: &ChartHandles) -> Result<(), String> {
    let ticket = session_service::with_session(&h.sessions, msg.channel_id, h.client.base_url(), |session| {
        session.reset()
    })
    .await;
    tracing::info!("Channel {} reset its chart", msg.channel_id);
    refresh(ctx, msg, h, ticket).await
}

async fn list_currencies(ctx: &Context, msg: &Message, h: &ChartHandles) -> Result<(), String> {
    let (base_options, toggles, base) =
        session_service::with_session(&h.sessions, msg.channel_id, h.client.base_url(), |session| {
            let toggles: Vec<(CurrencyCode, bool)> = session
                .toggles()
                .map(|(code, selected)| (code.clone(), selected))
                .collect();
            (session.base_options(), toggles, session.selection().effective_base())
        })
        .await;

    if toggles.is_empty() {
        return Err(ChartError::NoSnapshot.to_string());
    }

    let toggle_lines = toggles
        .iter()
        .map(|(code, selected)| format!("{} `{}`", if *selected { "✅" } else { "⬜" }, code))
        .collect::<Vec<_>>()
        .join("  ");

    let embed = CreateEmbed::default()
        .title("💱 Chart Currencies")
        .description("Toggle with `$rates toggle <CODE>`, apply with `$rates submit`, start over with `$rates reset`.")
        .field("Current Base", format!("**{}** ({})", base, chart_service::display_name(&base)), false)
        .field("Base Options", join_codes(&base_options), false)
        .field("Displayed Currencies", toggle_lines, false)
        .color(0x00b0f4);

    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

async fn info(ctx: &Context, msg: &Message, h: &ChartHandles, args: &[&str]) -> Result<(), String> {
    let raw = args.first().ok_or("Usage: `$rates info <CODE>`".to_string())?;
    let code: CurrencyCode = raw.parse().map_err(|e: ChartError| e.to_string())?;
    let snapshot = current_snapshot(h, msg).await?;

    let entry = snapshot
        .entry(&code)
        .ok_or_else(|| ChartError::NotInToggleSet(code.to_string()).to_string())?;
    let tip = chart_service::tooltip(entry, &snapshot.base);

    let embed = CreateEmbed::default()
        .title(tip.label)
        .description(format!("**{}**", tip.rate_line))
        .footer(CreateEmbedFooter::new(format!("Rates for {}", snapshot.date)))
        .color(chart_service::fill_color_hex(entry.rate));

    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

async fn table(ctx: &Context, msg: &Message, h: &ChartHandles) -> Result<(), String> {
    let snapshot = current_snapshot(h, msg).await?;

    let mut table = Table::new(&["Code", "Currency", "Rate"]).align(2, Align::Right);
    for entry in &snapshot.rates {
        table.add_row(vec![
            entry.abbreviation.to_string(),
            chart_service::display_name(&entry.abbreviation),
            entry.rate.to_string(),
        ]);
    }
    if table.is_empty() {
        return Err(ChartError::EmptySnapshot.to_string());
    }

    let content = format!("1 **{}** on {} buys:\n{}", snapshot.base, snapshot.date, table.render());
    msg.channel_id
        .send_message(ctx, CreateMessage::default().content(content))
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

async fn current_snapshot(h: &ChartHandles, msg: &Message) -> Result<RatesSnapshot, String> {
    session_service::with_session(&h.sessions, msg.channel_id, h.client.base_url(), |session| {
        session.snapshot().cloned()
    })
    .await
    .ok_or_else(|| ChartError::NoSnapshot.to_string())
}

/// Fetch the rates behind `ticket` and post the result
async fn refresh(ctx: &Context, msg: &Message, h: &ChartHandles, ticket: FetchTicket) -> Result<(), String> {
    if let Err(e) = msg.channel_id.broadcast_typing(&ctx.http).await {
        tracing::warn!("Failed to broadcast typing: {}", e);
    }

    let seq = ticket.seq;
    match session_service::run_fetch(&h.sessions, msg.channel_id, &h.client, ticket).await {
        FetchOutcome::Applied(snapshot) => post_chart(ctx, msg, h, &snapshot, None).await,
        FetchOutcome::Stale => {
            tracing::debug!("Fetch #{} in channel {} was superseded", seq, msg.channel_id);
            Ok(())
        }
        FetchOutcome::Failed { error, last_good } => {
            let kept = match last_good {
                Some(snapshot) => format!(
                    "The chart still shows {} rates for {}.",
                    snapshot.base, snapshot.date
                ),
                None => "No rates have been loaded yet.".to_string(),
            };

            let embed = CreateEmbed::default()
                .title("⚠️ Load Failed")
                .description(error.to_string())
                .field("Chart", kept, false)
                .footer(CreateEmbedFooter::new("Pick another date or base, or run `$rates reset`"))
                .color(0xffa500);

            msg.channel_id
                .send_message(ctx, CreateMessage::default().embed(embed))
                .await
                .map_err(|e| e.to_string())?;
            Ok(())
        }
    }
}

async fn post_chart(
    ctx: &Context,
    msg: &Message,
    h: &ChartHandles,
    snapshot: &RatesSnapshot,
    note: Option<String>,
) -> Result<(), String> {
    let (width, height) = (h.config.chart_width, h.config.chart_height);
    let to_render = snapshot.clone();
    let image_data = tokio::task::spawn_blocking(move || chart_service::render_png(&to_render, width, height))
        .await
        .map_err(|e| format!("Chart task failed: {}", e))?
        .map_err(|e| e.to_string())?;
    tracing::info!("✓ Chart generated: {} bytes", image_data.len());

    let symbols = chart_service::charted_codes(snapshot);

    let filename = format!("rates_{}_{}.png", snapshot.base, snapshot.date);
    let mut embed = CreateEmbed::default()
        .title(chart_service::chart_title(snapshot))
        .field("Base", snapshot.base.to_string(), true)
        .field("Date", snapshot.date.to_string(), true)
        .field("Currencies", symbols, true)
        .attachment(filename.clone())
        .footer(CreateEmbedFooter::new("`$rates info <CODE>` shows a single rate"))
        .color(0x3f97bf);
    if let Some(note) = note {
        embed = embed.description(note);
    }

    let message = CreateMessage::default()
        .embed(embed)
        .add_file(CreateAttachment::bytes(image_data, filename));

    msg.channel_id
        .send_message(ctx, message)
        .await
        .map_err(|e| format!("Failed to send chart: {}", e))?;
    Ok(())
}

async fn send_usage(ctx: &Context, msg: &Message) -> Result<(), String> {
    let min_date = session_service::earliest_chart_date();
    let embed = CreateEmbed::default()
        .title("📊 Rates Command")
        .description("Chart exchange rates for a date, base currency and set of currencies")
        .field(
            "Usage",
            "`$rates` - Show the chart\n\
             `$rates date <YYYY-MM-DD>` - Pick a date (resets base and currencies)\n\
             `$rates base <CODE>` - Pick the base currency\n\
             `$rates toggle <CODE> [CODE...]` - Select or unselect currencies\n\
             `$rates submit` - Chart only the selected currencies\n\
             `$rates reset` - Back to the latest EUR rates\n\
             `$rates currencies` - List base options and selections\n\
             `$rates info <CODE>` - One currency's rate\n\
             `$rates table` - Rates as text",
            false,
        )
        .field("Dates", format!("From {} up to today", min_date), false)
        .field("Known Currencies", join_codes(&known_codes()), false)
        .color(0x00ff00);

    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn join_codes(codes: &[CurrencyCode]) -> String {
    codes
        .iter()
        .map(CurrencyCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
