use std::fs;
use std::path::Path;

use plotters::prelude::*;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{currency_name, CurrencyCode, RateEntry, RatesSnapshot};
use crate::utils::errors::ChartError;

/// Lowest value on the logarithmic rate axis
pub const RATE_AXIS_FLOOR: f64 = 0.01;

/// Lower bounds of the color buckets, ascending. A rate equal to a bound
/// belongs to the bucket that bound opens.
const BUCKET_THRESHOLDS: [f64; 9] = [1.0, 2.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 10000.0];

/// Bar fills from lightest (rates below 1) to darkest (rates of 10000 and up)
const PALETTE: [RGBColor; 10] = [
    RGBColor(0xda, 0xd7, 0xe9),
    RGBColor(0xc8, 0xce, 0xe4),
    RGBColor(0xb2, 0xc3, 0xde),
    RGBColor(0x96, 0xb9, 0xd9),
    RGBColor(0x78, 0xad, 0xd2),
    RGBColor(0x5a, 0xa2, 0xca),
    RGBColor(0x3f, 0x97, 0xbf),
    RGBColor(0x25, 0x8b, 0xac),
    RGBColor(0x0f, 0x82, 0x91),
    RGBColor(0x05, 0x78, 0x78),
];

const AXIS_TEXT: RGBColor = RGBColor(0x40, 0x40, 0x40);

/// Hover text for one bar
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Currency display name
    pub label: String,
    /// `1 {base} = {rate} {code}`
    pub rate_line: String,
}

/// Bucket rank for a rate, 0 (lightest) to 9 (darkest)
pub fn color_bucket(rate: f64) -> usize {
    BUCKET_THRESHOLDS
        .iter()
        .take_while(|&&threshold| rate >= threshold)
        .count()
}

pub fn fill_color(rate: f64) -> RGBColor {
    PALETTE[color_bucket(rate)]
}

/// Fill color packed as `0xRRGGBB`, the form Discord embeds take
pub fn fill_color_hex(rate: f64) -> u32 {
    let RGBColor(r, g, b) = fill_color(rate);
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Y-axis tick text, rounded to five decimals
pub fn format_rate_tick(value: f64) -> String {
    let rounded = (value * 100_000.0).round() / 100_000.0;
    format!("{}", rounded)
}

/// Display name for a code, or the code itself when the table has no entry
pub fn display_name(code: &CurrencyCode) -> String {
    currency_name(code.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| code.to_string())
}

pub fn chart_title(snapshot: &RatesSnapshot) -> String {
    format!(
        "Exchange Rates for the {} on {}",
        display_name(&snapshot.base),
        snapshot.date.format("%B %d, %Y")
    )
}

/// Comma-joined codes of the bars a snapshot draws
pub fn charted_codes(snapshot: &RatesSnapshot) -> String {
    snapshot
        .codes()
        .map(CurrencyCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn tooltip(entry: &RateEntry, base: &CurrencyCode) -> Tooltip {
    Tooltip {
        label: display_name(&entry.abbreviation),
        rate_line: format!("1 {} = {} {}", base, entry.rate, entry.abbreviation),
    }
}

/// Top of the rate axis: twice the largest rate, never below 1
fn axis_ceiling(snapshot: &RatesSnapshot) -> f64 {
    snapshot
        .max_rate()
        .filter(|max| max.is_finite())
        .map(|max| max * 2.0)
        .unwrap_or(1.0)
        .max(1.0)
}

/// Generate the bar chart for a snapshot as PNG bytes
pub fn render_png(snapshot: &RatesSnapshot, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
    if snapshot.rates.is_empty() {
        return Err(ChartError::EmptySnapshot);
    }

    // BitMapBackend encodes PNG on present, so draw to a temp file and read it back
    let temp_file = std::env::temp_dir().join(format!("ratechart_{}.png", Uuid::new_v4()));
    debug!("Rendering {} bars to {}", snapshot.rates.len(), temp_file.display());

    let drawn = draw_chart(snapshot, &temp_file, width, height);
    let image_data = drawn.and_then(|_| {
        fs::read(&temp_file).map_err(|e| ChartError::Render(format!("Failed to read chart file: {}", e)))
    });

    if let Err(e) = fs::remove_file(&temp_file) {
        warn!("Failed to delete temporary chart file {}: {}", temp_file.display(), e);
    }

    image_data
}

fn draw_chart(snapshot: &RatesSnapshot, path: &Path, width: u32, height: u32) -> Result<(), ChartError> {
    let backend = BitMapBackend::new(path, (width, height));
    let root = backend.into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::Render(format!("Failed to fill canvas: {}", e)))?;

    let codes: Vec<String> = snapshot.codes().map(|code| code.to_string()).collect();
    let bar_count = codes.len() as i32;

    let mut chart = ChartBuilder::on(&root)
        .caption(chart_title(snapshot), ("sans-serif", 24.0).into_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (0..bar_count).into_segmented(),
            (RATE_AXIS_FLOOR..axis_ceiling(snapshot)).log_scale(),
        )
        .map_err(|e| ChartError::Render(format!("Failed to build chart: {}", e)))?;

    let x_formatter = |value: &SegmentValue<i32>| match value {
        SegmentValue::CenterOf(idx) => usize::try_from(*idx)
            .ok()
            .and_then(|idx| codes.get(idx))
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    };
    let y_formatter = |value: &f64| format_rate_tick(*value);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(codes.len())
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90)
                .color(&AXIS_TEXT),
        )
        .y_label_style(("sans-serif", 12).into_font().color(&AXIS_TEXT))
        .x_desc("World Currencies")
        .y_desc("Exchange Rate")
        .axis_desc_style(("sans-serif", 15).into_font().color(&AXIS_TEXT))
        .draw()
        .map_err(|e| ChartError::Render(format!("Failed to draw mesh: {}", e)))?;

    chart
        .draw_series(snapshot.rates.iter().enumerate().map(|(idx, entry)| {
            let x = idx as i32;
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(x), RATE_AXIS_FLOOR),
                    (SegmentValue::Exact(x + 1), entry.rate.max(RATE_AXIS_FLOOR)),
                ],
                fill_color(entry.rate).filled(),
            );
            bar.set_margin(0, 0, 2, 2);
            bar
        }))
        .map_err(|e| ChartError::Render(format!("Failed to draw bars: {}", e)))?;

    root.present()
        .map_err(|e| ChartError::Render(format!("Failed to render chart: {}", e)))?;

    Ok(())
}
