//! Command handlers for the vidqa binary

pub mod ask;
pub mod completions;
pub mod config;
pub mod list;
pub mod search;
pub mod shell;
pub mod timecode;
pub mod upload;

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::debug;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use vidqa::api::BackendClient;
use vidqa::app::{dispatch, Request, Response, Workbench};
use vidqa::identity::VideoRecord;
use vidqa::results::ResultSet;
use vidqa::session::Player;
use vidqa::theme::Theme;
use vidqa::Config;

/// Runtime for one-shot commands; the shell runs on the same flavor.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

pub fn client(config: &Config) -> Result<BackendClient> {
    BackendClient::from_config(&config.backend)
        .with_context(|| format!("Cannot use backend at {}", config.backend.base_url))
}

/// Start `request` on `tasks`.
pub fn spawn_request(tasks: &mut JoinSet<Response>, client: &BackendClient, request: Request) {
    debug!(endpoint = request.label(), "Dispatching request");
    let client = client.clone();
    tasks.spawn(async move { dispatch(&client, request).await });
}

/// Run `requests` and every follow-up they trigger, applying responses in
/// completion order. Fails with the banner message if any call failed.
pub async fn drive<P: Player>(
    workbench: &mut Workbench<P>,
    client: &BackendClient,
    requests: Vec<Request>,
) -> Result<()> {
    let mut tasks = JoinSet::new();
    for request in requests {
        spawn_request(&mut tasks, client, request);
    }
    while let Some(joined) = tasks.join_next().await {
        let response = joined.context("Backend task failed")?;
        let update = workbench.apply(response);
        for request in update.follow_up {
            spawn_request(&mut tasks, client, request);
        }
    }
    match workbench.take_banner() {
        Some(banner) => anyhow::bail!(banner),
        None => Ok(()),
    }
}

/// Terminal width for table layout, 80 when unknown.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Truncate `text` to `max_width` display columns, adding "..." if cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let budget = max_width - 3;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Pad `text` with spaces to `width` display columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let w = text.width();
    if w >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - w))
    }
}

/// Format seconds as `1h 02m 03s`, `2m 05s` or `42s`.
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Render the catalog as a numbered table.
pub fn render_catalog(videos: &[VideoRecord], theme: &Theme, width: usize) -> String {
    if videos.is_empty() {
        return theme.secondary_text("No processed videos.");
    }
    let number_width = videos.len().to_string().len();
    let hash_width = videos.iter().map(|v| v.hash.width()).max().unwrap_or(0).min(16);
    // number, hash, duration, frames columns plus separators
    let fixed = number_width + 2 + hash_width + 2 + 12 + 2 + 10 + 2;
    let name_width = width.saturating_sub(fixed).max(12);

    let mut lines = Vec::with_capacity(videos.len());
    for (i, video) in videos.iter().enumerate() {
        let number = format!("{:>w$}", i + 1, w = number_width);
        let hash = pad_to_width(&truncate_to_width(&video.hash, hash_width), hash_width);
        let name = pad_to_width(&truncate_to_width(&video.name, name_width), name_width);
        lines.push(format!(
            "{}  {}  {}  {:>12}  {:>10}",
            theme.accent_text(&number),
            theme.secondary_text(&hash),
            theme.primary_text(&name),
            format_duration(video.duration_secs),
            format!("{} fr", video.total_frames),
        ));
    }
    lines.join("\n")
}

/// Render a result set as numbered time codes.
pub fn render_results(results: &ResultSet, selected: Option<usize>, theme: &Theme) -> String {
    if results.is_empty() {
        return theme.secondary_text("  (no matching frames)");
    }
    results
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let marker = if selected == Some(i) { ">" } else { " " };
            format!(
                "{} {:>3}  {}  {}",
                theme.accent_text(marker),
                i + 1,
                theme.primary_text(&entry.time_code.to_string()),
                theme.secondary_text(&format!("frame {}", entry.source_frame)),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
