//! Keyword search across processed videos

use anyhow::Result;

use vidqa::app::SearchHit;
use vidqa::session::HeadlessPlayer;
use vidqa::theme::{current_theme, Theme};
use vidqa::{Config, Workbench};

use super::{client, drive, render_results, runtime};

#[cfg(not(tarpaulin_include))]
pub fn handle(config: &Config, keyword: &str) -> Result<()> {
    let theme = current_theme();
    let client = client(config)?;
    let mut workbench = Workbench::new(HeadlessPlayer::default(), config.playback.interval()?);

    let Some(request) = workbench.search(keyword) else {
        anyhow::bail!("Search keyword is empty");
    };
    runtime()?.block_on(drive(&mut workbench, &client, vec![request]))?;

    println!("{}", render_hits(workbench.search_hits(), &theme));
    Ok(())
}

/// Render search hits grouped by video, numbered for `hit G N`.
pub fn render_hits(hits: &[SearchHit], theme: &Theme) -> String {
    if hits.is_empty() {
        return theme.secondary_text("No videos matched.");
    }
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "{} {} {}\n{}",
                theme.accent_text(&format!("[{}]", i + 1)),
                theme.primary_text(&hit.video.name),
                theme.secondary_text(&format!("({})", hit.results.video_id)),
                render_results(&hit.results, None, theme),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
