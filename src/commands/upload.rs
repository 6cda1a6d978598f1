//! Upload a video for analysis and indexing

use std::path::Path;

use anyhow::{Context, Result};
use humansize::{format_size, DECIMAL};

use vidqa::identity::composite;
use vidqa::session::HeadlessPlayer;
use vidqa::theme::current_theme;
use vidqa::{Config, Workbench};

use super::{client, drive, runtime};

#[cfg(not(tarpaulin_include))]
pub fn handle(config: &Config, file: &Path) -> Result<()> {
    let theme = current_theme();
    let client = client(config)?;
    let mut workbench = Workbench::new(HeadlessPlayer::default(), config.playback.interval()?);

    let size = std::fs::metadata(file)
        .with_context(|| format!("Cannot read {}", file.display()))?
        .len();
    let requests = workbench.upload(file)?;
    eprintln!(
        "{}",
        theme.secondary_text(&format!(
            "Uploading {} ({}) ...",
            file.display(),
            format_size(size, DECIMAL)
        ))
    );

    runtime()?.block_on(drive(&mut workbench, &client, requests))?;

    let Some(hash) = workbench.state().active_video_id().map(str::to_string) else {
        anyhow::bail!("Backend did not identify the video");
    };
    let total_frames = workbench
        .catalog()
        .iter()
        .find(|video| video.hash == hash)
        .map(|video| video.total_frames);

    println!("{} {}", theme.accent_text("hash:"), hash);
    if let Some(total_frames) = total_frames {
        println!("{} {}", theme.accent_text("frames:"), total_frames);
        println!("{} {}", theme.accent_text("id:"), composite(&hash, total_frames));
    }
    println!();
    println!("{}", theme.primary_text(&workbench.state().description));
    Ok(())
}
