//! Ask a question about a processed video

use anyhow::Result;

use vidqa::session::{HeadlessPlayer, VideoTarget};
use vidqa::theme::current_theme;
use vidqa::{Config, Workbench};

use super::{client, drive, render_results, runtime};

#[cfg(not(tarpaulin_include))]
pub fn handle(config: &Config, video: &str, question: &str, total_frames: Option<u64>) -> Result<()> {
    let theme = current_theme();
    let client = client(config)?;
    let mut workbench = Workbench::new(HeadlessPlayer::default(), config.playback.interval()?);
    let rt = runtime()?;

    match total_frames {
        Some(total_frames) => {
            workbench.open_target(VideoTarget {
                id: video.to_string(),
                url: String::new(),
                description: String::new(),
                total_frames: Some(total_frames),
                confirmed: true,
            });
        }
        None => {
            let request = workbench.refresh_catalog();
            rt.block_on(drive(&mut workbench, &client, vec![request]))?;
            workbench.open(video)?;
        }
    }

    let request = workbench.ask(question)?;
    rt.block_on(drive(&mut workbench, &client, vec![request]))?;

    match &workbench.state().displayed {
        Some(results) => {
            println!("{}", theme.accent_text(&format!("{} matching frame(s)", results.len())));
            println!("{}", render_results(results, None, &theme));
        }
        None => println!("{}", theme.secondary_text("No answer.")),
    }
    Ok(())
}
