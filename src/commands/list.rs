//! List processed videos

use anyhow::Result;

use vidqa::session::HeadlessPlayer;
use vidqa::theme::current_theme;
use vidqa::{Config, Workbench};

use super::{client, drive, render_catalog, runtime, terminal_width};

#[cfg(not(tarpaulin_include))]
pub fn handle(config: &Config) -> Result<()> {
    let client = client(config)?;
    let mut workbench = Workbench::new(HeadlessPlayer::default(), config.playback.interval()?);

    let request = workbench.refresh_catalog();
    runtime()?.block_on(drive(&mut workbench, &client, vec![request]))?;

    println!("{}", render_catalog(workbench.catalog(), &current_theme(), terminal_width()));
    Ok(())
}
