//! Frame index to time code conversion

use anyhow::Result;

use vidqa::cli::TimecodeArgs;
use vidqa::timecode::{frame_to_time_code, Interval, VideoMetrics};
use vidqa::Config;

pub fn handle(config: &Config, args: &TimecodeArgs) -> Result<()> {
    println!("{}", convert(config, args)?);
    Ok(())
}

fn convert(config: &Config, args: &TimecodeArgs) -> Result<String> {
    let interval = match args.interval {
        Some(secs) => Interval::new(secs)?,
        None => config.playback.interval()?,
    };
    let metrics = VideoMetrics::new(args.total_frames, args.duration)?;
    Ok(frame_to_time_code(args.frame, &metrics, interval).to_string())
}
