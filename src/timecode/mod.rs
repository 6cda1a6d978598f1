//! Frame index <-> playback time conversion.
//!
//! The backend reports matches as frame indices into its sampled frame
//! sequence. The player seeks in seconds. This module converts between the
//! two using the video's frame count and duration, and renders the result
//! as a `MM:SS` time code.
//!
//! The conversion truncates: a frame that falls at 8.9s becomes `00:08`, and
//! converting that time code back yields 8.0s. Sub-second precision is
//! discarded on purpose, so a seek always lands at or before the matching
//! frame and never past it.

use std::fmt;
use std::str::FromStr;

/// Errors produced while converting frames to time codes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeCodeError {
    #[error("Invalid video metrics: total_frames={total_frames}, duration={duration_secs}s")]
    InvalidMetrics {
        total_frames: u64,
        duration_secs: f64,
    },

    #[error("Invalid roll-over interval: {0}s (must be at least 1)")]
    InvalidInterval(u32),

    #[error("Invalid time code '{0}' (expected MM:SS)")]
    InvalidTimeCode(String),
}

/// Modulus used to roll seconds over into minutes.
///
/// Normally 60, but kept configurable: with an interval of 30 the "minutes"
/// field counts half-minutes. Every conversion takes it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval(u32);

impl Interval {
    /// Standard sixty-second minute.
    pub const DEFAULT_SECS: u32 = 60;

    pub fn new(secs: u32) -> Result<Self, TimeCodeError> {
        if secs == 0 {
            return Err(TimeCodeError::InvalidInterval(secs));
        }
        Ok(Self(secs))
    }

    pub fn secs(self) -> u32 {
        self.0
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self(Self::DEFAULT_SECS)
    }
}

/// Frame count and duration of one video.
///
/// `total_frames / duration_secs` is the frame rate used for every
/// conversion of that video. Both values are validated on construction, so
/// a `VideoMetrics` in hand is always usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMetrics {
    total_frames: u64,
    duration_secs: f64,
}

impl VideoMetrics {
    pub fn new(total_frames: u64, duration_secs: f64) -> Result<Self, TimeCodeError> {
        if total_frames == 0 || !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(TimeCodeError::InvalidMetrics {
                total_frames,
                duration_secs,
            });
        }
        Ok(Self {
            total_frames,
            duration_secs,
        })
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Frames per second.
    pub fn fps(&self) -> f64 {
        self.total_frames as f64 / self.duration_secs
    }

    /// Exact (untruncated) time of a frame in seconds.
    pub fn frame_time(&self, frame_index: u64) -> f64 {
        frame_index as f64 / self.fps()
    }
}

/// A `minutes:seconds` display time.
///
/// Codes produced by [`frame_to_time_code`] always have `seconds` below the
/// interval. Parsing cannot know the interval, so [`TimeCode::fits`] is
/// checked wherever a parsed code is used.
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeCode {
    pub minutes: u64,
    pub seconds: u32,
}

impl TimeCode {
    pub const ZERO: TimeCode = TimeCode {
        minutes: 0,
        seconds: 0,
    };

    pub fn new(minutes: u64, seconds: u32) -> Self {
        Self { minutes, seconds }
    }

    /// Whether `seconds` is below `interval`.
    pub fn fits(&self, interval: Interval) -> bool {
        self.seconds < interval.secs()
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl FromStr for TimeCode {
    type Err = TimeCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TimeCodeError::InvalidTimeCode(s.to_string());
        let (minutes, seconds) = s.trim().split_once(':').ok_or_else(invalid)?;
        let minutes = minutes.parse::<u64>().map_err(|_| invalid())?;
        let seconds = seconds.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self { minutes, seconds })
    }
}

/// Convert a frame index into a time code.
///
/// Whole seconds are taken first and then split by the interval, which keeps
/// the result from ever rounding past the frame's true time.
pub fn frame_to_time_code(frame_index: u64, metrics: &VideoMetrics, interval: Interval) -> TimeCode {
    let whole_secs = metrics.frame_time(frame_index).floor() as u64;
    let interval = u64::from(interval.secs());
    TimeCode {
        minutes: whole_secs / interval,
        seconds: (whole_secs % interval) as u32,
    }
}

/// Player seek offset for a time code: `minutes * interval + seconds`.
///
/// Computed in `f64` so parsed codes with huge minute counts cannot overflow.
pub fn time_code_to_seconds(time_code: TimeCode, interval: Interval) -> f64 {
    time_code.minutes as f64 * f64::from(interval.secs()) + f64::from(time_code.seconds)
}
