//! Result set normalization.
//!
//! Backend answers and search hits arrive as loose lists of frame indices,
//! possibly repeated and in any order. `normalize` turns such a list into
//! the ordered sequence of entries the UI iterates and selects from.

use std::collections::BTreeSet;

use crate::session::View;
use crate::timecode::{frame_to_time_code, Interval, TimeCode, TimeCodeError, VideoMetrics};

/// One selectable result: a frame and its display time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub time_code: TimeCode,
    pub source_frame: u64,
    /// Identifier of the video the frame belongs to (composite or bare).
    pub video_id: String,
}

/// An ordered result sequence for one video, as displayed in one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    pub video_id: String,
    pub view: View,
    pub entries: Vec<ResultEntry>,
}

impl ResultSet {
    /// Validate metrics and normalize `frames` in one step.
    ///
    /// Fails with `InvalidMetrics` before producing any entry, so callers
    /// never hold a partially converted set.
    pub fn build(
        video_id: impl Into<String>,
        view: View,
        frames: &[u64],
        total_frames: u64,
        duration_secs: f64,
        interval: Interval,
    ) -> Result<Self, TimeCodeError> {
        let video_id = video_id.into();
        let metrics = VideoMetrics::new(total_frames, duration_secs)?;
        let entries = normalize(frames, &metrics, &video_id, interval);
        Ok(Self {
            video_id,
            view,
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResultEntry> {
        self.entries.get(index)
    }
}

/// Deduplicate frame indices by value, sort ascending and map each through
/// the time codec.
///
/// Distinct frames that land on the same time code are all kept: each one is
/// a separate match reported by the backend.
pub fn normalize(
    frames: &[u64],
    metrics: &VideoMetrics,
    video_id: &str,
    interval: Interval,
) -> Vec<ResultEntry> {
    let unique: BTreeSet<u64> = frames.iter().copied().collect();

    unique
        .into_iter()
        .map(|frame| ResultEntry {
            time_code: frame_to_time_code(frame, metrics, interval),
            source_frame: frame,
            video_id: video_id.to_string(),
        })
        .collect()
}
