//! Composite video identifiers.
//!
//! The backend correlates search and answer results with a video through a
//! string made of the video's hash followed by the decimal digits of its
//! frame count (`"abc123" + 9000 -> "abc1239000"`). Nothing in the string
//! marks where the hash ends, so decoding needs the frame count that was
//! used to build it. Passing a different count silently yields a wrong hash.

use serde::{Deserialize, Serialize};

use crate::api::VideoAnalysis;
use crate::timecode::{TimeCodeError, VideoMetrics};

/// Errors resolving identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("Video not found for id: {0}")]
    NotFound(String),
}

/// A processed video known to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub hash: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub thumbnail: String,
    pub total_frames: u64,
    pub duration_secs: f64,
}

impl VideoRecord {
    /// `hash + total_frames`, the identifier search results refer to.
    pub fn composite_id(&self) -> String {
        composite(&self.hash, self.total_frames)
    }

    pub fn metrics(&self) -> Result<VideoMetrics, TimeCodeError> {
        VideoMetrics::new(self.total_frames, self.duration_secs)
    }
}

impl From<VideoAnalysis> for VideoRecord {
    fn from(analysis: VideoAnalysis) -> Self {
        Self {
            hash: analysis.video_hash,
            name: analysis.video_name,
            description: analysis.description,
            url: analysis.video_url,
            thumbnail: analysis.thumbnail,
            total_frames: analysis.total_frames,
            duration_secs: analysis.video_duration,
        }
    }
}

/// Count digits in a number's base-10 representation.
#[inline]
pub fn count_digits(mut n: u64) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// Build a composite identifier.
pub fn composite(hash: &str, total_frames: u64) -> String {
    format!("{hash}{total_frames}")
}

/// Strip the frame-count suffix from a composite identifier.
///
/// Removes exactly `count_digits(total_frames)` trailing characters. An id
/// shorter than the suffix decodes to the empty string. If the cut would
/// split a multi-byte character the id is returned unchanged.
pub fn bare_hash(composite_id: &str, total_frames: u64) -> &str {
    let cut = composite_id.len().saturating_sub(count_digits(total_frames));
    composite_id.get(..cut).unwrap_or(composite_id)
}

/// Find the catalog entry whose `hash + total_frames` equals `composite_id`.
///
/// The first match wins.
pub fn resolve<'a>(
    composite_id: &str,
    catalog: impl IntoIterator<Item = &'a VideoRecord>,
) -> Result<&'a VideoRecord, IdentityError> {
    catalog
        .into_iter()
        .find(|video| video.composite_id() == composite_id)
        .ok_or_else(|| IdentityError::NotFound(composite_id.to_string()))
}
