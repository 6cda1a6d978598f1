//! Session state types
//!
//! Contains the `SessionState` struct mutated by `PlaybackSession`, as well
//! as the identifiers and targets shared with the workbench and player.

use std::fmt;
use std::str::FromStr;

use crate::identity::{bare_hash, VideoRecord};
use crate::results::ResultSet;
use crate::timecode::TimeCode;

/// Which result view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Video description
    #[default]
    Summary,
    /// Answers to the last question
    Qa,
    /// Search hits across videos
    Search,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Summary => "summary",
            View::Qa => "qa",
            View::Search => "search",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(View::Summary),
            "qa" => Ok(View::Qa),
            "search" => Ok(View::Search),
            other => Err(format!("unknown view '{other}' (expected summary, qa or search)")),
        }
    }
}

/// Identifies one call to `load`.
///
/// Strictly increasing per session: a larger id was initiated later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadId(pub(crate) u64);

impl LoadId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Tag attached to an outgoing backend request.
///
/// Records which load was active when the request left. A response whose
/// ticket no longer matches the active load has been superseded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub load: LoadId,
    pub video_id: String,
}

/// Playback lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No video loaded
    #[default]
    Idle,
    /// Source handed to the player, waiting for its "source ready" event
    Loading {
        load: LoadId,
        pending_seek: Option<TimeCode>,
    },
    /// Video loaded and playable
    Ready { load: LoadId },
}

impl Phase {
    pub fn load(&self) -> Option<LoadId> {
        match self {
            Phase::Idle => None,
            Phase::Loading { load, .. } | Phase::Ready { load } => Some(*load),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Phase::Ready { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading { .. } => "loading",
            Phase::Ready { .. } => "ready",
        }
    }
}

/// Everything `load` needs to know about a video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoTarget {
    /// Bare hash, composite id, or a provisional local id
    pub id: String,
    pub url: String,
    pub description: String,
    /// Present when `id` is a composite carrying this frame count
    pub total_frames: Option<u64>,
    /// False while the backend has not yet assigned a hash
    pub confirmed: bool,
}

impl VideoTarget {
    /// A catalog video addressed by its bare hash.
    pub fn from_record(record: &VideoRecord) -> Self {
        Self {
            id: record.hash.clone(),
            url: record.url.clone(),
            description: record.description.clone(),
            total_frames: None,
            confirmed: true,
        }
    }

    /// A video addressed by its composite id, as search results do.
    pub fn composite_from_record(record: &VideoRecord) -> Self {
        Self {
            id: record.composite_id(),
            url: record.url.clone(),
            description: record.description.clone(),
            total_frames: Some(record.total_frames),
            confirmed: true,
        }
    }

    /// A local file that is still being analyzed.
    pub fn local(path: &str) -> Self {
        Self {
            id: format!("local:{path}"),
            url: path.to_string(),
            description: String::new(),
            total_frames: None,
            confirmed: false,
        }
    }
}

/// The video currently owned by the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveVideo {
    pub id: String,
    pub url: String,
    pub total_frames: Option<u64>,
    pub confirmed: bool,
}

impl ActiveVideo {
    /// Whether `id` embeds a frame-count suffix.
    pub fn is_frame_count_aware(&self) -> bool {
        self.total_frames.is_some_and(|n| n > 0)
    }

    /// Identifier the backend expects for questions about this video.
    pub fn question_id(&self) -> &str {
        match self.total_frames {
            Some(total_frames) if total_frames > 0 => bare_hash(&self.id, total_frames),
            _ => &self.id,
        }
    }
}

/// State owned by a `PlaybackSession`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub phase: Phase,
    pub active: Option<ActiveVideo>,
    pub description: String,
    /// Index into `displayed`, never set without it
    pub selected_result: Option<usize>,
    pub view: View,
    /// Result sequence the selection refers to
    pub displayed: Option<ResultSet>,
}

impl SessionState {
    pub fn active_video_id(&self) -> Option<&str> {
        self.active.as_ref().map(|v| v.id.as_str())
    }

    /// The selected entry, if any.
    pub fn selected_entry(&self) -> Option<&crate::results::ResultEntry> {
        let index = self.selected_result?;
        self.displayed.as_ref()?.get(index)
    }
}
