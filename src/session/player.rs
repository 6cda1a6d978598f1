//! Player boundary.
//!
//! The session drives a media element through three actions: hand it a
//! source, set its position, start playback. The element answers with a
//! "source ready" event once the new source's metadata is loaded; that event
//! is fed back into `PlaybackSession::source_ready` by whoever owns the
//! event loop. Setting a position before that event is undefined for real
//! players, so the session never does it.

use super::state::LoadId;

/// A source handed to the player, tagged with the load that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub load: LoadId,
    pub url: String,
}

/// Media element driven by a `PlaybackSession`.
pub trait Player {
    /// Replace the current source. The player must later report readiness
    /// for `source.load`.
    fn set_source(&mut self, source: &MediaSource);

    /// Move the playhead, in seconds.
    fn set_position(&mut self, seconds: f64);

    /// Start playback.
    fn play(&mut self);
}

/// Player with no output that just records what it was told.
///
/// Used by one-shot commands and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessPlayer {
    pub source: Option<MediaSource>,
    pub position: Option<f64>,
    pub playing: bool,
}

impl Player for HeadlessPlayer {
    fn set_source(&mut self, source: &MediaSource) {
        self.source = Some(source.clone());
        self.position = None;
        self.playing = false;
    }

    fn set_position(&mut self, seconds: f64) {
        self.position = Some(seconds);
    }

    fn play(&mut self) {
        self.playing = true;
    }
}
