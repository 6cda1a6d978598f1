//! Playback session state machine
//!
//! Owns "which video is loaded, which result is selected, which view is
//! showing" and drives the injected player accordingly.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --load--> Loading --source_ready--> Ready
//!                   ^                        |
//!                   +----------load----------+
//! ```
//!
//! Every `load` gets a fresh [`LoadId`]. Player events and backend responses
//! carry the id of the load they belong to, and anything tagged with an
//! older id is discarded on arrival. Loading the same video twice still
//! yields two ids, so the most recently *initiated* load always wins.
//!
//! # Usage
//!
//! ```
//! use vidqa::session::{HeadlessPlayer, PlaybackSession, VideoTarget};
//! use vidqa::timecode::{Interval, TimeCode};
//!
//! let mut session = PlaybackSession::new(HeadlessPlayer::default(), Interval::default());
//! let load = session.load(
//!     VideoTarget {
//!         id: "abc123".into(),
//!         url: "http://localhost/abc123.mp4".into(),
//!         description: "A cat".into(),
//!         total_frames: None,
//!         confirmed: true,
//!     },
//!     Some(TimeCode::new(0, 4)),
//! );
//! assert_eq!(session.player().position, None);
//!
//! session.source_ready(load);
//! assert_eq!(session.player().position, Some(4.0));
//! ```

mod player;
mod state;

pub use player::{HeadlessPlayer, MediaSource, Player};
pub use state::{ActiveVideo, LoadId, Phase, RequestTicket, SessionState, VideoTarget, View};

use tracing::{debug, error, warn};

use crate::results::ResultSet;
use crate::timecode::{time_code_to_seconds, Interval, TimeCode};

/// Errors from session transitions.
///
/// A refused transition leaves the state exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Result index {index} out of range (have {len} results)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No video file available")]
    NoActiveVideo,

    #[error("Video is still being analyzed")]
    AnalysisPending,

    #[error("Time code {time_code} has seconds beyond the {interval_secs}s interval")]
    TimeCodeOutOfRange { time_code: TimeCode, interval_secs: u32 },
}

/// Whether an event was applied or ignored as superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    Applied,
    Stale,
}

impl Acceptance {
    pub fn is_applied(self) -> bool {
        self == Acceptance::Applied
    }
}

/// Playback session bound to one player.
#[derive(Debug)]
pub struct PlaybackSession<P: Player> {
    player: P,
    interval: Interval,
    state: SessionState,
    last_load: u64,
}

impl<P: Player> PlaybackSession<P> {
    pub fn new(player: P, interval: Interval) -> Self {
        Self {
            player,
            interval,
            state: SessionState::default(),
            last_load: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Start loading a video.
    ///
    /// Resets selection and displayed results, switches to the summary view
    /// and hands the source to the player. `seek_to` is held until the
    /// player reports the source ready.
    pub fn load(&mut self, target: VideoTarget, seek_to: Option<TimeCode>) -> LoadId {
        self.last_load += 1;
        let load = LoadId(self.last_load);

        debug!(load = load.get(), video = %target.id, seek_to = ?seek_to.map(|t| t.to_string()), "Loading video");

        self.state.active = Some(ActiveVideo {
            id: target.id,
            url: target.url.clone(),
            total_frames: target.total_frames.filter(|&n| n > 0),
            confirmed: target.confirmed,
        });
        self.state.description = target.description;
        self.state.selected_result = None;
        self.state.displayed = None;
        self.state.view = View::Summary;
        self.state.phase = Phase::Loading {
            load,
            pending_seek: seek_to,
        };

        self.player.set_source(&MediaSource {
            load,
            url: target.url,
        });

        load
    }

    /// Handle the player's "source ready" event.
    ///
    /// Applies the pending seek and starts playback, but only if `load` is
    /// still the load in progress.
    pub fn source_ready(&mut self, load: LoadId) -> Acceptance {
        match self.state.phase {
            Phase::Loading {
                load: current,
                pending_seek,
            } if current == load => {
                self.state.phase = Phase::Ready { load };
                if let Some(time_code) = pending_seek {
                    self.player
                        .set_position(time_code_to_seconds(time_code, self.interval));
                }
                self.player.play();
                debug!(load = load.get(), "Source ready");
                Acceptance::Applied
            }
            _ => {
                warn!(
                    load = load.get(),
                    phase = self.state.phase.label(),
                    "Ignoring source-ready event for superseded load"
                );
                Acceptance::Stale
            }
        }
    }

    /// Move playback to `time_code`.
    ///
    /// While the source is still loading the seek replaces the pending one.
    pub fn seek(&mut self, time_code: TimeCode) -> Result<(), SessionError> {
        if !time_code.fits(self.interval) {
            return Err(SessionError::TimeCodeOutOfRange {
                time_code,
                interval_secs: self.interval.secs(),
            });
        }
        match &mut self.state.phase {
            Phase::Idle => Err(SessionError::NoActiveVideo),
            Phase::Loading { pending_seek, .. } => {
                *pending_seek = Some(time_code);
                Ok(())
            }
            Phase::Ready { .. } => {
                self.player
                    .set_position(time_code_to_seconds(time_code, self.interval));
                Ok(())
            }
        }
    }

    /// Select entry `index` of `results`, which belong to `source`.
    ///
    /// If `source` is not the active video it is loaded first with the
    /// entry's time code as pending seek. The view the results came from
    /// stays visible and the selection refers to `results`.
    pub fn select_result(
        &mut self,
        index: usize,
        results: &ResultSet,
        source: &VideoTarget,
    ) -> Result<(), SessionError> {
        let Some(entry) = results.get(index) else {
            error!(
                index,
                len = results.len(),
                video = %results.video_id,
                "Refusing selection outside result set"
            );
            return Err(SessionError::IndexOutOfRange {
                index,
                len: results.len(),
            });
        };
        let time_code = entry.time_code;

        if self.state.active_video_id() == Some(source.id.as_str()) {
            self.seek(time_code)?;
        } else {
            self.load(source.clone(), Some(time_code));
        }

        self.state.displayed = Some(results.clone());
        self.state.view = results.view;
        self.state.selected_result = Some(index);
        Ok(())
    }

    /// Select entry `index` of the currently displayed results.
    ///
    /// Results kept from another view are not displayed and cannot be
    /// selected.
    pub fn select_displayed(&mut self, index: usize) -> Result<(), SessionError> {
        let Some(results) = self
            .state
            .displayed
            .clone()
            .filter(|results| results.view == self.state.view)
        else {
            return Err(SessionError::IndexOutOfRange { index, len: 0 });
        };
        let Some(active) = self.state.active.as_ref() else {
            return Err(SessionError::NoActiveVideo);
        };
        let source = VideoTarget {
            id: active.id.clone(),
            url: active.url.clone(),
            description: self.state.description.clone(),
            total_frames: active.total_frames,
            confirmed: active.confirmed,
        };
        self.select_result(index, &results, &source)
    }

    /// Drop the highlighted result.
    pub fn clear_selection(&mut self) {
        self.state.selected_result = None;
    }

    pub fn set_view(&mut self, view: View) {
        self.state.view = view;
    }

    /// Display a freshly built result set if `ticket` is still current.
    pub fn show_results(&mut self, ticket: &RequestTicket, results: ResultSet) -> Acceptance {
        if !self.is_current(ticket) {
            warn!(video = %ticket.video_id, "Discarding results for superseded video");
            return Acceptance::Stale;
        }
        self.state.view = results.view;
        self.state.displayed = Some(results);
        self.state.selected_result = None;
        Acceptance::Applied
    }

    /// Replace a provisional identity with the one assigned by the backend.
    pub fn confirm_identity(
        &mut self,
        ticket: &RequestTicket,
        hash: &str,
        description: &str,
    ) -> Acceptance {
        if !self.is_current(ticket) {
            warn!(video = %ticket.video_id, "Discarding analysis for superseded video");
            return Acceptance::Stale;
        }
        if let Some(active) = self.state.active.as_mut() {
            debug!(from = %active.id, to = %hash, "Confirming video identity");
            active.id = hash.to_string();
            active.total_frames = None;
            active.confirmed = true;
        }
        self.state.description = description.to_string();
        Acceptance::Applied
    }

    /// Ticket for a request issued on behalf of the active video.
    pub fn ticket(&self) -> Option<RequestTicket> {
        let load = self.state.phase.load()?;
        let active = self.state.active.as_ref()?;
        Some(RequestTicket {
            load,
            video_id: active.id.clone(),
        })
    }

    /// Whether a response tagged with `ticket` may still be applied.
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.state.phase.load() == Some(ticket.load)
    }

    /// Identifier to send with a question about the active video.
    pub fn question_target(&self) -> Result<String, SessionError> {
        let active = self.state.active.as_ref().ok_or(SessionError::NoActiveVideo)?;
        if !active.confirmed {
            return Err(SessionError::AnalysisPending);
        }
        Ok(active.question_id().to_string())
    }
}
