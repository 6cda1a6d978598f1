//! Workbench: the client's view state around a playback session.
//!
//! Ties the catalog, the upload/ask/search flows, the busy flags and the
//! error banner to a [`PlaybackSession`]. It is a plain state container with
//! no I/O of its own:
//!
//! - intent methods (`upload`, `ask`, `search`, ...) validate input, update
//!   state and return the backend [`Request`]s to make;
//! - [`Workbench::apply`] folds a [`Response`] back in, discarding it if the
//!   load or search that issued it has been superseded.
//!
//! # Module Structure
//!
//! - [`activity`] - in-flight markers
//! - [`dispatch`] - request/response types and the async dispatcher

mod activity;
mod dispatch;

pub use activity::Activity;
pub use dispatch::{dispatch, Request, Response};

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::api::{ApiError, QuestionAnswer, SearchMatch, VideoAnalysis, VideoIndex};
use crate::identity::{resolve, IdentityError, VideoRecord};
use crate::results::ResultSet;
use crate::session::{
    Acceptance, LoadId, PlaybackSession, Player, RequestTicket, SessionError, SessionState, VideoTarget, View,
};
use crate::timecode::{Interval, TimeCode};

/// Errors from workbench intents.
#[derive(Debug, thiserror::Error)]
pub enum WorkbenchError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("The file is not a valid video.")]
    NotAVideo(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Question is empty")]
    EmptyQuestion,

    #[error("Search hit {index} out of range (have {len} hits)")]
    HitOutOfRange { index: usize, len: usize },
}

/// One video matched by a search, with its normalized frames.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub video: VideoRecord,
    /// Keyed by the video's composite id
    pub results: ResultSet,
}

/// What `apply` did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Superseded by a newer load or search
    Discarded,
    /// The call failed; the banner holds the message
    Failed,
}

/// Result of applying a response.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub outcome: Outcome,
    /// Requests the response triggers
    pub follow_up: Vec<Request>,
}

impl Update {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            follow_up: Vec::new(),
        }
    }
}

/// Client state around one playback session.
#[derive(Debug)]
pub struct Workbench<P: Player> {
    session: PlaybackSession<P>,
    catalog: Vec<VideoRecord>,
    search_hits: Vec<SearchHit>,
    search_generation: u64,
    activity: Activity,
    banner: Option<String>,
}

impl<P: Player> Workbench<P> {
    pub fn new(player: P, interval: Interval) -> Self {
        Self {
            session: PlaybackSession::new(player, interval),
            catalog: Vec::new(),
            search_hits: Vec::new(),
            search_generation: 0,
            activity: Activity::default(),
            banner: None,
        }
    }

    pub fn session(&self) -> &PlaybackSession<P> {
        &self.session
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn player(&self) -> &P {
        self.session.player()
    }

    pub fn catalog(&self) -> &[VideoRecord] {
        &self.catalog
    }

    pub fn search_hits(&self) -> &[SearchHit] {
        &self.search_hits
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// Take the pending error banner, if any.
    pub fn take_banner(&mut self) -> Option<String> {
        self.banner.take()
    }

    fn show_banner(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(banner = %message, "Showing error banner");
        self.banner = Some(message);
    }

    fn load(&mut self, target: VideoTarget, seek_to: Option<TimeCode>) -> LoadId {
        self.activity.clear_video_calls();
        self.session.load(target, seek_to)
    }

    /// Request a fresh catalog.
    pub fn refresh_catalog(&self) -> Request {
        Request::ListCatalog
    }

    /// Look up a catalog video by 1-based position, hash or composite id.
    pub fn find_in_catalog(&self, key: &str) -> Result<&VideoRecord, IdentityError> {
        let key = key.trim();
        if let Ok(position) = key.parse::<usize>() {
            if let Some(video) = position.checked_sub(1).and_then(|i| self.catalog.get(i)) {
                return Ok(video);
            }
        }
        self.catalog
            .iter()
            .find(|video| video.hash == key)
            .map_or_else(|| resolve(key, &self.catalog), Ok)
    }

    /// Load a catalog video.
    ///
    /// A composite id makes the session frame-count-aware; a bare hash or
    /// position does not.
    pub fn open(&mut self, key: &str) -> Result<LoadId, WorkbenchError> {
        let video = self.find_in_catalog(key)?;
        let target = if video.hash == key.trim() || key.trim().parse::<usize>().is_ok() {
            VideoTarget::from_record(video)
        } else {
            VideoTarget::composite_from_record(video)
        };
        Ok(self.load(target, None))
    }

    /// Load an explicit target, bypassing the catalog.
    pub fn open_target(&mut self, target: VideoTarget) -> LoadId {
        self.load(target, None)
    }

    /// Play a local file and send it for analysis and indexing.
    pub fn upload(&mut self, path: &Path) -> Result<Vec<Request>, WorkbenchError> {
        ensure_video(path)?;

        self.load(VideoTarget::local(&path.display().to_string()), None);
        let ticket = self.session.ticket().ok_or(SessionError::NoActiveVideo)?;
        self.activity.processing_video = true;
        self.activity.indexing = true;

        info!(file = %path.display(), "Uploading video");
        Ok(vec![
            Request::Analyze {
                ticket: ticket.clone(),
                path: path.to_path_buf(),
            },
            Request::Index {
                ticket,
                path: path.to_path_buf(),
            },
        ])
    }

    /// Ask a question about the active video.
    pub fn ask(&mut self, question: &str) -> Result<Request, WorkbenchError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(WorkbenchError::EmptyQuestion);
        }
        let video = self.session.question_target()?;
        let ticket = self.session.ticket().ok_or(SessionError::NoActiveVideo)?;

        self.session.clear_selection();
        self.activity.processing_question = true;

        Ok(Request::Ask {
            ticket,
            video,
            question: question.to_string(),
        })
    }

    /// Search all processed videos. Empty keywords are ignored.
    pub fn search(&mut self, keyword: &str) -> Option<Request> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return None;
        }
        self.session.clear_selection();
        self.search_generation += 1;
        self.activity.searching = true;

        Some(Request::Search {
            generation: self.search_generation,
            keyword: keyword.to_string(),
        })
    }

    /// Select entry `index` of the displayed results.
    pub fn select(&mut self, index: usize) -> Result<(), WorkbenchError> {
        Ok(self.session.select_displayed(index)?)
    }

    /// Select entry `index` of search hit `hit`, switching video if needed.
    pub fn select_hit(&mut self, hit: usize, index: usize) -> Result<(), WorkbenchError> {
        let Some(search_hit) = self.search_hits.get(hit) else {
            return Err(WorkbenchError::HitOutOfRange {
                index: hit,
                len: self.search_hits.len(),
            });
        };
        let results = search_hit.results.clone();
        let video = resolve(&results.video_id, self.search_hits.iter().map(|h| &h.video))?;
        let target = VideoTarget::composite_from_record(video);

        let before = self.session.state().phase.load();
        self.session.select_result(index, &results, &target)?;
        if self.session.state().phase.load() != before {
            self.activity.clear_video_calls();
        }
        Ok(())
    }

    pub fn seek(&mut self, time_code: TimeCode) -> Result<(), WorkbenchError> {
        Ok(self.session.seek(time_code)?)
    }

    pub fn set_view(&mut self, view: View) {
        self.session.set_view(view);
    }

    /// Forward the player's "source ready" event.
    pub fn source_ready(&mut self, load: LoadId) -> Acceptance {
        self.session.source_ready(load)
    }

    /// Fold a backend response into the state.
    pub fn apply(&mut self, response: Response) -> Update {
        match response {
            Response::Analyzed { ticket, result } => self.apply_analysis(ticket, result),
            Response::Indexed { ticket, result } => self.apply_index(ticket, result),
            Response::Answered { ticket, result } => self.apply_answer(ticket, result),
            Response::Catalog { result } => self.apply_catalog(result),
            Response::Searched { generation, result } => self.apply_search(generation, result),
        }
    }

    fn is_superseded(&self, ticket: &RequestTicket, what: &str) -> bool {
        if self.session.is_current(ticket) {
            return false;
        }
        warn!(video = %ticket.video_id, load = ticket.load.get(), "Discarding {} response for superseded load", what);
        true
    }

    fn apply_analysis(&mut self, ticket: RequestTicket, result: Result<VideoAnalysis, ApiError>) -> Update {
        if self.is_superseded(&ticket, "analysis") {
            return Update::new(Outcome::Discarded);
        }
        self.activity.processing_video = false;

        match result {
            Ok(analysis) => {
                self.session
                    .confirm_identity(&ticket, &analysis.video_hash, &analysis.description);
                Update {
                    outcome: Outcome::Applied,
                    follow_up: vec![Request::ListCatalog],
                }
            }
            Err(e) => {
                self.show_banner(e.banner_message());
                Update::new(Outcome::Failed)
            }
        }
    }

    fn apply_index(&mut self, ticket: RequestTicket, result: Result<VideoIndex, ApiError>) -> Update {
        if self.is_superseded(&ticket, "index") {
            return Update::new(Outcome::Discarded);
        }
        self.activity.indexing = false;

        match result {
            Ok(index) => {
                info!(video = %index.video_id, frames = index.response.len(), "Indexing finished");
                Update::new(Outcome::Applied)
            }
            Err(e) => {
                self.show_banner(e.banner_message());
                Update::new(Outcome::Failed)
            }
        }
    }

    fn apply_answer(&mut self, ticket: RequestTicket, result: Result<QuestionAnswer, ApiError>) -> Update {
        if self.is_superseded(&ticket, "answer") {
            return Update::new(Outcome::Discarded);
        }
        self.activity.processing_question = false;

        let answer = match result {
            Ok(answer) => answer,
            Err(e) => {
                self.show_banner(e.banner_message());
                return Update::new(Outcome::Failed);
            }
        };

        let video = &answer.video_description;
        match ResultSet::build(
            ticket.video_id.clone(),
            View::Qa,
            &answer.result.answer,
            video.total_frames,
            video.video_duration,
            self.session.interval(),
        ) {
            Ok(results) => {
                info!(question = %answer.result.question, matches = results.len(), "Question answered");
                self.session.show_results(&ticket, results);
                Update::new(Outcome::Applied)
            }
            Err(e) => {
                self.show_banner(e.to_string());
                Update::new(Outcome::Failed)
            }
        }
    }

    fn apply_catalog(&mut self, result: Result<Vec<VideoAnalysis>, ApiError>) -> Update {
        match result {
            Ok(videos) => {
                self.catalog = videos.into_iter().map(VideoRecord::from).collect();
                info!(videos = self.catalog.len(), "Catalog refreshed");
                Update::new(Outcome::Applied)
            }
            Err(e) => {
                self.catalog.clear();
                self.show_banner(e.banner_message());
                Update::new(Outcome::Failed)
            }
        }
    }

    fn apply_search(&mut self, generation: u64, result: Result<Vec<SearchMatch>, ApiError>) -> Update {
        if generation != self.search_generation {
            warn!(generation, current = self.search_generation, "Discarding superseded search response");
            return Update::new(Outcome::Discarded);
        }
        self.activity.searching = false;

        let matches = match result {
            Ok(matches) => matches,
            Err(e) => {
                self.show_banner(e.banner_message());
                return Update::new(Outcome::Failed);
            }
        };

        let interval = self.session.interval();
        self.search_hits = matches
            .into_iter()
            .filter_map(|m| {
                let video = VideoRecord::from(m.video_description);
                match ResultSet::build(
                    video.composite_id(),
                    View::Search,
                    &m.matching_frames,
                    video.total_frames,
                    video.duration_secs,
                    interval,
                ) {
                    Ok(results) => Some(SearchHit { video, results }),
                    Err(e) => {
                        warn!(video = %video.hash, error = %e, "Skipping search hit");
                        None
                    }
                }
            })
            .collect();
        self.session.set_view(View::Search);
        Update::new(Outcome::Applied)
    }
}

/// Reject files whose content is not a recognizable video container.
fn ensure_video(path: &Path) -> Result<(), WorkbenchError> {
    let kind = infer::get_from_path(path).map_err(|source| WorkbenchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match kind {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Video => Ok(()),
        _ => Err(WorkbenchError::NotAVideo(path.to_path_buf())),
    }
}
