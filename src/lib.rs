//! vidqa - Video Q&A client
//!
//! Uploads videos to an analysis backend, asks questions about them, searches
//! across processed videos, and drives a player to the frames that answer.
//!
//! The core is I/O free: [`timecode`], [`results`], [`identity`] and
//! [`session`] are plain data and state transitions. [`api`] talks to the
//! backend and [`app`] ties both together for the command-line front end.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod identity;
pub mod results;
pub mod session;
pub mod theme;
pub mod timecode;

pub use api::{ApiError, BackendClient};
pub use app::Workbench;
pub use config::Config;
pub use identity::VideoRecord;
pub use results::{ResultEntry, ResultSet};
pub use session::{PlaybackSession, Player};
pub use timecode::{Interval, TimeCode, VideoMetrics};
