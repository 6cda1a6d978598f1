//! Analysis backend collaborator.
//!
//! - [`types`] - serde shapes of the JSON responses
//! - [`client`] - async HTTP client for the five endpoints
//! - [`error`] - transport and backend errors

mod client;
mod error;
mod types;

pub use client::BackendClient;
pub use error::{ApiError, ApiResult};
pub use types::{Answer, IndexedFrame, QuestionAnswer, SearchMatch, VideoAnalysis, VideoIndex};
