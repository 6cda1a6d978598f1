//! Backend requests produced by the workbench and their responses.
//!
//! The workbench never awaits the network itself. User intents return
//! [`Request`]s; the event loop runs them through [`dispatch`] (possibly
//! several at once) and feeds each [`Response`] back into
//! `Workbench::apply` in whatever order they complete.

use std::path::PathBuf;

use crate::api::{ApiResult, BackendClient, QuestionAnswer, SearchMatch, VideoAnalysis, VideoIndex};
use crate::session::RequestTicket;

/// A backend call to make.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Analyze { ticket: RequestTicket, path: PathBuf },
    Index { ticket: RequestTicket, path: PathBuf },
    Ask {
        ticket: RequestTicket,
        video: String,
        question: String,
    },
    ListCatalog,
    Search { generation: u64, keyword: String },
}

impl Request {
    /// Endpoint name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Request::Analyze { .. } => "analyze-video",
            Request::Index { .. } => "index-video",
            Request::Ask { .. } => "ask-question",
            Request::ListCatalog => "list-processed-videos",
            Request::Search { .. } => "search",
        }
    }
}

/// Outcome of a backend call, still tagged with what issued it.
#[derive(Debug)]
pub enum Response {
    Analyzed {
        ticket: RequestTicket,
        result: ApiResult<VideoAnalysis>,
    },
    Indexed {
        ticket: RequestTicket,
        result: ApiResult<VideoIndex>,
    },
    Answered {
        ticket: RequestTicket,
        result: ApiResult<QuestionAnswer>,
    },
    Catalog {
        result: ApiResult<Vec<VideoAnalysis>>,
    },
    Searched {
        generation: u64,
        result: ApiResult<Vec<SearchMatch>>,
    },
}

impl Response {
    /// Endpoint name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Response::Analyzed { .. } => "analyze-video",
            Response::Indexed { .. } => "index-video",
            Response::Answered { .. } => "ask-question",
            Response::Catalog { .. } => "list-processed-videos",
            Response::Searched { .. } => "search",
        }
    }
}

/// Perform `request` against the backend.
pub async fn dispatch(client: &BackendClient, request: Request) -> Response {
    match request {
        Request::Analyze { ticket, path } => Response::Analyzed {
            result: client.analyze_video(&path).await,
            ticket,
        },
        Request::Index { ticket, path } => Response::Indexed {
            result: client.index_video(&path).await,
            ticket,
        },
        Request::Ask {
            ticket,
            video,
            question,
        } => Response::Answered {
            result: client.ask_question(&video, &question).await,
            ticket,
        },
        Request::ListCatalog => Response::Catalog {
            result: client.list_processed_videos().await,
        },
        Request::Search {
            generation,
            keyword,
        } => Response::Searched {
            result: client.search(&keyword).await,
            generation,
        },
    }
}
