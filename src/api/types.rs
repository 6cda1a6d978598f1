//! Wire types of the analysis backend.

use serde::{Deserialize, Serialize};

/// Response of `POST /analyze-video`, also the element type of
/// `GET /list-processed-videos` and the `video_description` of answers and
/// search hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalysis {
    pub description: String,
    pub total_frames: u64,
    pub video_name: String,
    pub video_hash: String,
    #[serde(rename = "videoUrl")]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail: String,
    pub video_duration: f64,
}

/// One indexed frame and what the backend saw in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedFrame {
    pub frame: u64,
    #[serde(default)]
    pub details: Vec<String>,
}

/// Response of `POST /index-video`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoIndex {
    pub video_name: String,
    pub video_id: String,
    #[serde(default)]
    pub response: Vec<IndexedFrame>,
}

/// The question echoed back with the matching frame indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: Vec<u64>,
}

/// Response of `POST /ask-question`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub result: Answer,
    pub video_description: VideoAnalysis,
}

/// One element of the `GET /search` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub matching_frames: Vec<u64>,
    pub video_description: VideoAnalysis,
}
