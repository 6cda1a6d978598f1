//! HTTP client for the analysis backend.

use std::io::SeekFrom;
use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use super::error::{ApiError, ApiResult};
use super::types::{QuestionAnswer, SearchMatch, VideoAnalysis, VideoIndex};
use crate::config::BackendConfig;

const USER_AGENT: &str = concat!("vidqa/", env!("CARGO_PKG_VERSION"));

/// Async client for the five backend endpoints.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        reqwest::Url::parse(base_url).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> ApiResult<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Upload a video for description and frame counting.
    pub async fn analyze_video(&self, path: &Path) -> ApiResult<VideoAnalysis> {
        let form = video_form(path).await?;
        let response = self
            .http
            .post(self.url("analyze-video"))
            .multipart(form)
            .send()
            .await?;
        let analysis: VideoAnalysis = decode("analyze-video", response).await?;
        info!(hash = %analysis.video_hash, frames = analysis.total_frames, "Video analyzed");
        Ok(analysis)
    }

    /// Upload a video for per-frame indexing.
    pub async fn index_video(&self, path: &Path) -> ApiResult<VideoIndex> {
        let form = video_form(path).await?;
        let response = self
            .http
            .post(self.url("index-video"))
            .multipart(form)
            .send()
            .await?;
        let index: VideoIndex = decode("index-video", response).await?;
        info!(video = %index.video_id, frames = index.response.len(), "Video indexed");
        Ok(index)
    }

    /// Ask a question about an already processed video.
    ///
    /// `video` is the bare hash the backend knows the video by.
    pub async fn ask_question(&self, video: &str, question: &str) -> ApiResult<QuestionAnswer> {
        let form = Form::new()
            .text("video", video.to_string())
            .text("question", question.to_string());
        debug!(video, question, "Asking question");
        let response = self
            .http
            .post(self.url("ask-question"))
            .multipart(form)
            .send()
            .await?;
        decode("ask-question", response).await
    }

    pub async fn list_processed_videos(&self) -> ApiResult<Vec<VideoAnalysis>> {
        let response = self.http.get(self.url("list-processed-videos")).send().await?;
        decode("list-processed-videos", response).await
    }

    /// Keyword search across all processed videos.
    pub async fn search(&self, keyword: &str) -> ApiResult<Vec<SearchMatch>> {
        debug!(keyword, "Searching");
        let response = self
            .http
            .get(self.url("search"))
            .query(&[("keyword", keyword)])
            .send()
            .await?;
        decode("search", response).await
    }
}

/// Bytes read from the start of a file to sniff its type.
const SNIFF_LEN: u64 = 8192;

/// Multipart form carrying the file under the `video` field.
///
/// The file is streamed from disk; only its first few KB are read up front.
async fn video_form(path: &Path) -> ApiResult<Form> {
    let io_error = |source| ApiError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::open(path).await.map_err(io_error)?;
    let length = file.metadata().await.map_err(io_error)?.len();

    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    (&mut file).take(SNIFF_LEN).read_to_end(&mut head).await.map_err(io_error)?;
    file.seek(SeekFrom::Start(0)).await.map_err(io_error)?;

    let mime = infer::get(&head)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());

    debug!(file = %file_name, mime, bytes = length, "Preparing upload");

    let body = Body::wrap_stream(ReaderStream::new(file));
    let part = Part::stream_with_length(body, length)
        .file_name(file_name)
        .mime_str(mime)?;
    Ok(Form::new().part("video", part))
}

async fn decode<T: DeserializeOwned>(endpoint: &'static str, response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
        endpoint,
        message: e.to_string(),
    })
}
