//! Shared test helpers: mock backend and fixtures.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tempfile::TempDir;

use vidqa::api::{Answer, IndexedFrame, QuestionAnswer, SearchMatch, VideoAnalysis, VideoIndex};

/// Smallest header `infer` recognizes as MP4.
pub const MP4_HEADER: &[u8] = b"\x00\x00\x00\x18ftypisom\x00\x00\x02\x00isomiso2mp41";

/// Hash the mock assigns to every uploaded file.
pub const UPLOADED_HASH: &str = "deadbeef";

/// One multipart field the mock received.
#[derive(Debug, Clone)]
pub struct ReceivedField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Everything the mock saw.
#[derive(Debug, Default)]
pub struct Recorded {
    pub analyzed: Vec<ReceivedField>,
    pub indexed: Vec<ReceivedField>,
    /// (video, question)
    pub questions: Vec<(String, String)>,
    pub keywords: Vec<String>,
}

type Shared = Arc<Mutex<Recorded>>;

/// Backend stand-in serving the five endpoints under `/api`.
///
/// Catalog: `abc` (1800 frames, 60s) and `def` (900 frames, 30s), plus
/// `deadbeef` once something was analyzed. Search keyword `fail` answers 500,
/// `garbled` answers malformed JSON.
pub struct MockBackend {
    pub base_url: String,
    pub recorded: Shared,
}

impl MockBackend {
    pub fn start() -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock backend");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let addr = listener.local_addr().expect("mock backend address");
        let recorded: Shared = Arc::default();
        let app = router(recorded.clone());

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("mock backend runtime");
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app).await.expect("mock backend server");
            });
        });

        Self {
            base_url: format!("http://{addr}/api"),
            recorded,
        }
    }

    pub fn questions(&self) -> Vec<(String, String)> {
        self.recorded.lock().unwrap().questions.clone()
    }

    pub fn keywords(&self) -> Vec<String> {
        self.recorded.lock().unwrap().keywords.clone()
    }
}

pub fn video(hash: &str, total_frames: u64, duration: f64) -> VideoAnalysis {
    VideoAnalysis {
        description: format!("Video {hash}"),
        total_frames,
        video_name: format!("{hash}.mp4"),
        video_hash: hash.to_string(),
        video_url: format!("http://media.test/{hash}.mp4"),
        thumbnail: String::new(),
        video_duration: duration,
    }
}

fn catalog(recorded: &Recorded) -> Vec<VideoAnalysis> {
    let mut videos = vec![video("abc", 1800, 60.0), video("def", 900, 30.0)];
    if !recorded.analyzed.is_empty() {
        videos.push(video(UPLOADED_HASH, 1800, 60.0));
    }
    videos
}

fn router(recorded: Shared) -> Router {
    Router::new()
        .route("/api/analyze-video", post(analyze))
        .route("/api/index-video", post(index))
        .route("/api/ask-question", post(ask))
        .route("/api/list-processed-videos", get(list))
        .route("/api/search", get(search))
        .with_state(recorded)
}

async fn read_fields(multipart: &mut Multipart) -> Result<Vec<ReceivedField>, StatusCode> {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|_| StatusCode::BAD_REQUEST)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Ok(fields)
}

async fn analyze(State(recorded): State<Shared>, mut multipart: Multipart) -> Result<Json<VideoAnalysis>, StatusCode> {
    let fields = read_fields(&mut multipart).await?;
    recorded.lock().unwrap().analyzed.extend(fields);
    Ok(Json(video(UPLOADED_HASH, 1800, 60.0)))
}

async fn index(State(recorded): State<Shared>, mut multipart: Multipart) -> Result<Json<VideoIndex>, StatusCode> {
    let fields = read_fields(&mut multipart).await?;
    recorded.lock().unwrap().indexed.extend(fields);
    Ok(Json(VideoIndex {
        video_name: "clip.mp4".to_string(),
        video_id: UPLOADED_HASH.to_string(),
        response: vec![IndexedFrame {
            frame: 0,
            details: vec!["a cat".to_string()],
        }],
    }))
}

async fn ask(State(recorded): State<Shared>, mut multipart: Multipart) -> Result<Json<QuestionAnswer>, StatusCode> {
    let fields = read_fields(&mut multipart).await?;
    let text = |name: &str| {
        fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| String::from_utf8_lossy(&f.bytes).into_owned())
    };
    let (Some(video_id), Some(question)) = (text("video"), text("question")) else {
        return Err(StatusCode::BAD_REQUEST);
    };

    let mut recorded = recorded.lock().unwrap();
    recorded.questions.push((video_id.clone(), question.clone()));
    let Some(video) = catalog(&recorded).into_iter().find(|v| v.video_hash == video_id) else {
        return Err(StatusCode::NOT_FOUND);
    };

    Ok(Json(QuestionAnswer {
        result: Answer {
            question,
            answer: vec![300, 120, 120],
        },
        video_description: video,
    }))
}

async fn list(State(recorded): State<Shared>) -> Json<Vec<VideoAnalysis>> {
    Json(catalog(&recorded.lock().unwrap()))
}

async fn search(State(recorded): State<Shared>, Query(params): Query<HashMap<String, String>>) -> Response {
    let keyword = params.get("keyword").cloned().unwrap_or_default();
    recorded.lock().unwrap().keywords.push(keyword.clone());

    match keyword.as_str() {
        "fail" => (StatusCode::INTERNAL_SERVER_ERROR, "search index offline").into_response(),
        "garbled" => (StatusCode::OK, "{not json").into_response(),
        _ => Json(vec![
            SearchMatch {
                matching_frames: vec![450, 30],
                video_description: video("abc", 1800, 60.0),
            },
            SearchMatch {
                matching_frames: vec![60],
                video_description: video("def", 900, 30.0),
            },
        ])
        .into_response(),
    }
}

/// Write `content` to a file named `name` in a fresh temp dir.
pub fn temp_file(name: &str, content: &[u8]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create temp file");
    file.write_all(content).expect("write temp file");
    (dir, path)
}

/// An MP4 that passes content sniffing.
pub fn temp_video() -> (TempDir, PathBuf) {
    let mut content = MP4_HEADER.to_vec();
    content.extend_from_slice(&[0u8; 64]);
    temp_file("clip.mp4", &content)
}
