//! Backend client against the mock server

use std::time::Duration;

use vidqa::api::{ApiError, BackendClient};

use crate::helpers::{temp_file, temp_video, MockBackend, MP4_HEADER, UPLOADED_HASH};

fn client(backend: &MockBackend) -> BackendClient {
    BackendClient::new(&backend.base_url, Duration::from_secs(10)).unwrap()
}

#[tokio::test]
async fn lists_processed_videos() {
    let backend = MockBackend::start();

    let videos = client(&backend).list_processed_videos().await.unwrap();

    let hashes: Vec<&str> = videos.iter().map(|v| v.video_hash.as_str()).collect();
    assert_eq!(hashes, vec!["abc", "def"]);
    assert_eq!(videos[0].video_url, "http://media.test/abc.mp4");
}

#[tokio::test]
async fn analyze_uploads_file_under_video_field() {
    let backend = MockBackend::start();
    let (_dir, path) = temp_video();

    let analysis = client(&backend).analyze_video(&path).await.unwrap();

    assert_eq!(analysis.video_hash, UPLOADED_HASH);
    let recorded = backend.recorded.lock().unwrap();
    assert_eq!(recorded.analyzed.len(), 1);
    let field = &recorded.analyzed[0];
    assert_eq!(field.name, "video");
    assert_eq!(field.file_name.as_deref(), Some("clip.mp4"));
    assert!(field.bytes.starts_with(MP4_HEADER));
}

#[tokio::test]
async fn upload_streams_whole_file_with_sniffed_type() {
    let backend = MockBackend::start();
    let mut content = MP4_HEADER.to_vec();
    content.extend((0..100_000u32).map(|i| (i % 251) as u8));
    let (_dir, path) = temp_file("long.mp4", &content);

    client(&backend).index_video(&path).await.unwrap();

    let recorded = backend.recorded.lock().unwrap();
    let field = &recorded.indexed[0];
    assert_eq!(field.file_name.as_deref(), Some("long.mp4"));
    assert_eq!(field.content_type.as_deref(), Some("video/mp4"));
    assert_eq!(field.bytes.len(), content.len());
    assert_eq!(field.bytes, content);
}

#[tokio::test]
async fn index_reports_frames() {
    let backend = MockBackend::start();
    let (_dir, path) = temp_video();

    let index = client(&backend).index_video(&path).await.unwrap();

    assert_eq!(index.video_id, UPLOADED_HASH);
    assert_eq!(index.response.len(), 1);
    assert_eq!(index.response[0].details, vec!["a cat".to_string()]);
}

#[tokio::test]
async fn ask_sends_video_and_question_fields() {
    let backend = MockBackend::start();

    let answer = client(&backend).ask_question("abc", "where is the cat?").await.unwrap();

    assert_eq!(answer.result.answer, vec![300, 120, 120]);
    assert_eq!(answer.video_description.total_frames, 1800);
    assert_eq!(
        backend.questions(),
        vec![("abc".to_string(), "where is the cat?".to_string())]
    );
}

#[tokio::test]
async fn ask_about_unknown_video_is_status_error() {
    let backend = MockBackend::start();

    let err = client(&backend).ask_question("nope", "anything?").await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}

#[tokio::test]
async fn search_encodes_keyword_as_query() {
    let backend = MockBackend::start();

    let matches = client(&backend).search("red car & co").await.unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(backend.keywords(), vec!["red car & co".to_string()]);
}

#[tokio::test]
async fn server_error_carries_body() {
    let backend = MockBackend::start();

    let err = client(&backend).search("fail").await.unwrap_err();

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "search index offline");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_is_decode_error() {
    let backend = MockBackend::start();

    let err = client(&backend).search("garbled").await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { endpoint: "search", .. }));
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let client = BackendClient::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();

    let err = client.list_processed_videos().await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.banner_message(), "Could not reach the backend.");
}

#[tokio::test]
async fn non_video_upload_is_still_sent_as_octet_stream() {
    let backend = MockBackend::start();
    let (_dir, path) = temp_file("notes.bin", &[1, 2, 3, 4]);

    client(&backend).index_video(&path).await.unwrap();

    let recorded = backend.recorded.lock().unwrap();
    assert_eq!(recorded.indexed[0].bytes, vec![1, 2, 3, 4]);
}
