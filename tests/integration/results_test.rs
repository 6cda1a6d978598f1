//! Result normalization through the public API

use vidqa::results::{normalize, ResultSet};
use vidqa::session::View;
use vidqa::timecode::{Interval, TimeCodeError, VideoMetrics};

fn frames(set: &ResultSet) -> Vec<u64> {
    set.entries.iter().map(|e| e.source_frame).collect()
}

#[test]
fn duplicates_collapse_and_order_by_frame() {
    let metrics = VideoMetrics::new(9000, 300.0).unwrap();
    let entries = normalize(&[5, 5, 3, 9, 3], &metrics, "abc", Interval::default());
    let frames: Vec<u64> = entries.iter().map(|e| e.source_frame).collect();
    assert_eq!(frames, vec![3, 5, 9]);
    assert!(entries.iter().all(|e| e.video_id == "abc"));
}

#[test]
fn frames_sharing_a_time_code_are_all_kept() {
    // 3, 5 and 9 all fall inside the first second
    let set = ResultSet::build("abc", View::Qa, &[9, 3, 5], 9000, 300.0, Interval::default()).unwrap();
    assert_eq!(frames(&set), vec![3, 5, 9]);
    assert!(set.entries.iter().all(|e| e.time_code.to_string() == "00:00"));
}

#[test]
fn answer_scenario() {
    let set = ResultSet::build("abc", View::Qa, &[120, 245, 245, 300], 1800, 60.0, Interval::default()).unwrap();
    assert_eq!(frames(&set), vec![120, 245, 300]);
    let codes: Vec<String> = set.entries.iter().map(|e| e.time_code.to_string()).collect();
    assert_eq!(codes, vec!["00:04", "00:08", "00:10"]);
    assert_eq!(set.view, View::Qa);
}

#[test]
fn empty_answer_builds_empty_set() {
    let set = ResultSet::build("abc", View::Search, &[], 1800, 60.0, Interval::default()).unwrap();
    assert!(set.is_empty());
    assert!(set.get(0).is_none());
}

#[test]
fn invalid_metrics_produce_no_entries() {
    let err = ResultSet::build("abc", View::Qa, &[1, 2, 3], 1800, 0.0, Interval::default()).unwrap_err();
    assert!(matches!(err, TimeCodeError::InvalidMetrics { total_frames: 1800, .. }));
}
