mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{MockExtractor, Workspace};
use vidlens_engine::VideoEstimator;
use vidlens_tokens::{FrameEstimator, TokenEstimator, calculate_cost};

fn estimator(extractor: Arc<MockExtractor>, ws: &Workspace, frames: usize) -> VideoEstimator {
    let options = ws.options(frames);
    let frame_estimator = FrameEstimator::new(options.model.clone()).with_tokenizer(TokenEstimator::heuristic());
    VideoEstimator::new(extractor, options).with_frame_estimator(frame_estimator)
}

#[tokio::test]
async fn test_single_video_scales_one_frame() {
    let ws = Workspace::new();
    let video = ws.video("clip.mp4");
    let extractor = Arc::new(MockExtractor {
        durations: [("clip.mp4".to_string(), 42.0)].into(),
        png: Some((1024, 1024)),
        ..Default::default()
    });
    let estimator = estimator(extractor.clone(), &ws, 10);

    let estimate = estimator.estimate_video(&video).await.unwrap();

    // Only the representative frame is extracted
    assert_eq!(extractor.extractions.load(Ordering::SeqCst), 1);
    assert_eq!((estimate.frame_width, estimate.frame_height), (1024, 1024));
    assert_eq!(estimate.duration_seconds, 42.0);
    assert_eq!(estimate.per_frame.image_tokens, 1109);
    assert_eq!(estimate.total.total_tokens, estimate.per_frame.total_tokens * 10);
    assert_eq!(estimate.frame_count, 10);

    let per_frame_cost = calculate_cost(estimate.per_frame.total_tokens, 100, "gpt-4.1", false);
    assert!((estimate.per_frame.estimated_cost - per_frame_cost).abs() < 1e-12);
    assert!(ws.scratch_is_empty());
}

#[tokio::test]
async fn test_multi_video_skips_missing_paths() {
    let ws = Workspace::new();
    let a = ws.video("a.mp4");
    let b = ws.video("b.mp4");
    let missing = ws.dir.path().join("missing.mp4");
    let extractor = Arc::new(MockExtractor {
        png: Some((640, 360)),
        ..Default::default()
    });
    let estimator = estimator(extractor, &ws, 5);

    let multi = estimator
        .estimate_videos(&[a.clone(), missing.clone(), b.clone()])
        .await;

    assert_eq!(multi.videos.len(), 2);
    assert_eq!(multi.skipped.len(), 1);
    assert_eq!(multi.skipped[0].video_path, missing);

    let expected: u64 = multi.videos.iter().map(|v| v.total.total_tokens).sum();
    assert_eq!(multi.total_tokens, expected);
    assert_eq!(multi.total_frames, 10);
    assert_eq!(multi.videos[0].video_path, a);
    assert_eq!(multi.videos[1].video_path, b);
}

#[tokio::test]
async fn test_failed_video_is_skipped_not_fatal() {
    let ws = Workspace::new();
    let good = ws.video("good.mp4");
    let bad = ws.video("bad.mp4");
    let extractor = Arc::new(MockExtractor {
        png: Some((320, 240)),
        fail_duration: Some("bad.mp4".to_string()),
        ..Default::default()
    });
    let estimator = estimator(extractor, &ws, 3);

    let multi = estimator.estimate_videos(&[bad, good]).await;

    assert_eq!(multi.videos.len(), 1);
    assert_eq!(multi.skipped.len(), 1);
    assert!(multi.skipped[0].error.contains("moov atom"));
    assert!(ws.scratch_is_empty());
}

#[tokio::test]
async fn test_non_image_frame_is_an_error() {
    let ws = Workspace::new();
    let video = ws.video("clip.mp4");
    let estimator = estimator(Arc::new(MockExtractor::default()), &ws, 3);

    let err = estimator.estimate_video(&video).await.unwrap_err();
    assert!(matches!(err, vidlens_core::Error::Image(_)));
}

#[tokio::test]
async fn test_frame_estimate_without_video() {
    let ws = Workspace::new();
    let estimator = estimator(Arc::new(MockExtractor::default()), &ws, 3);

    let estimate = estimator.estimate_frame(1024, 1024);
    assert_eq!(estimate.image_tokens, 1109);
    assert!(estimate.text_tokens > 0);
}
