use image::RgbImage;
use spine_detect::common::{PipelineConfig, SkImage};
use spine_detect::{spawn_detector, DetectError, Pipeline, Tensor};

mod mock_session;

use mock_session::{candidate, channel_major, MockSession};

fn pipeline() -> Pipeline<MockSession> {
    let output = channel_major(&[
        candidate(125., 125., 50., 50., 1, 0.9),
        candidate(130., 127., 50., 50., 1, 0.6),
    ]);
    let config = PipelineConfig::default().with_profile(true);
    Pipeline::new(MockSession::new(output), config).unwrap()
}

#[tokio::test]
async fn detector_answers_async_requests() {
    let (handle, join) = spawn_detector(pipeline()).unwrap();

    for _ in 0..3 {
        let result = handle.detect(SkImage::new(RgbImage::new(1280, 640))).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.model_space()[0].label.to_string(), "L2");
    }

    drop(handle);
    join.join().unwrap();
}

#[test]
fn detector_answers_blocking_requests_from_many_threads() {
    let (handle, join) = spawn_detector(pipeline()).unwrap();

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let handle = handle.clone();
            std::thread::spawn(move || {
                let image = SkImage::new(RgbImage::new(200 + i * 10, 300));
                handle.detect_blocking(image).unwrap()
            })
        })
        .collect();

    for (i, worker) in workers.into_iter().enumerate() {
        let result = worker.join().unwrap();
        assert_eq!(result.letterbox().image_width, 200 + i as u32 * 10);
    }

    drop(handle);
    join.join().unwrap();
}

#[test]
fn errors_travel_back_to_the_caller() {
    let (handle, join) = spawn_detector(pipeline()).unwrap();

    let err = handle.detect_blocking(SkImage::new(RgbImage::new(0, 0))).unwrap_err();
    assert!(matches!(err, DetectError::InvalidImage { .. }));
    assert!(handle.detect_blocking(SkImage::new(RgbImage::new(64, 64))).is_ok());

    drop(handle);
    join.join().unwrap();
}

#[test]
fn dead_worker_reports_closed() {
    let panicking = |_: &Tensor| -> anyhow::Result<Tensor> { panic!("session crashed") };
    let pipeline = Pipeline::new(panicking, PipelineConfig::default()).unwrap();
    let (handle, join) = spawn_detector(pipeline).unwrap();

    let err = handle.detect_blocking(SkImage::new(RgbImage::new(64, 64))).unwrap_err();
    assert!(matches!(err, DetectError::WorkerClosed));
    assert!(join.join().is_err());

    let err = handle.detect_blocking(SkImage::new(RgbImage::new(64, 64))).unwrap_err();
    assert!(matches!(err, DetectError::WorkerClosed));
}
