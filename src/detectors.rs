//! A detector running on its own thread, fed over a channel.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use crate::common::SkImage;
use crate::data::{DetectRequest, DetectionResult, ReplyTo, TimeCalc};
use crate::detection_runners::{InferenceSession, Pipeline};
use crate::error::{DetectError, Result};

/// Cloneable front end of a detector worker. The worker exits once every
/// handle is dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct DetectorHandle {
    opt_tx: Sender<DetectRequest>,
}

impl DetectorHandle {
    /// Queues `image` and blocks until its result arrives.
    pub fn detect_blocking(&self, image: SkImage) -> Result<DetectionResult> {
        let (det_tx, det_rx) = crossbeam_channel::bounded(1);
        self.submit(image, ReplyTo::Blocking(det_tx))?;
        det_rx.recv().map_err(|_| DetectError::WorkerClosed)?
    }

    /// Queues `image` and awaits its result without blocking the executor.
    pub async fn detect(&self, image: SkImage) -> Result<DetectionResult> {
        let (det_tx, det_rx) = tokio::sync::oneshot::channel();
        self.submit(image, ReplyTo::Async(det_tx))?;
        det_rx.await.map_err(|_| DetectError::WorkerClosed)?
    }

    fn submit(&self, image: SkImage, reply: ReplyTo) -> Result<()> {
        self.opt_tx
            .send(DetectRequest {
                image: Box::new(image),
                reply,
            })
            .map_err(|_| DetectError::WorkerClosed)
    }
}

/// Moves `pipeline` onto a dedicated thread and returns the handle feeding it.
pub fn spawn_detector<S>(pipeline: Pipeline<S>) -> std::io::Result<(DetectorHandle, JoinHandle<()>)>
where
    S: InferenceSession + 'static,
{
    let (opt_tx, opt_rx) = crossbeam_channel::unbounded();
    let join = thread::Builder::new()
        .name("spine-detector".to_string())
        .spawn(move || detector_loop(pipeline, opt_rx))?;
    Ok((DetectorHandle { opt_tx }, join))
}

fn detector_loop<S: InferenceSession>(pipeline: Pipeline<S>, opt_rx: Receiver<DetectRequest>) {
    let mut time_calc = TimeCalc::default();

    while let Ok(request) = opt_rx.recv() {
        let result = pipeline.detect(&request.image);
        match &result {
            Ok(detections) => {
                if pipeline.config().profile {
                    time_calc.record(detections.timings());
                    log::info!(
                        "[Profile] {} runs | avg {:.2?} (pre {:.2?} | infer {:.2?} | post {:.2?})",
                        time_calc.n(),
                        time_calc.avg(),
                        time_calc.avg_i(0).unwrap_or_default(),
                        time_calc.avg_i(1).unwrap_or_default(),
                        time_calc.avg_i(2).unwrap_or_default(),
                    );
                }
            }
            Err(err) => log::error!("spine_detect: detection failed: {}", err),
        }
        request.reply.send(result);
    }

    log::info!("spine_detect: detector worker stopped");
}
