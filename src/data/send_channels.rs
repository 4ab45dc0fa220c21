use crate::common::SkImage;
use crate::data::DetectionResult;
use crate::error::Result;

/// Where the worker sends the answer to one request.
#[derive(Debug)]
pub enum ReplyTo {
    Blocking(crossbeam_channel::Sender<Result<DetectionResult>>),
    Async(tokio::sync::oneshot::Sender<Result<DetectionResult>>),
}

impl ReplyTo {
    /// Delivers the result; a caller that stopped waiting is not an error.
    pub fn send(self, result: Result<DetectionResult>) {
        let delivered = match self {
            ReplyTo::Blocking(tx) => tx.send(result).is_ok(),
            ReplyTo::Async(tx) => tx.send(result).is_ok(),
        };
        if !delivered {
            log::debug!("detection result dropped: requester went away");
        }
    }
}

#[derive(Debug)]
pub struct DetectRequest {
    pub image: Box<SkImage>,
    pub reply: ReplyTo,
}
