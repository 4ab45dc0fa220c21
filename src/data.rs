mod detection_result;
mod tensor;
mod time_calc;
pub mod send_channels;

pub use detection_result::{DetectionReport, DetectionResult, ImageInfo};
pub use send_channels::{DetectRequest, ReplyTo};
pub use tensor::Tensor;
pub use time_calc::{StageTimings, TimeCalc};
