mod inference_session;
mod pipeline;
#[cfg(feature = "ort")]
pub mod ort_detector;

pub use inference_session::InferenceSession;
pub use pipeline::Pipeline;
#[cfg(feature = "ort")]
pub use ort_detector::OrtSession;
