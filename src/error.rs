use thiserror::Error;

/// Failures surfaced by the detection pipeline.
///
/// Shape and label mismatches are always fatal.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    #[error("inference failed: {0:#}")]
    Inference(anyhow::Error),

    #[error("output tensor shape mismatch: expected {expected}, got {actual:?}")]
    DecodeShape { expected: String, actual: Vec<usize> },

    #[error("class index {index} has no label (table holds {known} labels)")]
    UnknownClassIndex { index: usize, known: usize },

    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    #[error("tensor assembly failed: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("resize failed: {0}")]
    Resize(String),

    #[error("detector worker is no longer running")]
    WorkerClosed,
}

pub type Result<T, E = DetectError> = std::result::Result<T, E>;
