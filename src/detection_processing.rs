pub mod confidence_filter;
pub mod coordinate_mapper;
pub mod decoder;
pub mod letterbox;
pub mod nms;

pub use confidence_filter::filter_by_confidence;
pub use coordinate_mapper::{fit_display_size, CoordinateMapper, ScaleTransform};
pub use decoder::OutputDecoder;
pub use letterbox::{letterbox, LetterboxInfo};
pub use nms::{apply_nms, Nms};
