mod class_labels;
mod output_layout;
mod pipeline_config;
mod sk_box;
mod sk_detection;
mod sk_image;

pub use class_labels::*;
pub use output_layout::*;
pub use pipeline_config::*;
pub use sk_box::*;
pub use sk_detection::*;
pub use sk_image::*;
