use crate::common::SkDetection;

/// Keeps candidates with `confidence >= threshold`, preserving decode order.
pub fn filter_by_confidence(candidates: Vec<SkDetection>, threshold: f32) -> Vec<SkDetection> {
    candidates
        .into_iter()
        .filter(|d| d.confidence >= threshold)
        .collect()
}
