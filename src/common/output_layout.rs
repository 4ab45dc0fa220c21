use serde::{Deserialize, Serialize};

/// Memory layout of the detection head's output tensor.
///
/// Both layouts carry `cx, cy, w, h` in input-pixel units in the first four
/// channels followed by one score per class. Only the axis order differs.
/// The layout is declared up front and checked against the tensor shape; it is
/// never guessed from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLayout {
    /// `[1, C, N]`: value for channel `c` of candidate `i` sits at `c * N + i`.
    #[default]
    ChannelMajor,
    /// `[1, N, C]`: each candidate's channels are contiguous, at `i * C + c`.
    CandidateMajor,
}

impl OutputLayout {
    /// Extracts `(channels, candidates)` from a rank-3 shape.
    pub fn channels_and_candidates(&self, shape: &[usize]) -> Option<(usize, usize)> {
        match (self, shape) {
            (OutputLayout::ChannelMajor, [1, c, n]) => Some((*c, *n)),
            (OutputLayout::CandidateMajor, [1, n, c]) => Some((*c, *n)),
            _ => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            OutputLayout::ChannelMajor => "[1, 4 + classes, candidates]",
            OutputLayout::CandidateMajor => "[1, candidates, 4 + classes]",
        }
    }
}
