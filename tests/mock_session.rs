#![allow(dead_code)]

use std::sync::Mutex;

use spine_detect::Tensor;

/// Session double: returns a canned head output and remembers every input shape.
#[derive(Debug)]
pub struct MockSession {
    output: Tensor,
    seen: Mutex<Vec<Vec<usize>>>,
}

impl MockSession {
    pub fn new(output: Tensor) -> Self {
        Self {
            output,
            seen: Mutex::new(vec![]),
        }
    }

    pub fn input_shapes(&self) -> Vec<Vec<usize>> {
        self.seen.lock().unwrap().clone()
    }
}

impl spine_detect::InferenceSession for MockSession {
    fn infer(&self, input: &Tensor) -> anyhow::Result<Tensor> {
        self.seen.lock().unwrap().push(input.dims().to_vec());
        Ok(self.output.clone())
    }
}

/// Packs per-candidate rows `[cx, cy, w, h, s0..sK]` into a `[1, C, N]` buffer.
pub fn channel_major(rows: &[Vec<f32>]) -> Tensor {
    let (n, c) = (rows.len(), rows[0].len());
    let mut data = vec![0.; c * n];
    for (i, row) in rows.iter().enumerate() {
        for (ch, v) in row.iter().enumerate() {
            data[ch * n + i] = *v;
        }
    }
    Tensor::from_shape_vec(&[1, c, n], data).unwrap()
}

/// One candidate row with `score` on class `class` and nothing elsewhere.
pub fn candidate(cx: f32, cy: f32, w: f32, h: f32, class: usize, score: f32) -> Vec<f32> {
    let mut row = vec![cx, cy, w, h, 0., 0., 0., 0., 0.];
    row[4 + class] = score;
    row
}
