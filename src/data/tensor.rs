use ndarray::{Array, IxDyn};

use crate::error::Result;

/// Flat `f32` buffer plus shape, crossing the inference boundary in both directions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tensor(pub Array<f32, IxDyn>);

impl From<Array<f32, IxDyn>> for Tensor {
    fn from(x: Array<f32, IxDyn>) -> Self {
        Self(x)
    }
}

impl std::ops::Deref for Tensor {
    type Target = Array<f32, IxDyn>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Tensor {
    /// Wraps a row-major buffer; fails when `xs.len()` is not the product of `shape`.
    pub fn from_shape_vec(shape: &[usize], xs: Vec<f32>) -> Result<Self> {
        Ok(Self::from(Array::from_shape_vec(IxDyn(shape), xs)?))
    }

    pub fn dims(&self) -> &[usize] {
        self.0.shape()
    }

    pub fn into_inner(self) -> Array<f32, IxDyn> {
        self.0
    }
}
