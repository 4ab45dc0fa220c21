use crate::data::Tensor;

/// The model runtime behind the pipeline.
///
/// Given the `[1, 3, S, S]` input it returns the raw head output. Sessions are
/// constructed by the caller and handed to a [`Pipeline`](crate::Pipeline);
/// there is no process-wide session.
pub trait InferenceSession: Send + Sync {
    fn infer(&self, input: &Tensor) -> anyhow::Result<Tensor>;
}

impl<F> InferenceSession for F
where
    F: Fn(&Tensor) -> anyhow::Result<Tensor> + Send + Sync,
{
    fn infer(&self, input: &Tensor) -> anyhow::Result<Tensor> {
        self(input)
    }
}
