//! ONNX Runtime backed [`InferenceSession`].

use std::path::Path;

use anyhow::Result;
use ort::{
    execution_providers::{CPUExecutionProvider, ExecutionProvider},
    session::builder::{GraphOptimizationLevel, SessionBuilder},
    session::{Session, SessionInputValue},
    value::Value,
};
use parking_lot::Mutex;

use crate::common::ClassLabelTable;
use crate::data::Tensor;
use crate::detection_runners::InferenceSession;

const CROSS_MARK: &str = "❌";

#[derive(Debug)]
pub struct OrtSession {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OrtSession {
    /// Loads `model_path` on the CPU execution provider.
    ///
    /// `ort_lib_path` points at the ONNX Runtime shared library; without it the
    /// `ORT_DYLIB_PATH` environment variable is used.
    pub fn new<P: AsRef<Path>>(model_path: P, ort_lib_path: Option<&str>) -> Result<Self> {
        if let Some(lib) = ort_lib_path {
            if let Err(e) = ort::init_from(lib).commit() {
                anyhow::bail!("Failed to commit ORT: {:?}", e);
            }
        }

        let mut builder = Session::builder()?;
        Self::build_cpu(&mut builder)?;
        let session = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())?;

        let input_name = match session.inputs.first() {
            Some(input) => input.name.to_string(),
            None => anyhow::bail!("model declares no inputs"),
        };
        let output_name = match session.outputs.first() {
            Some(output) => output.name.to_string(),
            None => anyhow::bail!("model declares no outputs"),
        };

        log::info!(
            "Backend: ONNXRuntime | Model: {} | Input: {} | Output: {}",
            model_path.as_ref().display(),
            input_name,
            output_name,
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    fn build_cpu(builder: &mut SessionBuilder) -> Result<()> {
        let ep = CPUExecutionProvider::default();
        if ep.is_available()? {
            match ep.register(builder) {
                Ok(_) => {}
                Err(err) => anyhow::bail!("{CROSS_MARK} CPU initialization failed: {:?}", err),
            }
            Ok(())
        } else {
            anyhow::bail!("{CROSS_MARK} CPU execution provider not available")
        }
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Class names from the model's `names` metadata, when present.
    pub fn class_labels(&self) -> Option<ClassLabelTable> {
        let session = self.session.lock();
        let names = match session.metadata() {
            Err(_) => None,
            Ok(metadata) => metadata.custom("names").unwrap_or_default(),
        }?;
        ClassLabelTable::from_metadata(&names).ok()
    }
}

impl InferenceSession for OrtSession {
    fn infer(&self, input: &Tensor) -> Result<Tensor> {
        let value = Value::from_array(input.0.clone())?.into_dyn();
        let xs = vec![SessionInputValue::from(value)];

        let mut session = self.session.lock();
        let outputs = session.run(&xs[..])?;
        let y = outputs[self.output_name.as_str()].try_extract_array::<f32>()?;
        Ok(Tensor::from(y.to_owned()))
    }
}
