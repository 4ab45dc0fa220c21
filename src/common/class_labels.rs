use std::fmt;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{DetectError, Result};
use crate::utils;

/// Label attached to a detection.
///
/// `Synthesized` only appears when the pipeline runs with degraded labels and the
/// decoder meets a class index the table does not cover. It prints as `Class_<n>`
/// but never compares equal to a real label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassLabel {
    Known(String),
    Synthesized(usize),
}

impl ClassLabel {
    pub fn is_synthesized(&self) -> bool {
        matches!(self, ClassLabel::Synthesized(_))
    }

    pub fn name(&self) -> std::borrow::Cow<'_, str> {
        match self {
            ClassLabel::Known(name) => std::borrow::Cow::Borrowed(name),
            ClassLabel::Synthesized(index) => std::borrow::Cow::Owned(format!("Class_{}", index)),
        }
    }
}

impl Default for ClassLabel {
    fn default() -> Self {
        ClassLabel::Synthesized(0)
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for ClassLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

/// Fixed mapping from class index to label, read-only once a pipeline is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLabelTable {
    names: Vec<String>,
}

impl Default for ClassLabelTable {
    fn default() -> Self {
        Self::vertebrae()
    }
}

impl ClassLabelTable {
    /// The five lumbar vertebrae, in model order.
    pub fn vertebrae() -> Self {
        Self::from_names(&["L1", "L2", "L3", "L4", "L5"])
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
        }
    }

    /// Reads one label per line, skipping blank lines.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let names = utils::file_to_vec(path)?
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        if names.is_empty() {
            anyhow::bail!("label file contains no labels");
        }
        Ok(Self { names })
    }

    /// Parses the `names` metadata string exported alongside YOLO models.
    ///
    /// Format: `{0: 'L1', 1: 'L2', 2: "L3"}`.
    pub fn from_metadata(metadata: &str) -> Result<Self> {
        let re = Regex::new(r#"(['"])([-()\w '"]+)(['"])"#)
            .map_err(|e| DetectError::InvalidConfig(e.to_string()))?;
        let mut names = vec![];
        for (_, [_, name, _]) in re.captures_iter(metadata).map(|x| x.extract()) {
            names.push(name.to_string());
        }
        if names.is_empty() {
            return Err(DetectError::InvalidConfig(format!(
                "no class names found in metadata: {metadata:?}"
            )));
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Resolves a decoded class index.
    ///
    /// Unknown indices fail unless `degraded` is set, in which case a
    /// [`ClassLabel::Synthesized`] placeholder is returned instead.
    pub fn label(&self, index: usize, degraded: bool) -> Result<ClassLabel> {
        match self.names.get(index) {
            Some(name) => Ok(ClassLabel::Known(name.clone())),
            None if degraded => Ok(ClassLabel::Synthesized(index)),
            None => Err(DetectError::UnknownClassIndex {
                index,
                known: self.names.len(),
            }),
        }
    }
}
