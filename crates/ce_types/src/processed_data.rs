// SPDX-License-Identifier: Apache-2.0

use crate::error::ValidationError;
use crate::file::File;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Immutable input snapshot for one cycle. Constructed once during
/// Preprocess and never mutated afterward; every later phase reads it
/// by reference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessedData {
    pub work_dir: PathBuf,
    pub input: String,
    pub k8s_yamls: Vec<File>,
    pub k8s_summaries: Vec<String>,
    pub k8s_weakness_summary: String,
    pub k8s_app: String,
    pub ce_instructions: Option<String>,
}

impl ProcessedData {
    /// Enforces `|k8s_yamls| == |k8s_summaries|` with each summary
    /// corresponding positionally to its yaml.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.k8s_yamls.len() != self.k8s_summaries.len() {
            return Err(ValidationError::YamlSummaryMismatch {
                yamls: self.k8s_yamls.len(),
                summaries: self.k8s_summaries.len(),
            });
        }
        Ok(())
    }
}
