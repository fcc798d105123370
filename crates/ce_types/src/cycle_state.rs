// SPDX-License-Identifier: Apache-2.0

use crate::analysis::Analysis;
use crate::error::ValidationError;
use crate::experiment::ExperimentResult;
use crate::file::File;
use crate::hypothesis::Hypothesis;
use crate::processed_data::ProcessedData;
use crate::reconfiguration::Reconfiguration;
use crate::schedule::ChaosExperiment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The cycle engine's sole piece of mutable state, exclusively owned
/// by C12. Every other component receives a read-only view and
/// returns a fresh value rather than mutating this in place. Fields
/// fill in as the state machine advances past the corresponding
/// phase; a field being `None` is how the snapshot records "haven't
/// gotten there yet" rather than a sentinel value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CycleState {
    pub processed_data: Option<ProcessedData>,
    pub hypothesis: Option<Hypothesis>,
    pub experiment: Option<ChaosExperiment>,
    pub result_history: Vec<ExperimentResult>,
    pub analysis_history: Vec<Analysis>,
    pub reconfig_history: Vec<Reconfiguration>,
    pub k8s_yamls_history: Vec<Vec<File>>,
    pub mod_dir_history: Vec<PathBuf>,
    pub conducts_reconfig: bool,
    pub completes_reconfig: bool,
    pub summary: String,
}

impl CycleState {
    pub fn new() -> Self {
        CycleState {
            processed_data: None,
            hypothesis: None,
            experiment: None,
            result_history: Vec::new(),
            analysis_history: Vec::new(),
            reconfig_history: Vec::new(),
            k8s_yamls_history: Vec::new(),
            mod_dir_history: Vec::new(),
            conducts_reconfig: false,
            completes_reconfig: false,
            summary: String::new(),
        }
    }

    /// Enforces the two append-only history invariants: `|result_history|
    /// - |analysis_history|` is 1 when the latest result hasn't been
    /// analyzed yet (including the common case where it passed and
    /// never needs to be), or 0 right after that analysis (and its
    /// paired reconfiguration) has been recorded but before the next
    /// run appends a new result — the state a cycle can also end in if
    /// the retry budget is exhausted right after a failing analysis.
    /// Also enforces `|analysis_history| == |reconfig_history|`. An
    /// empty state (before the first experiment runs) vacuously
    /// satisfies both.
    pub fn check_invariants(&self) -> Result<(), ValidationError> {
        if !self.result_history.is_empty() {
            let diff = self.result_history.len() as i64 - self.analysis_history.len() as i64;
            if diff != 0 && diff != 1 {
                return Err(ValidationError::HistoryBalance {
                    results: self.result_history.len(),
                    analyses: self.analysis_history.len(),
                });
            }
        }
        if self.analysis_history.len() != self.reconfig_history.len() {
            return Err(ValidationError::AnalysisReconfigMismatch {
                analyses: self.analysis_history.len(),
                reconfigs: self.reconfig_history.len(),
            });
        }
        Ok(())
    }

    pub fn latest_result(&self) -> Option<&ExperimentResult> {
        self.result_history.last()
    }
}

impl Default for CycleState {
    fn default() -> Self {
        Self::new()
    }
}
