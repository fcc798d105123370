// SPDX-License-Identifier: Apache-2.0

use ce_types::File;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything one call to [`crate::CycleEngine::run`] needs: the raw
/// manifest set to reason about, where to deploy it, and how many
/// times the outer improvement loop may retry before giving up.
#[derive(Clone, Debug)]
pub struct EngineInput {
    pub project_name: String,
    pub kube_context: String,
    pub namespace: String,
    pub work_dir: PathBuf,
    pub files: Vec<File>,
    /// Whether `files` still needs to be applied to the cluster before
    /// reasoning begins, or is already running there.
    pub is_new_deployment: bool,
    pub ce_instructions: Option<String>,
    pub max_num_steady_states: usize,
    pub max_reconfig_attempts: u32,
}

impl EngineInput {
    pub fn new(project_name: impl Into<String>, kube_context: impl Into<String>, namespace: impl Into<String>, work_dir: impl Into<PathBuf>, files: Vec<File>) -> Self {
        EngineInput {
            project_name: project_name.into(),
            kube_context: kube_context.into(),
            namespace: namespace.into(),
            work_dir: work_dir.into(),
            files,
            is_new_deployment: true,
            ce_instructions: None,
            max_num_steady_states: 2,
            max_reconfig_attempts: 3,
        }
    }

    pub fn with_ce_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.ce_instructions = Some(instructions.into());
        self
    }

    pub fn with_is_new_deployment(mut self, is_new: bool) -> Self {
        self.is_new_deployment = is_new;
        self
    }

    pub fn with_max_num_steady_states(mut self, max: usize) -> Self {
        self.max_num_steady_states = max;
        self
    }

    pub fn with_max_reconfig_attempts(mut self, max: u32) -> Self {
        self.max_reconfig_attempts = max;
        self
    }

    pub fn label_selector(&self) -> String {
        format!("project={}", self.project_name)
    }
}

/// Named stop the cycle passed through or failed at, for logging and
/// for the final report a human reads after the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CyclePhase {
    Preprocess,
    Hypothesis,
    Plan,
    Run,
    Analyze,
    Improve,
    Replan,
    Postprocess,
}

impl std::fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CyclePhase::Preprocess => "preprocess",
            CyclePhase::Hypothesis => "hypothesis",
            CyclePhase::Plan => "plan",
            CyclePhase::Run => "run",
            CyclePhase::Analyze => "analyze",
            CyclePhase::Improve => "improve",
            CyclePhase::Replan => "replan",
            CyclePhase::Postprocess => "postprocess",
        };
        f.write_str(s)
    }
}

/// One entry in the cycle's audit trail: which phase ran, and what it
/// concluded, in the order phases actually executed (a failed
/// experiment re-visits `Run` multiple times, so this is not one
/// entry per variant).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhaseLog {
    pub phase: CyclePhase,
    pub message: String,
}

impl PhaseLog {
    pub fn new(phase: CyclePhase, message: impl Into<String>) -> Self {
        PhaseLog { phase, message: message.into() }
    }
}

/// The terminal report of a cycle: the final state snapshot plus the
/// narrative of how it got there. Returned on both success and
/// failure — even a cycle that ends in [`crate::EngineError`] carries
/// whatever state and phase history it accumulated before failing, so
/// a caller can inspect how far the run got.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CycleOutput {
    pub state: ce_types::CycleState,
    pub phases: Vec<PhaseLog>,
    pub reconfig_attempts: u32,
    pub resolved: bool,
    /// Set only on the snapshot written right before a cycle gives up,
    /// so a reader of `outputs/output.json` doesn't have to guess why
    /// the run stopped where it did.
    pub error: Option<String>,
}

impl CycleOutput {
    pub fn new(state: ce_types::CycleState) -> Self {
        CycleOutput { state, phases: Vec::new(), reconfig_attempts: 0, resolved: false, error: None }
    }

    pub fn log(&mut self, phase: CyclePhase, message: impl Into<String>) {
        self.phases.push(PhaseLog::new(phase, message));
    }
}
