// SPDX-License-Identifier: Apache-2.0

use ce_types::ValidationError;
use thiserror::Error;

/// The cycle engine's own error taxonomy. Every sub-component error is
/// reclassified into one of these on the way up, so a caller (the CLI,
/// a test) can dispatch on *policy* (retry? fail the cycle? abort the
/// process?) without knowing which of the twelve components raised it.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("transient infrastructure failure: {0}")]
    TransientInfra(String),

    #[error("validation failed: {0}")]
    ValidationFail(String),

    #[error("LLM returned a malformed response: {0}")]
    SchemaFail(String),

    #[error("retry budget exceeded: {0}")]
    BudgetExceeded(String),

    #[error("workflow ran past its deadline; missing task(s): {}", .missing.join(", "))]
    WorkflowDeadline { missing: Vec<String> },

    #[error("deploy of the reconfigured manifests failed: {0}")]
    DeployFail(String),

    #[error("cycle cancelled by external signal")]
    UserCancel,

    #[error("internal contract violation: {0}")]
    Internal(String),
}

impl From<ValidationError> for EngineError {
    fn from(e: ValidationError) -> Self {
        EngineError::Internal(e.to_string())
    }
}

impl From<ce_store::StoreError> for EngineError {
    fn from(e: ce_store::StoreError) -> Self {
        EngineError::Internal(e.to_string())
    }
}

impl From<ce_templates::TemplateError> for EngineError {
    fn from(e: ce_templates::TemplateError) -> Self {
        EngineError::Internal(e.to_string())
    }
}

impl From<ce_cluster::ClusterError> for EngineError {
    fn from(e: ce_cluster::ClusterError) -> Self {
        use ce_cluster::ClusterError;
        match e {
            ClusterError::Parse { .. } | ClusterError::MissingEntryNode(_) => EngineError::Internal(e.to_string()),
            other => EngineError::TransientInfra(other.to_string()),
        }
    }
}

impl From<ce_llm::LlmError> for EngineError {
    fn from(e: ce_llm::LlmError) -> Self {
        use ce_llm::LlmError;
        match e {
            LlmError::SchemaViolation { .. } => EngineError::SchemaFail(e.to_string()),
            LlmError::RetriesExhausted { .. } => EngineError::BudgetExceeded(e.to_string()),
            LlmError::Transport(_) | LlmError::RateLimited { .. } | LlmError::Backend { .. } => {
                EngineError::TransientInfra(e.to_string())
            }
        }
    }
}

impl From<ce_steady_state::BuildError> for EngineError {
    fn from(e: ce_steady_state::BuildError) -> Self {
        use ce_steady_state::BuildError;
        match e {
            BuildError::Llm(inner) => inner.into(),
            BuildError::Store(inner) => inner.into(),
            BuildError::Inspection(msg) => EngineError::ValidationFail(msg),
            BuildError::InspectionRetriesExhausted { .. }
            | BuildError::UnitTestRetriesExhausted { .. }
            | BuildError::NoSteadyStateAccepted => EngineError::BudgetExceeded(e.to_string()),
        }
    }
}

impl From<ce_fault::BuildError> for EngineError {
    fn from(e: ce_fault::BuildError) -> Self {
        use ce_fault::BuildError;
        match e {
            BuildError::Llm(inner) => inner.into(),
            BuildError::Store(inner) => inner.into(),
            BuildError::Render(inner) => EngineError::Internal(inner.to_string()),
            BuildError::Cluster(msg) => EngineError::TransientInfra(msg),
            BuildError::ParamRetriesExhausted { .. } => EngineError::BudgetExceeded(e.to_string()),
        }
    }
}

impl From<ce_compiler::CompileError> for EngineError {
    fn from(e: ce_compiler::CompileError) -> Self {
        EngineError::Internal(e.to_string())
    }
}

impl From<ce_runner::RunError> for EngineError {
    fn from(e: ce_runner::RunError) -> Self {
        use ce_runner::RunError;
        match e {
            RunError::WorkflowDeadlineExceeded { missing } => EngineError::WorkflowDeadline { missing },
            RunError::PodNotTerminated(_) => EngineError::ValidationFail(e.to_string()),
            RunError::Cluster(inner) => inner.into(),
            RunError::Store(inner) => inner.into(),
        }
    }
}

impl From<ce_improver::ImproveError> for EngineError {
    fn from(e: ce_improver::ImproveError) -> Self {
        use ce_improver::ImproveError;
        match e {
            ImproveError::Llm(inner) => inner.into(),
            ImproveError::Store(inner) => inner.into(),
            ImproveError::Render(inner) => EngineError::Internal(inner.to_string()),
            ImproveError::MalformedMod { fname } => EngineError::SchemaFail(format!("mod for '{fname}' carries no code")),
            ImproveError::RetriesExhausted { .. } => EngineError::BudgetExceeded(e.to_string()),
        }
    }
}
