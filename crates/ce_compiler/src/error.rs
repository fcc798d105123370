// SPDX-License-Identifier: Apache-2.0

use ce_schedule::ScheduleError;
use ce_templates::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unit test '{0}' has no matching steady state to bind its unit_test file from")]
    UnknownSteadyState(String),

    #[error("fault injection task references unknown fault kind '{0}'")]
    UnknownFaultKind(String),

    #[error("fault injection task '{kind}' (id {name_id}) has no matching entry in the proposed fault scenario")]
    UnknownFault { kind: String, name_id: u32 },

    #[error("failed to compose a phase's workflow tree: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("failed to render a workflow template: {0}")]
    Render(#[from] TemplateError),

    #[error("failed to serialize fault parameters to YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
