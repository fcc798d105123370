// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Violations of the data-model invariants named in the data model spec
/// (e.g. positional correspondence between yamls and summaries, or the
/// history-length balance on `CycleState`). These are contract
/// violations, not user-facing validation failures, and are always
/// fatal where they're checked.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("k8s_yamls has {yamls} entries but k8s_summaries has {summaries}; they must correspond positionally")]
    YamlSummaryMismatch { yamls: usize, summaries: usize },

    #[error("fault '{fault_name}' scope selector '{selector}' does not match any resource in the processed manifest bundle")]
    UnboundFaultScope { fault_name: String, selector: String },

    #[error("result_history has {results} entries and analysis_history has {analyses}; expected a difference of 0 or 1")]
    HistoryBalance { results: usize, analyses: usize },

    #[error("analysis_history has {analyses} entries but reconfig_history has {reconfigs}; they must be equal")]
    AnalysisReconfigMismatch { analyses: usize, reconfigs: usize },

    #[error("steady state name '{0}' is not unique within the hypothesis")]
    DuplicateSteadyStateName(String),
}
