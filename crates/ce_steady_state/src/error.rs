// SPDX-License-Identifier: Apache-2.0

use ce_llm::LlmError;
use ce_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("LLM gateway call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("failed to persist a generated artifact: {0}")]
    Store(#[from] StoreError),

    #[error("inspection script '{name}' kept failing after {attempts} attempt(s): {last_error}")]
    InspectionRetriesExhausted { name: String, attempts: u32, last_error: String },

    #[error("unit test for steady state '{name}' kept failing after {attempts} attempt(s): {last_error}")]
    UnitTestRetriesExhausted { name: String, attempts: u32, last_error: String },

    #[error("completion check rejected the first draft before any steady state was accepted")]
    NoSteadyStateAccepted,

    #[error("cluster error while running an inspection or unit test: {0}")]
    Inspection(String),
}
