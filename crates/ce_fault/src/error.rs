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

    #[error("failed to render a fault manifest: {0}")]
    Render(#[from] serde_yaml::Error),

    #[error("cluster error while dry-running a fault manifest: {0}")]
    Cluster(String),

    #[error("fault '{kind}' (id {name_id}) failed dry-run validation after {attempts} attempt(s): {last_error}")]
    ParamRetriesExhausted { kind: String, name_id: u32, attempts: u32, last_error: String },
}
