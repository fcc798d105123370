// SPDX-License-Identifier: Apache-2.0

use ce_llm::LlmError;
use ce_store::StoreError;
use ce_templates::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImproveError {
    #[error("LLM gateway call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("failed to persist a generated artifact: {0}")]
    Store(#[from] StoreError),

    #[error("failed to render the deploy bundle: {0}")]
    Render(#[from] TemplateError),

    #[error("reconfiguration mod for '{fname}' has type Create/Replace but carries no code")]
    MalformedMod { fname: String },

    #[error("deploy retries exhausted after {attempts} attempt(s): {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}
