// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to LLM backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("LLM backend rate-limited the request (retry-after: {retry_after_secs:?})")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("LLM backend returned status {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("LLM response did not match the expected schema for '{operation}': {message}")]
    SchemaViolation { operation: String, message: String },

    #[error("exhausted {attempts} retries against rate limiting")]
    RetriesExhausted { attempts: u32 },
}

impl LlmError {
    /// Rate limiting is the only transient failure this gateway
    /// recognizes; schema violations and hard backend errors always
    /// propagate to the caller.
    pub fn is_transient(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }
}
