// SPDX-License-Identifier: Apache-2.0

use crate::error::LlmError;
use serde::de::DeserializeOwned;

/// Accumulates streamed response chunks and decodes the final object
/// once the stream ends. Per the gateway's contract, streaming is only
/// structurally relevant — intermediate partial chunks are never
/// inspected for meaning, only concatenated.
#[derive(Default)]
pub struct StreamingJsonDecoder {
    buffer: String,
}

impl StreamingJsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);
    }

    pub fn finalize<T: DeserializeOwned>(&self, operation: &str) -> Result<T, LlmError> {
        serde_json::from_str(&self.buffer).map_err(|e| LlmError::SchemaViolation {
            operation: operation.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, PartialEq, Debug)]
    struct Sample {
        thought: String,
    }

    #[test]
    fn assembles_chunks_before_decoding() {
        let mut decoder = StreamingJsonDecoder::new();
        decoder.feed(r#"{"thou"#);
        decoder.feed(r#"ght": "ready"}"#);
        let decoded: Sample = decoder.finalize("draft_steady_state").unwrap();
        assert_eq!(decoded, Sample { thought: "ready".to_string() });
    }

    #[test]
    fn malformed_final_buffer_is_a_schema_violation() {
        let mut decoder = StreamingJsonDecoder::new();
        decoder.feed("not json");
        let result: Result<Sample, LlmError> = decoder.finalize("draft_steady_state");
        assert!(matches!(result, Err(LlmError::SchemaViolation { .. })));
    }
}
