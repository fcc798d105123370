// SPDX-License-Identifier: Apache-2.0

use crate::backoff::backoff_with_jitter;
use crate::decoder::StreamingJsonDecoder;
use crate::error::LlmError;
use crate::gateway::LlmGateway;
use crate::history::History;
use crate::responses::{
    CheckCompletion, DefineThreshold, DesignInspection, DraftSteadyState, K8sAppAssumption, WriteUnitTest,
};
use crate::AdjustUnitTest;
use async_trait::async_trait;
use ce_types::{Analysis, Fault, FaultInjectionPhase, FaultScenario, Reconfiguration, TimeSchedule, ValidationPhase};
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_MAX_RETRIES: u32 = 5;
const DEFAULT_BASE_BACKOFF_MS: u64 = 500;
const DEFAULT_MAX_BACKOFF_SECS: u64 = 30;

/// HTTP-backed `LlmGateway`. Each public method renders a prompt
/// payload around `ctx`, posts it to the configured endpoint, and
/// decodes the response against the operation's schema — retrying on
/// rate limiting only, with full-jitter backoff.
pub struct HttpLlmGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl HttpLlmGateway {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        HttpLlmGateway {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Posts `ctx` (plus any extra fields merged in by the caller) to
    /// the completions endpoint and decodes the streamed body into
    /// `T`, retrying on `429`/backend-rate-limit responses with full
    /// jitter backoff up to `self.max_retries`.
    async fn complete_json<T>(&self, operation: &str, payload: &Value) -> Result<T, LlmError>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let schema = schema_for!(T);
        let mut attempt = 0u32;
        loop {
            let body = serde_json::json!({
                "model": self.model,
                "operation": operation,
                "context": payload,
                "response_schema": schema,
            });

            let result = self.send_once(operation, &body).await;
            match result {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    let wait = backoff_with_jitter(
                        attempt,
                        Duration::from_millis(DEFAULT_BASE_BACKOFF_MS),
                        Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
                    );
                    tracing::warn!(operation, attempt, wait_ms = wait.as_millis() as u64, "llm gateway rate-limited, backing off");
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(err) if err.is_transient() => {
                    return Err(LlmError::RetriesExhausted { attempts: attempt });
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(&self, operation: &str, body: &Value) -> Result<T, LlmError> {
        let response = self
            .client
            .post(format!("{}/v1/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(LlmError::RateLimited { retry_after_secs });
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Backend { status, body });
        }

        let mut decoder = StreamingJsonDecoder::new();
        let chunk = response.text().await?;
        decoder.feed(&chunk);
        decoder.finalize(operation)
    }
}

fn merge_context<T: Serialize>(ctx: &Value, key: &str, value: &T) -> Value {
    let mut merged = ctx.clone();
    if let Value::Object(ref mut map) = merged {
        map.insert(key.to_string(), serde_json::to_value(value).unwrap_or(Value::Null));
    }
    merged
}

fn merge_history<Out: Serialize, Err: Serialize>(ctx: &Value, history: &History<Out, Err>) -> Value {
    let entries: Vec<Value> = history
        .iter()
        .map(|(out, err)| serde_json::json!({ "output": out, "error": err }))
        .collect();
    let mut merged = ctx.clone();
    if let Value::Object(ref mut map) = merged {
        map.insert("error_history".to_string(), Value::Array(entries));
    }
    merged
}

#[async_trait]
impl LlmGateway for HttpLlmGateway {
    async fn summarize_manifest(&self, ctx: &Value) -> Result<String, LlmError> {
        self.complete_json("summarize_manifest", ctx).await
    }

    async fn summarize_weaknesses(&self, ctx: &Value) -> Result<String, LlmError> {
        self.complete_json("summarize_weaknesses", ctx).await
    }

    async fn assume_app(&self, ctx: &Value) -> Result<K8sAppAssumption, LlmError> {
        self.complete_json("assume_app", ctx).await
    }

    async fn summarize_instructions(&self, ctx: &Value) -> Result<String, LlmError> {
        self.complete_json("summarize_instructions", ctx).await
    }

    async fn draft_steady_state(&self, ctx: &Value) -> Result<DraftSteadyState, LlmError> {
        self.complete_json("draft_steady_state", ctx).await
    }

    async fn design_inspection(&self, ctx: &Value) -> Result<DesignInspection, LlmError> {
        self.complete_json("design_inspection", ctx).await
    }

    async fn rewrite_inspection(
        &self,
        ctx: &Value,
        error_history: &History<String, String>,
    ) -> Result<DesignInspection, LlmError> {
        let payload = merge_history(ctx, error_history);
        self.complete_json("rewrite_inspection", &payload).await
    }

    async fn define_threshold(&self, ctx: &Value) -> Result<DefineThreshold, LlmError> {
        self.complete_json("define_threshold", ctx).await
    }

    async fn write_unit_test(&self, ctx: &Value) -> Result<WriteUnitTest, LlmError> {
        self.complete_json("write_unit_test", ctx).await
    }

    async fn rewrite_unit_test(
        &self,
        ctx: &Value,
        error_history: &History<String, String>,
    ) -> Result<WriteUnitTest, LlmError> {
        let payload = merge_history(ctx, error_history);
        self.complete_json("rewrite_unit_test", &payload).await
    }

    async fn check_completion(&self, ctx: &Value) -> Result<CheckCompletion, LlmError> {
        self.complete_json("check_completion", ctx).await
    }

    async fn propose_fault_scenario(&self, ctx: &Value) -> Result<FaultScenario, LlmError> {
        self.complete_json("propose_fault_scenario", ctx).await
    }

    async fn refine_fault_params(&self, ctx: &Value, fault: &Fault) -> Result<Value, LlmError> {
        let payload = merge_context(ctx, "fault", fault);
        self.complete_json("refine_fault_params", &payload).await
    }

    async fn plan_time_schedule(&self, ctx: &Value) -> Result<TimeSchedule, LlmError> {
        self.complete_json("plan_time_schedule", ctx).await
    }

    async fn plan_validation_phase(&self, ctx: &Value, phase: &str) -> Result<ValidationPhase, LlmError> {
        let payload = merge_context(ctx, "phase", &phase);
        self.complete_json("plan_validation_phase", &payload).await
    }

    async fn plan_fault_phase(&self, ctx: &Value) -> Result<FaultInjectionPhase, LlmError> {
        self.complete_json("plan_fault_phase", ctx).await
    }

    async fn summarize_plan(&self, ctx: &Value) -> Result<String, LlmError> {
        self.complete_json("summarize_plan", ctx).await
    }

    async fn analyze_result(&self, ctx: &Value) -> Result<Analysis, LlmError> {
        self.complete_json("analyze_result", ctx).await
    }

    async fn propose_reconfiguration(&self, ctx: &Value, history: &Value) -> Result<Reconfiguration, LlmError> {
        let payload = merge_context(ctx, "history", history);
        self.complete_json("propose_reconfiguration", &payload).await
    }

    async fn debug_reconfiguration(
        &self,
        ctx: &Value,
        error_history: &History<String, String>,
    ) -> Result<Reconfiguration, LlmError> {
        let payload = merge_history(ctx, error_history);
        self.complete_json("debug_reconfiguration", &payload).await
    }

    async fn adjust_fault_scope(
        &self,
        ctx: &Value,
        prev: &Value,
        curr: &Value,
        fault: &Fault,
    ) -> Result<String, LlmError> {
        let mut payload = ctx.clone();
        if let Value::Object(ref mut map) = payload {
            map.insert("prev".to_string(), prev.clone());
            map.insert("curr".to_string(), curr.clone());
            map.insert("fault".to_string(), serde_json::to_value(fault).unwrap_or(Value::Null));
        }
        self.complete_json("adjust_fault_scope", &payload).await
    }

    async fn adjust_unit_test(
        &self,
        ctx: &Value,
        prev_yamls: &Value,
        curr_yamls: &Value,
        test_code: &str,
    ) -> Result<AdjustUnitTest, LlmError> {
        let mut payload = ctx.clone();
        if let Value::Object(ref mut map) = payload {
            map.insert("prev_yamls".to_string(), prev_yamls.clone());
            map.insert("curr_yamls".to_string(), curr_yamls.clone());
            map.insert("test_code".to_string(), Value::String(test_code.to_string()));
        }
        self.complete_json("adjust_unit_test", &payload).await
    }
}
