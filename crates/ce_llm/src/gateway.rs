// SPDX-License-Identifier: Apache-2.0

use crate::error::LlmError;
use crate::history::History;
use crate::responses::{
    CheckCompletion, DefineThreshold, DesignInspection, DraftSteadyState, K8sAppAssumption, WriteUnitTest,
};
use crate::AdjustUnitTest;
use async_trait::async_trait;
use ce_types::{Analysis, Fault, FaultInjectionPhase, FaultScenario, Reconfiguration, TimeSchedule, ValidationPhase};
use serde_json::Value;

/// The LLM Gateway: one method per operation the cycle engine can ask
/// of the model. Each method's contract is "return a value matching
/// the named schema" — streaming, retries, and backoff are the
/// implementation's concern, invisible at this seam. `&dyn LlmGateway`
/// is how every builder/compiler/improver receives it, so the trait
/// stays object-safe: no generic methods here.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Summarizes one ingested manifest in plain bullet points.
    async fn summarize_manifest(&self, ctx: &Value) -> Result<String, LlmError>;

    /// Summarizes resiliency weaknesses across the full ingested manifest set.
    async fn summarize_weaknesses(&self, ctx: &Value) -> Result<String, LlmError>;

    /// Guesses the real-world application the ingested manifests implement.
    async fn assume_app(&self, ctx: &Value) -> Result<K8sAppAssumption, LlmError>;

    /// Filters and restates user-supplied free-text CE instructions.
    async fn summarize_instructions(&self, ctx: &Value) -> Result<String, LlmError>;

    async fn draft_steady_state(&self, ctx: &Value) -> Result<DraftSteadyState, LlmError>;

    async fn design_inspection(&self, ctx: &Value) -> Result<DesignInspection, LlmError>;

    async fn rewrite_inspection(
        &self,
        ctx: &Value,
        error_history: &History<String, String>,
    ) -> Result<DesignInspection, LlmError>;

    async fn define_threshold(&self, ctx: &Value) -> Result<DefineThreshold, LlmError>;

    async fn write_unit_test(&self, ctx: &Value) -> Result<WriteUnitTest, LlmError>;

    async fn rewrite_unit_test(
        &self,
        ctx: &Value,
        error_history: &History<String, String>,
    ) -> Result<WriteUnitTest, LlmError>;

    async fn check_completion(&self, ctx: &Value) -> Result<CheckCompletion, LlmError>;

    async fn propose_fault_scenario(&self, ctx: &Value) -> Result<FaultScenario, LlmError>;

    async fn refine_fault_params(&self, ctx: &Value, fault: &Fault) -> Result<Value, LlmError>;

    async fn plan_time_schedule(&self, ctx: &Value) -> Result<TimeSchedule, LlmError>;

    async fn plan_validation_phase(&self, ctx: &Value, phase: &str) -> Result<ValidationPhase, LlmError>;

    async fn plan_fault_phase(&self, ctx: &Value) -> Result<FaultInjectionPhase, LlmError>;

    async fn summarize_plan(&self, ctx: &Value) -> Result<String, LlmError>;

    async fn analyze_result(&self, ctx: &Value) -> Result<Analysis, LlmError>;

    async fn propose_reconfiguration(&self, ctx: &Value, history: &Value) -> Result<Reconfiguration, LlmError>;

    async fn debug_reconfiguration(
        &self,
        ctx: &Value,
        error_history: &History<String, String>,
    ) -> Result<Reconfiguration, LlmError>;

    async fn adjust_fault_scope(
        &self,
        ctx: &Value,
        prev: &Value,
        curr: &Value,
        fault: &Fault,
    ) -> Result<String, LlmError>;

    async fn adjust_unit_test(
        &self,
        ctx: &Value,
        prev_yamls: &Value,
        curr_yamls: &Value,
        test_code: &str,
    ) -> Result<AdjustUnitTest, LlmError>;
}
