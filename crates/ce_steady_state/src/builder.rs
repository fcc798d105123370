// SPDX-License-Identifier: Apache-2.0

use crate::error::BuildError;
use ce_cluster::ClusterAdapter;
use ce_inspection::InspectionRunner;
use ce_llm::{History, LlmGateway, RetryPolicy};
use ce_schedule::sanitize_k8s_name;
use ce_store::LocalFileStore;
use ce_types::{Inspection, ProcessedData, RunContext, SteadyState, ToolType};
use serde_json::json;

const DEFAULT_MAX_NUM_STEADY_STATES: usize = 2;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Drafts and validates steady states one at a time, delegating script
/// execution to `ce_inspection` and accumulating `(output, error)`
/// pairs across retries so each re-prompt carries what already failed.
pub struct SteadyStateBuilder<'a> {
    llm: &'a dyn LlmGateway,
    cluster: &'a dyn ClusterAdapter,
    store: &'a LocalFileStore,
    max_num_steady_states: usize,
    max_retries: u32,
}

impl<'a> SteadyStateBuilder<'a> {
    pub fn new(llm: &'a dyn LlmGateway, cluster: &'a dyn ClusterAdapter, store: &'a LocalFileStore) -> Self {
        SteadyStateBuilder {
            llm,
            cluster,
            store,
            max_num_steady_states: DEFAULT_MAX_NUM_STEADY_STATES,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_num_steady_states(mut self, max: usize) -> Self {
        self.max_num_steady_states = max;
        self
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub async fn build(
        &self,
        data: &ProcessedData,
        ctx: &RunContext,
    ) -> Result<Vec<SteadyState>, BuildError> {
        let mut steady_states: Vec<SteadyState> = Vec::new();
        let mut prev_check_thought = String::new();
        let inspection_runner = InspectionRunner::new(self.cluster, self.store);

        while steady_states.len() < self.max_num_steady_states {
            let base_ctx = self.base_context(data, &steady_states, &prev_check_thought);

            // 1. draft a candidate steady state
            let draft = self.llm.draft_steady_state(&base_ctx).await?;

            // 2. inspect the current value, retrying on a failed run
            let inspection = self
                .inspect_current_state(&base_ctx, &draft.name, ctx, &inspection_runner)
                .await?;

            // 3. define a threshold against the observed value
            let threshold_ctx = {
                let mut v = base_ctx.clone();
                merge(&mut v, "inspection_result", inspection.result.clone());
                v
            };
            let threshold = self.llm.define_threshold(&threshold_ctx).await?.threshold;

            // 4. synthesize and validate a unit test
            let unit_test = self
                .write_and_validate_unit_test(&threshold_ctx, &draft.name, &threshold, ctx, &inspection_runner)
                .await?;

            let id = format!("{}", steady_states.len());
            steady_states.push(SteadyState {
                id,
                name: draft.name.clone(),
                description: draft.thought.clone(),
                inspection,
                threshold,
                unit_test,
            });

            // 5. completion check
            let completion_ctx = self.base_context(data, &steady_states, &prev_check_thought);
            let completion = self.llm.check_completion(&completion_ctx).await?;
            prev_check_thought = completion.thought;
            if !completion.requires_addition {
                break;
            }
        }

        if steady_states.is_empty() {
            return Err(BuildError::NoSteadyStateAccepted);
        }
        Ok(steady_states)
    }

    fn base_context(&self, data: &ProcessedData, predefined: &[SteadyState], prev_check_thought: &str) -> serde_json::Value {
        json!({
            "k8s_yamls": data.k8s_yamls.iter().map(|f| f.fname.clone()).collect::<Vec<_>>(),
            "k8s_weakness_summary": data.k8s_weakness_summary,
            "ce_instructions": data.ce_instructions,
            "predefined_steady_states": predefined.iter().map(|s| &s.name).collect::<Vec<_>>(),
            "prev_check_thought": prev_check_thought,
        })
    }

    async fn inspect_current_state(
        &self,
        base_ctx: &serde_json::Value,
        steady_state_name: &str,
        ctx: &RunContext,
        runner: &InspectionRunner<'_>,
    ) -> Result<Inspection, BuildError> {
        let mut retry: RetryPolicy<String, String> = RetryPolicy::new(self.max_retries);
        let mut design = self.llm.design_inspection(base_ctx).await?;

        loop {
            let fname = format!(
                "{}_{}{}",
                tool_prefix(design.tool_type),
                sanitize_k8s_name(steady_state_name),
                tool_extension(design.tool_type)
            );
            let file = self.store.write_text(&fname, design.tool.script.clone()).await?;
            let mut inspection = Inspection::new(design.tool_type, design.tool.duration.clone(), file);

            let outcome = runner.run(&inspection, ctx).await;
            match outcome {
                Ok((0, logs)) => {
                    inspection = inspection.with_result(logs);
                    return Ok(inspection);
                }
                Ok((_, logs)) => {
                    if retry.exhausted() {
                        return Err(BuildError::InspectionRetriesExhausted {
                            name: steady_state_name.to_string(),
                            attempts: retry.attempts(),
                            last_error: logs,
                        });
                    }
                    retry.record_failure(design.tool.script.clone(), logs.clone());
                    design = self
                        .llm
                        .rewrite_inspection(base_ctx, history_as_strings(retry.history()))
                        .await?;
                }
                Err(e) => return Err(BuildError::Inspection(e.to_string())),
            }
        }
    }

    async fn write_and_validate_unit_test(
        &self,
        ctx_with_threshold: &serde_json::Value,
        steady_state_name: &str,
        threshold: &ce_types::Threshold,
        run_ctx: &RunContext,
        runner: &InspectionRunner<'_>,
    ) -> Result<ce_types::File, BuildError> {
        let mut retry: RetryPolicy<String, String> = RetryPolicy::new(self.max_retries);
        let unit_test_ctx = {
            let mut v = ctx_with_threshold.clone();
            merge(&mut v, "threshold_value", Some(threshold.value.clone()));
            merge(&mut v, "threshold_rationale", Some(threshold.rationale.clone()));
            v
        };
        let mut written = self.llm.write_unit_test(&unit_test_ctx).await?;

        loop {
            let fname = format!("unittest_{}.py", sanitize_k8s_name(steady_state_name));
            let file = self.store.write_text(&fname, written.code.clone()).await?;
            let inspection = Inspection::new(ToolType::ProbeScript, "30s", file.clone());

            match runner.run(&inspection, run_ctx).await {
                Ok((0, _)) => return Ok(file),
                Ok((_, logs)) => {
                    if retry.exhausted() {
                        return Err(BuildError::UnitTestRetriesExhausted {
                            name: steady_state_name.to_string(),
                            attempts: retry.attempts(),
                            last_error: logs,
                        });
                    }
                    retry.record_failure(written.code.clone(), logs.clone());
                    written = self
                        .llm
                        .rewrite_unit_test(&unit_test_ctx, history_as_strings(retry.history()))
                        .await?;
                }
                Err(e) => return Err(BuildError::Inspection(e.to_string())),
            }
        }
    }
}

fn tool_prefix(tool_type: ToolType) -> &'static str {
    match tool_type {
        ToolType::ProbeScript => "k8s",
        ToolType::LoadTest => "k6",
    }
}

fn tool_extension(tool_type: ToolType) -> &'static str {
    match tool_type {
        ToolType::ProbeScript => ".py",
        ToolType::LoadTest => ".js",
    }
}

fn merge(value: &mut serde_json::Value, key: &str, new_value: Option<String>) {
    if let serde_json::Value::Object(map) = value {
        map.insert(key.to_string(), serde_json::to_value(new_value).unwrap_or(serde_json::Value::Null));
    }
}

/// `RetryPolicy<Out, Err>`'s history is generic; the gateway's
/// `rewrite_*` methods take `&History<String, String>` specifically,
/// which is exactly what this crate's retry policies are instantiated
/// with, so this is just a type-level identity pass-through kept as a
/// named function for readability at call sites.
fn history_as_strings(history: &History<String, String>) -> &History<String, String> {
    history
}
