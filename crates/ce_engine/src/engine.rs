// SPDX-License-Identifier: Apache-2.0

use crate::error::EngineError;
use crate::types::{CycleOutput, CyclePhase, EngineInput};
use ce_cluster::ClusterAdapter;
use ce_compiler::ExperimentCompiler;
use ce_fault::FaultScenarioBuilder;
use ce_improver::Improver;
use ce_inspection::InspectionRunner;
use ce_llm::LlmGateway;
use ce_runner::ExperimentRunner;
use ce_steady_state::SteadyStateBuilder;
use ce_store::LocalFileStore;
use ce_types::{ChaosExperiment, CycleState, ExperimentPlan, File, Hypothesis, Inspection, ProcessedData, RunContext, ToolType};
use serde_json::{json, Value};
use std::path::PathBuf;

const WAIT_UNTIL_READY_TIMEOUT_SECS: u64 = 120;

/// Owns the one piece of mutable state the cycle carries and drives
/// it through Preprocess -> Hypothesis -> Plan -> Run, and on a
/// failing experiment, Analyze -> Improve -> Replan -> Run, bounded by
/// `EngineInput::max_reconfig_attempts`. Every sub-component it calls
/// receives a read-only view and returns a fresh value; `CycleEngine`
/// is the only place a `CycleState` gets mutated.
pub struct CycleEngine<'a> {
    llm: &'a dyn LlmGateway,
    cluster: &'a dyn ClusterAdapter,
}

impl<'a> CycleEngine<'a> {
    pub fn new(llm: &'a dyn LlmGateway, cluster: &'a dyn ClusterAdapter) -> Self {
        CycleEngine { llm, cluster }
    }

    /// Runs one full cycle to completion or failure. The returned
    /// `CycleOutput` is always populated with whatever phase history
    /// and state the cycle accumulated, even on the `Err` arm, so a
    /// caller can report how far the run got before it gave up.
    pub async fn run(&self, input: EngineInput) -> Result<CycleOutput, (CycleOutput, EngineError)> {
        let ctx = RunContext::new(input.kube_context.clone(), input.namespace.clone(), input.work_dir.clone());
        let store = LocalFileStore::new(&ctx.work_dir);
        let mut state = CycleState::new();
        let mut out = CycleOutput::new(state.clone());

        macro_rules! fail {
            ($e:expr) => {{
                let err = EngineError::from($e);
                out.state = state;
                out.error = Some(err.to_string());
                snapshot(&store, &out).await;
                return Err((out, err));
            }};
        }

        let data = match self.preprocess(&input, &ctx, &store).await {
            Ok(d) => d,
            Err(e) => fail!(e),
        };
        out.log(CyclePhase::Preprocess, format!("ingested {} manifest(s); guessed app: {}", data.k8s_yamls.len(), data.k8s_app));
        state.processed_data = Some(data.clone());
        out.state = state.clone();
        snapshot(&store, &out).await;

        let mut hypothesis = match self.build_hypothesis(&data, &ctx, input.max_num_steady_states).await {
            Ok(h) => h,
            Err(e) => fail!(e),
        };
        out.log(CyclePhase::Hypothesis, format!("{} steady state(s), fault event: {}", hypothesis.steady_states.len(), hypothesis.fault.event));
        state.hypothesis = Some(hypothesis.clone());
        out.state = state.clone();
        snapshot(&store, &out).await;

        let mut plan = match self.plan(&hypothesis, &data, &ctx).await {
            Ok(p) => p,
            Err(e) => fail!(e),
        };
        out.log(CyclePhase::Plan, plan.summary.clone());
        out.state = state.clone();
        snapshot(&store, &out).await;

        let compiler = ExperimentCompiler::new();
        let mut experiment = match compiler.compile(&hypothesis, &plan, &ctx) {
            Ok(e) => e,
            Err(e) => fail!(EngineError::from(e)),
        };
        state.experiment = Some(experiment.clone());

        let runner = ExperimentRunner::new();
        let mut current_yamls = data.k8s_yamls.clone();
        let mut current_mod_dir = PathBuf::from("mod_dir/mod_0");
        state.k8s_yamls_history.push(current_yamls.clone());
        state.mod_dir_history.push(current_mod_dir.clone());

        loop {
            let result = match runner.run(&experiment, self.cluster, &ctx).await {
                Ok(r) => r,
                Err(e) => fail!(EngineError::from(e)),
            };
            state.result_history.push(result.clone());
            if let Err(e) = state.check_invariants() {
                fail!(EngineError::from(e));
            }
            out.log(CyclePhase::Run, format!("{}/{} task(s) passed", result.pod_statuses.values().filter(|s| s.passed()).count(), result.pod_statuses.len()));
            out.state = state.clone();
            snapshot(&store, &out).await;

            if result.all_passed() {
                state.summary = format!("steady states held through the full fault scenario after {} reconfiguration(s)", state.reconfig_history.len());
                out.log(CyclePhase::Postprocess, state.summary.clone());
                out.resolved = true;
                out.state = state;
                snapshot(&store, &out).await;
                return Ok(out);
            }

            if state.reconfig_history.len() as u32 >= input.max_reconfig_attempts {
                fail!(EngineError::BudgetExceeded(format!(
                    "exhausted {} reconfiguration attempt(s) without passing",
                    input.max_reconfig_attempts
                )));
            }

            let analysis = match self
                .llm
                .analyze_result(&json!({
                    "hypothesis_summary": plan.summary,
                    "result": result,
                    "k8s_yamls": current_yamls.iter().map(|f| f.fname.clone()).collect::<Vec<_>>(),
                }))
                .await
            {
                Ok(a) => a,
                Err(e) => fail!(EngineError::from(e)),
            };
            out.log(CyclePhase::Analyze, analysis.report.clone());
            out.state = state.clone();
            snapshot(&store, &out).await;

            state.conducts_reconfig = true;
            let propose_ctx = json!({
                "analysis": analysis.report,
                "k8s_yamls": current_yamls.iter().map(|f| f.fname.clone()).collect::<Vec<_>>(),
                "steady_states": hypothesis.steady_states.iter().map(|s| s.name.clone()).collect::<Vec<_>>(),
            });
            let history_ctx = json!({
                "prior_reconfigurations": state.reconfig_history,
            });
            let improver = Improver::new(self.llm, self.cluster, &store);
            let prior_yamls = current_yamls.clone();
            let (reconfig, updated_yamls, mod_dir) = match improver
                .improve(&ctx, &propose_ctx, &history_ctx, &current_yamls, &current_mod_dir, state.mod_dir_history.len() as u32)
                .await
            {
                Ok(triple) => triple,
                Err(e) => fail!(EngineError::from(e)),
            };
            out.log(CyclePhase::Improve, format!("applied {} manifest mod(s)", reconfig.mod_k8s_yamls.len()));

            state.analysis_history.push(analysis);
            state.reconfig_history.push(reconfig);
            if let Err(e) = state.check_invariants() {
                fail!(EngineError::from(e));
            }
            out.state = state.clone();
            out.reconfig_attempts = state.reconfig_history.len() as u32;
            snapshot(&store, &out).await;

            current_yamls = updated_yamls;
            current_mod_dir = mod_dir;
            state.k8s_yamls_history.push(current_yamls.clone());
            state.mod_dir_history.push(current_mod_dir.clone());
            state.completes_reconfig = true;

            let (replanned_hypothesis, replanned_plan, replanned_experiment) = match self
                .replan(&hypothesis, &plan, &ctx, &compiler, &store, &prior_yamls, &current_yamls)
                .await
            {
                Ok(triple) => triple,
                Err(e) => fail!(e),
            };
            hypothesis = replanned_hypothesis;
            plan = replanned_plan;
            experiment = replanned_experiment;
            out.log(CyclePhase::Replan, format!("recompiled workflow '{}'", experiment.workflow_name));
            state.hypothesis = Some(hypothesis.clone());
            state.experiment = Some(experiment.clone());
            out.state = state.clone();
            snapshot(&store, &out).await;
        }
    }

    async fn preprocess(&self, input: &EngineInput, ctx: &RunContext, store: &LocalFileStore) -> Result<ProcessedData, EngineError> {
        // Persisted under `mod_dir/mod_0`, the same convention the
        // improver uses for every later reconfiguration, so the first
        // `Improver::improve` call can `copy_dir` it unmodified.
        let mut k8s_yamls = Vec::with_capacity(input.files.len());
        for file in &input.files {
            let content = file.content.as_text().unwrap_or_default().to_string();
            let relpath = PathBuf::from("mod_dir/mod_0").join(&file.fname);
            let persisted = store.write_text(&relpath, content).await?;
            k8s_yamls.push(persisted);
        }

        if input.is_new_deployment {
            for file in &k8s_yamls {
                let absolute = ctx.work_dir.join(&file.path);
                self.cluster.apply(&absolute, &ctx.kube_context, &ctx.namespace).await?;
            }
            self.cluster
                .wait_until_ready(&input.label_selector(), &ctx.kube_context, &ctx.namespace, WAIT_UNTIL_READY_TIMEOUT_SECS)
                .await?;
        }

        let mut k8s_summaries = Vec::with_capacity(k8s_yamls.len());
        for file in &k8s_yamls {
            let summary = self
                .llm
                .summarize_manifest(&json!({ "fname": file.fname, "content": file.content.as_text().unwrap_or_default() }))
                .await?;
            k8s_summaries.push(summary);
        }

        let weakness_ctx = json!({
            "k8s_yamls": k8s_yamls.iter().map(|f| f.fname.clone()).collect::<Vec<_>>(),
            "k8s_summaries": k8s_summaries,
        });
        let k8s_weakness_summary = self.llm.summarize_weaknesses(&weakness_ctx).await?;

        let app_ctx = json!({
            "k8s_yamls": k8s_yamls.iter().map(|f| f.fname.clone()).collect::<Vec<_>>(),
            "k8s_summaries": k8s_summaries,
        });
        let assumption = self.llm.assume_app(&app_ctx).await?;

        let ce_instructions = match &input.ce_instructions {
            Some(raw) => {
                let instr_ctx = json!({ "raw_instructions": raw, "k8s_app": assumption.k8s_application });
                Some(self.llm.summarize_instructions(&instr_ctx).await?)
            }
            None => None,
        };

        let data = ProcessedData {
            work_dir: ctx.work_dir.clone(),
            input: input.project_name.clone(),
            k8s_yamls,
            k8s_summaries,
            k8s_weakness_summary,
            k8s_app: assumption.k8s_application,
            ce_instructions,
        };
        data.validate()?;
        Ok(data)
    }

    async fn build_hypothesis(&self, data: &ProcessedData, ctx: &RunContext, max_num_steady_states: usize) -> Result<Hypothesis, EngineError> {
        let store = LocalFileStore::new(&ctx.work_dir);
        let steady_states = SteadyStateBuilder::new(self.llm, self.cluster, &store)
            .with_max_num_steady_states(max_num_steady_states)
            .build(data, ctx)
            .await?;

        let fault = FaultScenarioBuilder::new(self.llm, self.cluster, &store).build(&steady_states, ctx).await?;

        let hypothesis = Hypothesis { steady_states, fault };
        if !hypothesis.has_unique_steady_state_ids() {
            return Err(EngineError::Internal("compiler-fed steady state ids are not unique".into()));
        }
        Ok(hypothesis)
    }

    async fn plan(&self, hypothesis: &Hypothesis, data: &ProcessedData, _ctx: &RunContext) -> Result<ExperimentPlan, EngineError> {
        let base_ctx = json!({
            "steady_states": hypothesis.steady_states.iter().map(|s| json!({
                "name": s.name,
                "description": s.description,
            })).collect::<Vec<_>>(),
            "fault_event": hypothesis.fault.event,
            "k8s_weakness_summary": data.k8s_weakness_summary,
        });

        let time_schedule = self.llm.plan_time_schedule(&base_ctx).await?;
        let pre_validation = self.llm.plan_validation_phase(&base_ctx, "pre_validation").await?;
        let fault_injection = self.llm.plan_fault_phase(&base_ctx).await?;
        let post_validation = self.llm.plan_validation_phase(&base_ctx, "post_validation").await?;
        let summary = self.llm.summarize_plan(&base_ctx).await?;

        Ok(ExperimentPlan { time_schedule, pre_validation, fault_injection, post_validation, summary })
    }

    /// Rebinds the existing hypothesis against the post-reconfiguration
    /// manifests, then recompiles. The plan's shape (which tests run,
    /// what the fault scenario looks like) doesn't change after a
    /// reconfiguration, so replanning never re-invokes the planning
    /// LLM calls in `plan` — only each fault's scope and each steady
    /// state's unit test are adjusted against the manifests that moved,
    /// and the compiler's name/deadline bindings and rendered workflow
    /// follow from that.
    async fn replan(
        &self,
        hypothesis: &Hypothesis,
        plan: &ExperimentPlan,
        ctx: &RunContext,
        compiler: &ExperimentCompiler,
        store: &LocalFileStore,
        prev_yamls: &[File],
        curr_yamls: &[File],
    ) -> Result<(Hypothesis, ExperimentPlan, ChaosExperiment), EngineError> {
        let mut hypothesis = hypothesis.clone();
        let prev_json = json!(prev_yamls);
        let curr_json = json!(curr_yamls);

        for wave in hypothesis.fault.faults.iter_mut() {
            for fault in wave.iter_mut() {
                let fault_ctx = json!({ "event": hypothesis.fault.event });
                let scope = self.llm.adjust_fault_scope(&fault_ctx, &prev_json, &curr_json, fault).await?;
                let selector: Value = serde_json::from_str(&scope).map_err(|e| {
                    EngineError::SchemaFail(format!("adjust_fault_scope returned a non-JSON selector: {e}"))
                })?;
                if let Value::Object(ref mut params) = fault.params {
                    params.insert("selector".to_string(), selector);
                }
            }
        }

        let inspection_runner = InspectionRunner::new(self.cluster, store);
        for steady_state in hypothesis.steady_states.iter_mut() {
            let test_code = steady_state.unit_test.content.as_text().unwrap_or_default();
            let unit_test_ctx = json!({ "steady_state": steady_state.name });
            let adjusted = self.llm.adjust_unit_test(&unit_test_ctx, &prev_json, &curr_json, test_code).await?;

            let Some(code) = adjusted.code else { continue };
            let file = store.write_text(&steady_state.unit_test.path, code).await?;
            let inspection = Inspection::new(ToolType::ProbeScript, steady_state.inspection.duration.clone(), file.clone());
            match inspection_runner.run(&inspection, ctx).await {
                Ok((0, _)) => steady_state.unit_test = file,
                Ok((_, logs)) => {
                    return Err(EngineError::ValidationFail(format!(
                        "adjusted unit test for steady state '{}' failed pre-fault re-validation: {logs}",
                        steady_state.name
                    )))
                }
                Err(e) => return Err(EngineError::ValidationFail(e.to_string())),
            }
        }

        let experiment = compiler.compile(&hypothesis, plan, ctx)?;
        let experiment_plan = experiment.plan.clone();
        Ok((hypothesis, experiment_plan, experiment))
    }
}

/// Best-effort persistence of the cycle's progress so far. A failed
/// snapshot write never aborts the cycle itself — the in-memory state
/// it would have recorded is still returned to the caller either way.
async fn snapshot(store: &LocalFileStore, out: &CycleOutput) {
    if let Err(e) = store.snapshot(out).await {
        tracing::warn!(error = %e, "failed to persist cycle snapshot");
    }
}
