// SPDX-License-Identifier: Apache-2.0

use crate::error::BuildError;
use crate::manifest::{resource_name, standalone_manifest};
use crate::schema::schema_for_kind;
use ce_cluster::ClusterAdapter;
use ce_llm::{LlmGateway, RetryPolicy};
use ce_store::LocalFileStore;
use ce_types::{Fault, FaultKind, FaultScenario, RunContext, SteadyState};
use serde_json::json;

const DEFAULT_MAX_RETRIES: u32 = 3;

/// Proposes a fault sequence from the oracle, then refines and
/// validates each fault's parameters independently: a wave's faults
/// are logically simultaneous but validated one at a time, since
/// `dry_run_apply` has no batched form.
pub struct FaultScenarioBuilder<'a> {
    llm: &'a dyn LlmGateway,
    cluster: &'a dyn ClusterAdapter,
    store: &'a LocalFileStore,
    max_retries: u32,
}

impl<'a> FaultScenarioBuilder<'a> {
    pub fn new(llm: &'a dyn LlmGateway, cluster: &'a dyn ClusterAdapter, store: &'a LocalFileStore) -> Self {
        FaultScenarioBuilder { llm, cluster, store, max_retries: DEFAULT_MAX_RETRIES }
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub async fn build(&self, steady_states: &[SteadyState], ctx: &RunContext) -> Result<FaultScenario, BuildError> {
        let propose_ctx = json!({
            "steady_states": steady_states.iter().map(|s| json!({
                "name": s.name,
                "description": s.description,
                "threshold": s.threshold,
            })).collect::<Vec<_>>(),
            "fault_kinds": FaultKind::ALL.iter().map(FaultKind::name).collect::<Vec<_>>(),
        });
        let mut scenario = self.llm.propose_fault_scenario(&propose_ctx).await?;

        for wave in scenario.faults.iter_mut() {
            for fault in wave.iter_mut() {
                self.refine_and_validate(fault, ctx).await?;
            }
        }

        Ok(scenario)
    }

    async fn refine_and_validate(&self, fault: &mut Fault, ctx: &RunContext) -> Result<(), BuildError> {
        let mut retry: RetryPolicy<String, String> = RetryPolicy::new(self.max_retries);

        loop {
            let manifest = standalone_manifest(fault, &ctx.namespace)?;
            let relpath = format!("fault_{}.yaml", resource_name(fault));
            self.store.write_text(&relpath, manifest).await?;
            let absolute = ctx.work_dir.join(&relpath);

            let (ok, message) = self
                .cluster
                .dry_run_apply(&absolute)
                .await
                .map_err(|e| BuildError::Cluster(e.to_string()))?;

            if ok {
                return Ok(());
            }

            if retry.exhausted() {
                return Err(BuildError::ParamRetriesExhausted {
                    kind: fault.name.name().to_string(),
                    name_id: fault.name_id,
                    attempts: retry.attempts(),
                    last_error: message,
                });
            }
            retry.record_failure(fault.params.to_string(), message.clone());

            let refine_ctx = json!({
                "namespace": ctx.namespace,
                "schema": schema_for_kind(fault.name),
                "dry_run_error": message,
            });
            fault.params = self.llm.refine_fault_params(&refine_ctx, fault).await?;
        }
    }
}
