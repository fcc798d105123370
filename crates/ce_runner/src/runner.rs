// SPDX-License-Identifier: Apache-2.0

use crate::error::RunError;
use ce_cluster::ClusterAdapter;
use ce_schedule::limit_string_length;
use ce_store::LocalFileStore;
use ce_types::{ChaosExperiment, ExperimentResult, RunContext, TaskStatus};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

const DEFAULT_MAX_LOG_LENGTH: usize = 3000;

/// Applies one compiled workflow, waits for it to finish, and reports
/// per-task pod status. Owns no cluster state across calls: every
/// `run` resets, applies, waits, and collects within one invocation.
pub struct ExperimentRunner {
    check_interval: Duration,
    deadline_margin: Duration,
}

impl Default for ExperimentRunner {
    fn default() -> Self {
        ExperimentRunner {
            check_interval: Duration::from_secs(5),
            deadline_margin: Duration::from_secs(300),
        }
    }
}

impl ExperimentRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    pub fn with_deadline_margin(mut self, margin: Duration) -> Self {
        self.deadline_margin = margin;
        self
    }

    pub async fn run(
        &self,
        experiment: &ChaosExperiment,
        cluster: &dyn ClusterAdapter,
        ctx: &RunContext,
    ) -> Result<ExperimentResult, RunError> {
        let label = format!("chaos-mesh.org/workflow={}", experiment.workflow_name);

        // Best-effort reset: a previous run of the same workflow name
        // (or a stale one left behind by a crashed cycle) must not
        // interfere with this apply.
        let _ = cluster
            .delete_by_namespace(&["workflow", "workflownode", "pod"], &ctx.namespace, &ctx.kube_context)
            .await;

        let store = LocalFileStore::new(&ctx.work_dir);
        let content = experiment.workflow.content.as_text().unwrap_or_default();
        store.write_text(&experiment.workflow.path, content).await?;
        let absolute_path = ctx.work_dir.join(&experiment.workflow.path);

        cluster.apply(&absolute_path, &ctx.kube_context, &ctx.namespace).await?;

        self.wait_for_completion(&label, cluster, ctx, experiment.plan.time_schedule.total).await;

        self.collect_results(experiment, &label, cluster, ctx).await
    }

    async fn wait_for_completion(
        &self,
        label: &str,
        cluster: &dyn ClusterAdapter,
        ctx: &RunContext,
        total_seconds: u64,
    ) {
        let deadline = Instant::now() + Duration::from_secs(total_seconds) + self.deadline_margin;
        loop {
            match cluster.get_entry_workflow_node(label, &ctx.kube_context, &ctx.namespace).await {
                Ok(node) if node.is_accomplished() => return,
                Ok(_) => {}
                Err(error) => tracing::debug!(%error, "entry workflow node not visible yet"),
            }
            if Instant::now() >= deadline {
                tracing::warn!(%label, "workflow did not reach Accomplished before the deadline");
                return;
            }
            tokio::time::sleep(self.check_interval).await;
        }
    }

    /// Collects the terminal status of every unit-test task in the
    /// plan. Fault-injection tasks themselves are intentionally
    /// excluded — they carry no pass/fail assertion, matching the
    /// three `*-unittest-` prefixes the original converter scans for.
    async fn collect_results(
        &self,
        experiment: &ChaosExperiment,
        label: &str,
        cluster: &dyn ClusterAdapter,
        ctx: &RunContext,
    ) -> Result<ExperimentResult, RunError> {
        let task_names: Vec<&str> = experiment
            .plan
            .pre_validation
            .unit_tests
            .iter()
            .chain(experiment.plan.fault_injection.unit_tests.iter())
            .chain(experiment.plan.post_validation.unit_tests.iter())
            .map(|t| t.workflow_name.as_str())
            .collect();

        let pod_names = cluster.list_pod_names(label, &ctx.kube_context, &ctx.namespace).await?;

        let mut missing = Vec::new();
        let mut pod_statuses = BTreeMap::new();
        for task_name in task_names {
            let prefix = format!("{task_name}-");
            match pod_names.iter().find(|n| n.starts_with(prefix.as_str())) {
                Some(pod_name) => {
                    let status = self.pod_status(pod_name, cluster, ctx).await?;
                    pod_statuses.insert(task_name.to_string(), status);
                }
                None => missing.push(task_name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(RunError::WorkflowDeadlineExceeded { missing });
        }

        Ok(ExperimentResult { pod_statuses })
    }

    async fn pod_status(
        &self,
        pod_name: &str,
        cluster: &dyn ClusterAdapter,
        ctx: &RunContext,
    ) -> Result<TaskStatus, RunError> {
        let status = cluster.get_pod(pod_name, &ctx.kube_context, &ctx.namespace).await?;
        let exit_code = status
            .terminated_exit_code()?
            .ok_or_else(|| RunError::PodNotTerminated(pod_name.to_string()))?;
        let logs = cluster.get_pod_logs(pod_name, &ctx.kube_context, &ctx.namespace).await?;
        Ok(TaskStatus { exit_code, logs: limit_string_length(&logs, DEFAULT_MAX_LOG_LENGTH, "...") })
    }
}
