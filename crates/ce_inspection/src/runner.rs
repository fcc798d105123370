// SPDX-License-Identifier: Apache-2.0

use crate::error::InspectionError;
use ce_cluster::ClusterAdapter;
use ce_schedule::{limit_string_length, sanitize_k8s_name};
use ce_store::LocalFileStore;
use ce_templates::{render, TemplateName};
use ce_types::{Inspection, RunContext, ToolType};
use std::path::Path;
use std::time::{Duration, Instant};

const DEFAULT_MAX_LOG_LENGTH: usize = 3000;
const POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs one generated probe/load-test script as a Pod and reports its
/// terminal outcome. Every run leaves the cluster exactly as it found
/// it: the pod is deleted whether the run succeeded, failed, or timed
/// out.
pub struct InspectionRunner<'a> {
    cluster: &'a dyn ClusterAdapter,
    store: &'a LocalFileStore,
}

impl<'a> InspectionRunner<'a> {
    pub fn new(cluster: &'a dyn ClusterAdapter, store: &'a LocalFileStore) -> Self {
        InspectionRunner { cluster, store }
    }

    /// Steps 1-7 of the inspection contract: derive a pod name, render
    /// and apply its manifest, wait for a terminal phase, collect
    /// exit code and logs, then delete the pod unconditionally.
    pub async fn run(&self, inspection: &Inspection, ctx: &RunContext) -> Result<(i32, String), InspectionError> {
        let base = Path::new(&inspection.script.fname)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "inspection".to_string());
        let pod_name = format!("{}-pod", sanitize_k8s_name(&base));

        let script_path = format!("/scripts/{}", inspection.script.fname);
        let script_content = inspection.script.content.as_text().unwrap_or_default();

        let manifest = match inspection.tool_type {
            ToolType::ProbeScript => render(
                TemplateName::PodProbe,
                &serde_json::json!({
                    "pod_name": pod_name,
                    "script_path": script_path,
                    "script_fname": inspection.script.fname,
                    "script_content": script_content,
                    "duration": inspection.duration,
                }),
            )?,
            ToolType::LoadTest => render(
                TemplateName::PodLoadTest,
                &serde_json::json!({
                    "pod_name": pod_name,
                    "script_path": script_path,
                    "script_fname": inspection.script.fname,
                    "script_content": script_content,
                    "duration": inspection.duration,
                }),
            )?,
        };

        let manifest_relpath = format!("{}_pod.yaml", base);
        self.store.write_text(&manifest_relpath, manifest).await?;
        let absolute_manifest = ctx.work_dir.join(&manifest_relpath);

        self.cluster
            .apply(&absolute_manifest, &ctx.kube_context, &ctx.namespace)
            .await?;

        let result = self.wait_and_collect(&pod_name, ctx).await;

        // Unconditional cleanup: the pod (and its script ConfigMap,
        // both carrying the same unique label) is removed whether the
        // run above succeeded, failed validation, or timed out.
        let _ = self
            .cluster
            .delete_by_label(&format!("ce-inspection-pod={pod_name}"), &ctx.kube_context)
            .await;

        result
    }

    async fn wait_and_collect(&self, pod_name: &str, ctx: &RunContext) -> Result<(i32, String), InspectionError> {
        let deadline = Instant::now() + DEFAULT_TIMEOUT;
        loop {
            let status = self
                .cluster
                .get_pod(pod_name, &ctx.kube_context, &ctx.namespace)
                .await?;

            let phase_is_terminal = matches!(status.phase(), Some("Succeeded") | Some("Failed"));

            match status.terminated_exit_code() {
                Ok(Some(exit_code)) => {
                    let logs = self
                        .cluster
                        .get_pod_logs(pod_name, &ctx.kube_context, &ctx.namespace)
                        .await?;
                    return Ok((exit_code, limit_string_length(&logs, DEFAULT_MAX_LOG_LENGTH, "...")));
                }
                Ok(None) if phase_is_terminal => {
                    // Reached Succeeded/Failed but no terminated
                    // container ever showed up: the edge case spec §9
                    // calls out, not a transient "still pending" state.
                    let diagnostics = self.diagnostics(pod_name, ctx).await;
                    return Err(InspectionError::NoContainerStatus {
                        pod_name: pod_name.to_string(),
                        diagnostics,
                    });
                }
                Ok(None) => {}
                Err(_) if phase_is_terminal => {
                    let diagnostics = self.diagnostics(pod_name, ctx).await;
                    return Err(InspectionError::NoContainerStatus {
                        pod_name: pod_name.to_string(),
                        diagnostics,
                    });
                }
                Err(_) => {}
            }

            if Instant::now() >= deadline {
                return Err(InspectionError::Timeout { pod_name: pod_name.to_string() });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Best-effort diagnostics for the repair loop: the adapter's
    /// surface has no dedicated events/PVC query, so this falls back to
    /// the pod's own status section (phase, any container waiting
    /// reason) — whatever `get_pod` already knows. A failure fetching
    /// it never masks the original failure, it just yields an empty
    /// string.
    async fn diagnostics(&self, pod_name: &str, ctx: &RunContext) -> String {
        match self.cluster.get_pod(pod_name, &ctx.kube_context, &ctx.namespace).await {
            Ok(status) => format!("pod phase: {:?}", status.phase()),
            Err(_) => String::new(),
        }
    }
}
