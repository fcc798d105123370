// SPDX-License-Identifier: Apache-2.0

use crate::error::ClusterError;
use crate::node::WorkflowNode;
use crate::pod_status::PodStatus;
use async_trait::async_trait;
use std::path::Path;

/// The cluster-facing surface every other component depends on.
/// Implementations are blocking from the caller's perspective — an
/// implementation may run a background worker internally, but the
/// value it returns is always final, never a handle to poll later.
#[async_trait]
pub trait ClusterAdapter: Send + Sync {
    async fn apply(&self, path: &Path, context: &str, namespace: &str) -> Result<(), ClusterError>;

    async fn delete_by_label(&self, selector: &str, context: &str) -> Result<(), ClusterError>;

    async fn delete_by_namespace(
        &self,
        kinds: &[&str],
        namespace: &str,
        context: &str,
    ) -> Result<(), ClusterError>;

    async fn get_pod(&self, name: &str, context: &str, namespace: &str) -> Result<PodStatus, ClusterError>;

    /// Every pod name currently matching `label_selector`, for callers
    /// that only know a task's name prefix (Argo/Chaos-Mesh appends a
    /// generated suffix to the template name when it schedules a pod).
    async fn list_pod_names(
        &self,
        label_selector: &str,
        context: &str,
        namespace: &str,
    ) -> Result<Vec<String>, ClusterError>;

    async fn get_pod_logs(&self, name: &str, context: &str, namespace: &str) -> Result<String, ClusterError>;

    async fn wait_until_ready(
        &self,
        label_selector: &str,
        context: &str,
        namespace: &str,
        timeout_secs: u64,
    ) -> Result<bool, ClusterError>;

    async fn dry_run_apply(&self, path: &Path) -> Result<(bool, String), ClusterError>;

    async fn get_entry_workflow_node(
        &self,
        label_selector: &str,
        context: &str,
        namespace: &str,
    ) -> Result<WorkflowNode, ClusterError>;
}
