// SPDX-License-Identifier: Apache-2.0

use ce_cluster::ClusterError;
use ce_store::StoreError;
use ce_templates::TemplateError;
use thiserror::Error;

/// A non-zero exit or timed-out pod is a *validation* failure, never a
/// system error — the steady-state builder decides whether to retry.
/// `NoContainerStatus` is its own variant rather than folded into
/// `ValidationFail` so callers can tell "the probe ran and failed" from
/// "the pod never got far enough to report anything".
#[derive(Debug, Error)]
pub enum InspectionError {
    #[error("cluster operation failed: {0}")]
    Cluster(#[from] ClusterError),

    #[error("failed to persist inspection artifacts: {0}")]
    Store(#[from] StoreError),

    #[error("failed to render pod manifest: {0}")]
    Template(#[from] TemplateError),

    #[error("timed out waiting for pod '{pod_name}' to reach a terminal phase")]
    Timeout { pod_name: String },

    #[error("pod '{pod_name}' reported no container statuses; diagnostics: {diagnostics}")]
    NoContainerStatus { pod_name: String, diagnostics: String },
}
