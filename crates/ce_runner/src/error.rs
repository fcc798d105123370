// SPDX-License-Identifier: Apache-2.0

use ce_cluster::ClusterError;
use ce_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("cluster operation failed: {0}")]
    Cluster(#[from] ClusterError),

    #[error("failed to persist the compiled workflow to disk: {0}")]
    Store(#[from] StoreError),

    #[error("pod '{0}' reached a terminal workflow state with no terminated container status")]
    PodNotTerminated(String),

    #[error("workflow deadline exceeded: task(s) missed: {}", .missing.join(", "))]
    WorkflowDeadlineExceeded { missing: Vec<String> },
}
