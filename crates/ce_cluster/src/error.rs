// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Failure modes the adapter's contract distinguishes: API errors are
/// retriable by the caller, a timeout is surfaced as-is (the caller
/// decides whether to retry at a higher level), and a parse error
/// means the adapter itself produced something it can't make sense of
/// — a bug, not a transient condition.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    #[error("timed out waiting for '{label_selector}' to become ready in namespace '{namespace}'")]
    Timeout {
        label_selector: String,
        namespace: String,
    },

    #[error("failed to parse cluster response in {context}: {message}")]
    Parse { context: String, message: String },

    #[error("`kubectl {args}` failed (exit {code:?}): {stderr}")]
    Process {
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("no entry workflow node found for selector '{0}'")]
    MissingEntryNode(String),
}
