// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// The ambient cluster/filesystem coordinates every runner-style
/// component needs and none of them owns: which kubeconfig context to
/// talk to, which namespace to scope operations to, and which
/// directory on disk is this cycle's working directory. Plain data —
/// no handle, no connection, so it's as cheap to clone as any other
/// value in this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunContext {
    pub kube_context: String,
    pub namespace: String,
    pub work_dir: PathBuf,
}

impl RunContext {
    pub fn new(kube_context: impl Into<String>, namespace: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        RunContext {
            kube_context: kube_context.into(),
            namespace: namespace.into(),
            work_dir: work_dir.into(),
        }
    }
}
