// SPDX-License-Identifier: Apache-2.0

//! The Cluster Adapter: a trait-level seam (`ClusterAdapter`) plus its
//! production implementation (`KubeAdapter`), backed by kube-rs for
//! typed reads and `kubectl` subprocesses for multi-document apply
//! and Chaos Mesh's untyped Workflow CRDs.

mod adapter;
mod error;
mod kube_adapter;
mod node;
mod pod_status;

pub use adapter::ClusterAdapter;
pub use error::ClusterError;
pub use kube_adapter::KubeAdapter;
pub use node::{WorkflowCondition, WorkflowNode};
pub use pod_status::PodStatus;
