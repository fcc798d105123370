// SPDX-License-Identifier: Apache-2.0

use crate::adapter::ClusterAdapter;
use crate::error::ClusterError;
use crate::node::WorkflowNode;
use crate::pod_status::PodStatus;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{Pod, Service};
use kube::api::{Api, ListParams};
use kube::Client;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Cluster access backed by kube-rs for typed reads and a `kubectl`
/// subprocess for multi-document apply and for Chaos Mesh's
/// Workflow/WorkflowNode CRDs, which have no typed representation in
/// k8s-openapi. Mirrors the split the teacher's own preview module
/// uses: kube-rs where the object is well-known, `kubectl` where
/// dealing with arbitrary or CRD manifests.
pub struct KubeAdapter {
    client: Client,
}

impl KubeAdapter {
    pub async fn infer() -> Result<Self, ClusterError> {
        let client = Client::try_default().await?;
        Ok(KubeAdapter { client })
    }

    pub fn new(client: Client) -> Self {
        KubeAdapter { client }
    }

    async fn run_kubectl(&self, args: &[&str]) -> Result<String, ClusterError> {
        let output = Command::new("kubectl")
            .args(args)
            .output()
            .await
            .map_err(|e| ClusterError::Process {
                args: args.join(" "),
                code: None,
                stderr: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(ClusterError::Process {
                args: args.join(" "),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn run_kubectl_with_stdin(&self, args: &[&str], stdin_content: &str) -> Result<String, ClusterError> {
        let mut child = Command::new("kubectl")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ClusterError::Process {
                args: args.join(" "),
                code: None,
                stderr: e.to_string(),
            })?;
        let mut stdin = child.stdin.take().expect("stdin requested via Stdio::piped");
        stdin
            .write_all(stdin_content.as_bytes())
            .await
            .map_err(|e| ClusterError::Process { args: args.join(" "), code: None, stderr: e.to_string() })?;
        drop(stdin);
        let output = child.wait_with_output().await.map_err(|e| ClusterError::Process {
            args: args.join(" "),
            code: None,
            stderr: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(ClusterError::Process {
                args: args.join(" "),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl ClusterAdapter for KubeAdapter {
    async fn apply(&self, path: &Path, context: &str, namespace: &str) -> Result<(), ClusterError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| ClusterError::Process {
            args: format!("apply -f {}", path.display()),
            code: None,
            stderr: e.to_string(),
        })?;
        if content.trim().is_empty() {
            return Ok(());
        }
        self.run_kubectl_with_stdin(
            &["apply", "--context", context, "-n", namespace, "-f", "-"],
            &content,
        )
        .await?;
        Ok(())
    }

    async fn delete_by_label(&self, selector: &str, context: &str) -> Result<(), ClusterError> {
        self.run_kubectl(&[
            "delete",
            "all",
            "--all-namespaces",
            "--context",
            context,
            "-l",
            selector,
            "--ignore-not-found",
        ])
        .await?;
        Ok(())
    }

    async fn delete_by_namespace(
        &self,
        kinds: &[&str],
        namespace: &str,
        context: &str,
    ) -> Result<(), ClusterError> {
        for kind in kinds {
            self.run_kubectl(&[
                "delete",
                kind,
                "--all",
                "--context",
                context,
                "-n",
                namespace,
                "--ignore-not-found",
            ])
            .await?;
        }
        Ok(())
    }

    async fn get_pod(&self, name: &str, context: &str, namespace: &str) -> Result<PodStatus, ClusterError> {
        let raw = self
            .run_kubectl(&["get", "pod", name, "--context", context, "-n", namespace, "-o", "json"])
            .await?;
        serde_json::from_str(&raw).map_err(|e| ClusterError::Parse {
            context: format!("get pod {name}"),
            message: e.to_string(),
        })
    }

    async fn get_pod_logs(&self, name: &str, context: &str, namespace: &str) -> Result<String, ClusterError> {
        self.run_kubectl(&["logs", name, "--context", context, "-n", namespace]).await
    }

    async fn list_pod_names(
        &self,
        label_selector: &str,
        context: &str,
        namespace: &str,
    ) -> Result<Vec<String>, ClusterError> {
        let _ = context; // kube-rs reads are made against `self.client`'s own context.
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let lp = ListParams::default().labels(label_selector);
        Ok(pods
            .list(&lp)
            .await?
            .items
            .into_iter()
            .filter_map(|p| p.metadata.name)
            .collect())
    }

    async fn wait_until_ready(
        &self,
        label_selector: &str,
        context: &str,
        namespace: &str,
        timeout_secs: u64,
    ) -> Result<bool, ClusterError> {
        let _ = context; // kube-rs reads are made against `self.client`'s own context.
        let deadline = Instant::now() + Duration::from_secs(timeout_secs);
        let lp = ListParams::default().labels(label_selector);
        loop {
            if self.resources_are_ready(&lp, namespace).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }

    async fn dry_run_apply(&self, path: &Path) -> Result<(bool, String), ClusterError> {
        let args = ["apply", "--dry-run=server", "-f"];
        let path_str = path.to_string_lossy();
        let full_args = [args[0], args[1], args[2], path_str.as_ref()];
        match self.run_kubectl(&full_args).await {
            Ok(stdout) => Ok((true, stdout)),
            Err(ClusterError::Process { stderr, .. }) => Ok((false, stderr)),
            Err(other) => Err(other),
        }
    }

    async fn get_entry_workflow_node(
        &self,
        label_selector: &str,
        context: &str,
        namespace: &str,
    ) -> Result<WorkflowNode, ClusterError> {
        let names = self
            .run_kubectl(&[
                "get",
                "workflownode",
                "--context",
                context,
                "-n",
                namespace,
                "--selector",
                label_selector,
                "-o",
                "custom-columns=:metadata.name",
            ])
            .await?;
        let entry_name = names
            .lines()
            .map(str::trim)
            .find(|n| n.starts_with("the-entry"))
            .ok_or_else(|| ClusterError::MissingEntryNode(label_selector.to_string()))?
            .to_string();

        let raw = self
            .run_kubectl(&["get", "workflownode", &entry_name, "--context", context, "-n", namespace, "-o", "json"])
            .await?;
        let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| ClusterError::Parse {
            context: format!("get workflownode {entry_name}"),
            message: e.to_string(),
        })?;
        let conditions = value
            .pointer("/status/conditions")
            .cloned()
            .unwrap_or(serde_json::Value::Array(vec![]));
        serde_json::from_value(serde_json::json!({ "name": entry_name, "conditions": conditions }))
            .map_err(|e| ClusterError::Parse { context: "workflownode conditions".to_string(), message: e.to_string() })
    }
}

impl KubeAdapter {
    /// Polls Deployments, bare Pods, Services, Jobs, StatefulSets and
    /// DaemonSets under `lp`; ready iff every matched resource reports
    /// its own "fully ready" invariant.
    async fn resources_are_ready(&self, lp: &ListParams, namespace: &str) -> Result<bool, ClusterError> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        for d in deployments.list(lp).await?.items {
            let available = d.status.as_ref().and_then(|s| s.available_replicas).unwrap_or(0);
            let desired = d.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
            if available != desired {
                return Ok(false);
            }
        }

        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        for p in pods.list(lp).await?.items {
            let phase = p.status.as_ref().and_then(|s| s.phase.clone());
            if phase.as_deref() != Some("Running") {
                return Ok(false);
            }
        }

        let services: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        for s in services.list(lp).await?.items {
            let cluster_ip = s.spec.as_ref().and_then(|spec| spec.cluster_ip.clone());
            if cluster_ip.is_none() {
                return Ok(false);
            }
        }

        let jobs: Api<Job> = Api::namespaced(self.client.clone(), namespace);
        for j in jobs.list(lp).await?.items {
            let succeeded = j.status.as_ref().and_then(|s| s.succeeded).unwrap_or(0);
            if succeeded < 1 {
                return Ok(false);
            }
        }

        let statefulsets: Api<StatefulSet> = Api::namespaced(self.client.clone(), namespace);
        for s in statefulsets.list(lp).await?.items {
            let ready = s.status.as_ref().and_then(|st| st.ready_replicas).unwrap_or(0);
            let desired = s.spec.as_ref().and_then(|sp| sp.replicas).unwrap_or(0);
            if ready != desired {
                return Ok(false);
            }
        }

        let daemonsets: Api<DaemonSet> = Api::namespaced(self.client.clone(), namespace);
        for d in daemonsets.list(lp).await?.items {
            let available = d.status.as_ref().map(|s| s.number_available).unwrap_or(None).unwrap_or(0);
            let desired = d.status.as_ref().map(|s| s.desired_number_scheduled).unwrap_or(0);
            if available != desired {
                return Ok(false);
            }
        }

        Ok(true)
    }
}
