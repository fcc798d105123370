// SPDX-License-Identifier: Apache-2.0

use crate::InspectionRunner;
use async_trait::async_trait;
use ce_cluster::{ClusterAdapter, ClusterError, PodStatus, WorkflowNode};
use ce_store::LocalFileStore;
use ce_types::{Inspection, RunContext, ToolType};
use std::path::Path;
use std::sync::Mutex;

/// Reports the pod as running once, then terminated with the
/// configured exit code — just enough state to exercise the poll loop
/// without a real cluster.
struct FakeCluster {
    exit_code: i32,
    poll_count: Mutex<u32>,
    logs: String,
}

impl FakeCluster {
    fn new(exit_code: i32, logs: impl Into<String>) -> Self {
        FakeCluster { exit_code, poll_count: Mutex::new(0), logs: logs.into() }
    }
}

#[async_trait]
impl ClusterAdapter for FakeCluster {
    async fn apply(&self, _path: &Path, _context: &str, _namespace: &str) -> Result<(), ClusterError> {
        Ok(())
    }

    async fn delete_by_label(&self, _selector: &str, _context: &str) -> Result<(), ClusterError> {
        Ok(())
    }

    async fn delete_by_namespace(&self, _kinds: &[&str], _namespace: &str, _context: &str) -> Result<(), ClusterError> {
        Ok(())
    }

    async fn get_pod(&self, _name: &str, _context: &str, _namespace: &str) -> Result<PodStatus, ClusterError> {
        let mut count = self.poll_count.lock().unwrap();
        *count += 1;
        let json = if *count == 1 {
            serde_json::json!({"status": {"phase": "Running"}})
        } else {
            serde_json::json!({
                "status": {
                    "phase": "Succeeded",
                    "containerStatuses": [{"state": {"terminated": {"exitCode": self.exit_code}}}]
                }
            })
        };
        Ok(serde_json::from_value(json).unwrap())
    }

    async fn get_pod_logs(&self, _name: &str, _context: &str, _namespace: &str) -> Result<String, ClusterError> {
        Ok(self.logs.clone())
    }

    async fn list_pod_names(&self, _label_selector: &str, _context: &str, _namespace: &str) -> Result<Vec<String>, ClusterError> {
        unimplemented!("not exercised by the inspection runner")
    }

    async fn wait_until_ready(&self, _label_selector: &str, _context: &str, _namespace: &str, _timeout_secs: u64) -> Result<bool, ClusterError> {
        Ok(true)
    }

    async fn dry_run_apply(&self, _path: &Path) -> Result<(bool, String), ClusterError> {
        Ok((true, String::new()))
    }

    async fn get_entry_workflow_node(&self, _label_selector: &str, _context: &str, _namespace: &str) -> Result<WorkflowNode, ClusterError> {
        Err(ClusterError::MissingEntryNode("unused in this fake".into()))
    }
}

fn probe_inspection() -> Inspection {
    let script = ce_types::File::text("work", "k8s_replica_count.py", "print('ok')");
    Inspection::new(ToolType::ProbeScript, "5s", script)
}

#[tokio::test]
async fn successful_probe_returns_exit_code_and_logs() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new(dir.path());
    let cluster = FakeCluster::new(0, "replica count: 3\n");
    let runner = InspectionRunner::new(&cluster, &store);
    let ctx = RunContext::new("kind-chaos", "chaos-eater", dir.path());

    let (exit_code, logs) = runner.run(&probe_inspection(), &ctx).await.unwrap();
    assert_eq!(exit_code, 0);
    assert!(logs.contains("replica count"));
}

#[tokio::test]
async fn failing_probe_surfaces_nonzero_exit_as_a_value_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new(dir.path());
    let cluster = FakeCluster::new(1, "assertion failed\n");
    let runner = InspectionRunner::new(&cluster, &store);
    let ctx = RunContext::new("kind-chaos", "chaos-eater", dir.path());

    let (exit_code, logs) = runner.run(&probe_inspection(), &ctx).await.unwrap();
    assert_eq!(exit_code, 1);
    assert!(logs.contains("assertion failed"));
}

#[tokio::test]
async fn no_container_statuses_is_a_validation_failure_not_a_panic() {
    struct NoStatusCluster;

    #[async_trait]
    impl ClusterAdapter for NoStatusCluster {
        async fn apply(&self, _path: &Path, _context: &str, _namespace: &str) -> Result<(), ClusterError> {
            Ok(())
        }
        async fn delete_by_label(&self, _selector: &str, _context: &str) -> Result<(), ClusterError> {
            Ok(())
        }
        async fn delete_by_namespace(&self, _kinds: &[&str], _namespace: &str, _context: &str) -> Result<(), ClusterError> {
            Ok(())
        }
        async fn get_pod(&self, _name: &str, _context: &str, _namespace: &str) -> Result<PodStatus, ClusterError> {
            Ok(serde_json::from_value(serde_json::json!({"status": {"phase": "Failed"}})).unwrap())
        }
        async fn get_pod_logs(&self, _name: &str, _context: &str, _namespace: &str) -> Result<String, ClusterError> {
            Ok(String::new())
        }
        async fn list_pod_names(&self, _label_selector: &str, _context: &str, _namespace: &str) -> Result<Vec<String>, ClusterError> {
            unimplemented!("not exercised by the inspection runner")
        }
        async fn wait_until_ready(&self, _label_selector: &str, _context: &str, _namespace: &str, _timeout_secs: u64) -> Result<bool, ClusterError> {
            Ok(false)
        }
        async fn dry_run_apply(&self, _path: &Path) -> Result<(bool, String), ClusterError> {
            Ok((true, String::new()))
        }
        async fn get_entry_workflow_node(&self, _label_selector: &str, _context: &str, _namespace: &str) -> Result<WorkflowNode, ClusterError> {
            Err(ClusterError::MissingEntryNode("unused".into()))
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new(dir.path());
    let cluster = NoStatusCluster;
    let runner = InspectionRunner::new(&cluster, &store);
    let ctx = RunContext::new("kind-chaos", "chaos-eater", dir.path());

    let err = runner.run(&probe_inspection(), &ctx).await.unwrap_err();
    assert!(matches!(err, crate::InspectionError::NoContainerStatus { .. }));
}
