// SPDX-License-Identifier: Apache-2.0

use crate::{ExperimentRunner, RunError};
use async_trait::async_trait;
use ce_cluster::{ClusterAdapter, ClusterError, PodStatus, WorkflowCondition, WorkflowNode};
use ce_types::{
    ChaosExperiment, ExperimentPlan, FaultInjectionPhase, FaultInjectionTask, File, RunContext, TimeSchedule,
    UnitTestTask, ValidationPhase,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

struct FakeCluster {
    accomplished: bool,
    pod_names: Vec<String>,
    exit_codes: HashMap<String, i32>,
    apply_calls: Mutex<u32>,
    reset_calls: Mutex<u32>,
}

impl FakeCluster {
    fn new(pod_names: Vec<&str>, exit_codes: Vec<(&str, i32)>) -> Self {
        FakeCluster {
            accomplished: true,
            pod_names: pod_names.into_iter().map(String::from).collect(),
            exit_codes: exit_codes.into_iter().map(|(n, c)| (n.to_string(), c)).collect(),
            apply_calls: Mutex::new(0),
            reset_calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl ClusterAdapter for FakeCluster {
    async fn apply(&self, _path: &Path, _context: &str, _namespace: &str) -> Result<(), ClusterError> {
        *self.apply_calls.lock().unwrap() += 1;
        Ok(())
    }

    async fn delete_by_label(&self, _selector: &str, _context: &str) -> Result<(), ClusterError> {
        Ok(())
    }

    async fn delete_by_namespace(&self, _kinds: &[&str], _namespace: &str, _context: &str) -> Result<(), ClusterError> {
        *self.reset_calls.lock().unwrap() += 1;
        Ok(())
    }

    async fn get_pod(&self, name: &str, _context: &str, _namespace: &str) -> Result<PodStatus, ClusterError> {
        let exit_code = *self.exit_codes.get(name).unwrap_or(&0);
        Ok(serde_json::from_value(serde_json::json!({
            "status": {
                "phase": "Succeeded",
                "containerStatuses": [{"state": {"terminated": {"exitCode": exit_code}}}]
            }
        }))
        .unwrap())
    }

    async fn get_pod_logs(&self, name: &str, _context: &str, _namespace: &str) -> Result<String, ClusterError> {
        Ok(format!("logs for {name}"))
    }

    async fn list_pod_names(&self, _label_selector: &str, _context: &str, _namespace: &str) -> Result<Vec<String>, ClusterError> {
        Ok(self.pod_names.clone())
    }

    async fn wait_until_ready(&self, _label_selector: &str, _context: &str, _namespace: &str, _timeout_secs: u64) -> Result<bool, ClusterError> {
        Ok(true)
    }

    async fn dry_run_apply(&self, _path: &Path) -> Result<(bool, String), ClusterError> {
        Ok((true, String::new()))
    }

    async fn get_entry_workflow_node(&self, _label_selector: &str, _context: &str, _namespace: &str) -> Result<WorkflowNode, ClusterError> {
        let status = if self.accomplished { "True" } else { "False" };
        Ok(WorkflowNode {
            name: "the-entry-xyz".into(),
            conditions: vec![WorkflowCondition { condition_type: "Accomplished".into(), status: status.into() }],
        })
    }
}

fn unit_test_task(name: &str, workflow_name: &str) -> UnitTestTask {
    UnitTestTask {
        name: name.into(),
        workflow_name: workflow_name.into(),
        grace_period: 0,
        duration: 10,
        deadline: 310,
        file_path: format!("unittest_{name}.py"),
    }
}

fn experiment(work_dir: &Path) -> ChaosExperiment {
    ChaosExperiment {
        plan: ExperimentPlan {
            time_schedule: TimeSchedule { total: 60, pre_validation: 20, fault_injection: 20, post_validation: 20 },
            pre_validation: ValidationPhase { thought: "check a".into(), unit_tests: vec![unit_test_task("a", "pre-unittest-a")] },
            fault_injection: FaultInjectionPhase {
                thought: "kill a pod".into(),
                unit_tests: vec![unit_test_task("a", "fault-unittest-a")],
                fault_injection: vec![FaultInjectionTask {
                    name: "PodChaos".into(),
                    name_id: 0,
                    workflow_name: "fault-podchaos".into(),
                    grace_period: 0,
                    duration: 20,
                    deadline: 20,
                    params: serde_json::json!({"action": "pod-kill"}),
                }],
            },
            post_validation: ValidationPhase { thought: "check a again".into(), unit_tests: vec![unit_test_task("a", "post-unittest-a")] },
            summary: "kill a pod, expect recovery".into(),
        },
        workflow_name: "chaos-experiment-20260101000000".into(),
        workflow: File::text(work_dir.to_path_buf(), "workflow.yaml", "apiVersion: argoproj.io/v1alpha1\nkind: Workflow\n"),
    }
}

#[tokio::test]
async fn collects_pod_status_for_every_unit_test_task_and_skips_faults() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = RunContext::new("kind-chaos", "chaos-eater", dir.path());
    let cluster = FakeCluster::new(
        vec!["pre-unittest-a-9f3k2", "fault-unittest-a-2b7cd", "post-unittest-a-z81qx"],
        vec![("pre-unittest-a-9f3k2", 0), ("fault-unittest-a-2b7cd", 0), ("post-unittest-a-z81qx", 0)],
    );
    let runner = ExperimentRunner::new().with_check_interval(std::time::Duration::from_millis(1));

    let result = runner.run(&experiment(dir.path()), &cluster, &ctx).await.unwrap();

    assert!(result.all_passed());
    assert_eq!(result.pod_statuses.len(), 3);
    assert!(!result.pod_statuses.contains_key("fault-podchaos"));
    assert_eq!(*cluster.apply_calls.lock().unwrap(), 1);
    assert_eq!(*cluster.reset_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn surfaces_a_nonzero_exit_code_as_a_failing_task_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = RunContext::new("kind-chaos", "chaos-eater", dir.path());
    let cluster = FakeCluster::new(
        vec!["pre-unittest-a-1", "fault-unittest-a-2", "post-unittest-a-3"],
        vec![("pre-unittest-a-1", 0), ("fault-unittest-a-2", 1), ("post-unittest-a-3", 0)],
    );
    let runner = ExperimentRunner::new().with_check_interval(std::time::Duration::from_millis(1));

    let result = runner.run(&experiment(dir.path()), &cluster, &ctx).await.unwrap();

    assert!(!result.all_passed());
    let failing: Vec<&String> = result.failing().map(|(name, _)| name).collect();
    assert_eq!(failing, vec!["fault-unittest-a"]);
}

#[tokio::test]
async fn a_pod_that_never_appears_is_reported_as_deadline_exceeded() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = RunContext::new("kind-chaos", "chaos-eater", dir.path());
    let cluster = FakeCluster::new(vec!["pre-unittest-a-1", "post-unittest-a-3"], vec![]);
    let runner = ExperimentRunner::new().with_check_interval(std::time::Duration::from_millis(1));

    let err = runner.run(&experiment(dir.path()), &cluster, &ctx).await.unwrap_err();

    match err {
        RunError::WorkflowDeadlineExceeded { missing } => assert_eq!(missing, vec!["fault-unittest-a".to_string()]),
        other => panic!("expected WorkflowDeadlineExceeded, got {other:?}"),
    }
}
