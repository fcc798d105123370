// SPDX-License-Identifier: Apache-2.0

use crate::SteadyStateBuilder;
use async_trait::async_trait;
use ce_cluster::{ClusterAdapter, ClusterError, PodStatus, WorkflowNode};
use ce_llm::{
    AdjustUnitTest, CheckCompletion, DefineThreshold, DesignInspection, DraftSteadyState, History, LlmError,
    LlmGateway, ToolSpec, WriteUnitTest,
};
use ce_store::LocalFileStore;
use ce_types::{
    Analysis, Fault, FaultInjectionPhase, FaultScenario, ProcessedData, Reconfiguration, RunContext, Threshold,
    TimeSchedule, ToolType, ValidationPhase,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

struct FakeCluster {
    poll_count: Mutex<u32>,
    outcomes: Mutex<VecDeque<(i32, String)>>,
    current: Mutex<Option<(i32, String)>>,
}

impl FakeCluster {
    fn new(outcomes: Vec<(i32, &str)>) -> Self {
        FakeCluster {
            poll_count: Mutex::new(0),
            outcomes: Mutex::new(outcomes.into_iter().map(|(c, l)| (c, l.to_string())).collect()),
            current: Mutex::new(None),
        }
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
        if *count % 2 == 1 {
            return Ok(serde_json::from_value(json!({"status": {"phase": "Running"}})).unwrap());
        }
        let outcome = self.outcomes.lock().unwrap().pop_front().unwrap_or((0, "ok".to_string()));
        let phase = if outcome.0 == 0 { "Succeeded" } else { "Failed" };
        let body = json!({
            "status": {
                "phase": phase,
                "containerStatuses": [{"state": {"terminated": {"exitCode": outcome.0}}}]
            }
        });
        *self.current.lock().unwrap() = Some(outcome);
        Ok(serde_json::from_value(body).unwrap())
    }

    async fn get_pod_logs(&self, _name: &str, _context: &str, _namespace: &str) -> Result<String, ClusterError> {
        Ok(self.current.lock().unwrap().clone().map(|(_, logs)| logs).unwrap_or_default())
    }

    async fn list_pod_names(&self, _label_selector: &str, _context: &str, _namespace: &str) -> Result<Vec<String>, ClusterError> {
        unimplemented!("not exercised by the steady state builder")
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

/// Scripts a single steady-state build: drafts one candidate, designs
/// one inspection (optionally rewritten `rewrite_attempts` times before
/// it's accepted), defines a threshold, writes one unit test, and
/// stops after the first completion check.
struct FakeLlm {
    rewrite_inspection_calls: Mutex<u32>,
    rewrite_unit_test_calls: Mutex<u32>,
}

impl FakeLlm {
    fn new() -> Self {
        FakeLlm { rewrite_inspection_calls: Mutex::new(0), rewrite_unit_test_calls: Mutex::new(0) }
    }
}

#[async_trait]
impl LlmGateway for FakeLlm {
    async fn summarize_manifest(&self, _ctx: &Value) -> Result<String, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn summarize_weaknesses(&self, _ctx: &Value) -> Result<String, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn assume_app(&self, _ctx: &Value) -> Result<ce_llm::K8sAppAssumption, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn summarize_instructions(&self, _ctx: &Value) -> Result<String, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn draft_steady_state(&self, _ctx: &Value) -> Result<DraftSteadyState, LlmError> {
        Ok(DraftSteadyState {
            thought: "replica count should stay at 3".into(),
            manifest: "apiVersion: v1\nkind: Deployment".into(),
            name: "replica-count".into(),
        })
    }

    async fn design_inspection(&self, _ctx: &Value) -> Result<DesignInspection, LlmError> {
        Ok(DesignInspection {
            thought: "count ready replicas via kubectl".into(),
            tool_type: ToolType::ProbeScript,
            tool: ToolSpec { duration: "5s".into(), vus: None, script: "print('3')".into() },
        })
    }

    async fn rewrite_inspection(&self, _ctx: &Value, _error_history: &History<String, String>) -> Result<DesignInspection, LlmError> {
        *self.rewrite_inspection_calls.lock().unwrap() += 1;
        Ok(DesignInspection {
            thought: "fixed the assertion".into(),
            tool_type: ToolType::ProbeScript,
            tool: ToolSpec { duration: "5s".into(), vus: None, script: "print('3') # fixed".into() },
        })
    }

    async fn define_threshold(&self, _ctx: &Value) -> Result<DefineThreshold, LlmError> {
        Ok(DefineThreshold {
            thought: "3 replicas observed steady-state".into(),
            threshold: Threshold {
                value: "== 3".into(),
                rationale: "observed value stays constant across the probe window".into(),
            },
        })
    }

    async fn write_unit_test(&self, _ctx: &Value) -> Result<WriteUnitTest, LlmError> {
        Ok(WriteUnitTest { thought: "assert replica count equals 3".into(), code: "assert True".into() })
    }

    async fn rewrite_unit_test(&self, _ctx: &Value, _error_history: &History<String, String>) -> Result<WriteUnitTest, LlmError> {
        *self.rewrite_unit_test_calls.lock().unwrap() += 1;
        Ok(WriteUnitTest { thought: "fixed the test".into(), code: "assert True # fixed".into() })
    }

    async fn check_completion(&self, _ctx: &Value) -> Result<CheckCompletion, LlmError> {
        Ok(CheckCompletion { thought: "one steady state covers this workload".into(), requires_addition: false })
    }

    async fn propose_fault_scenario(&self, _ctx: &Value) -> Result<FaultScenario, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn refine_fault_params(&self, _ctx: &Value, _fault: &Fault) -> Result<Value, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn plan_time_schedule(&self, _ctx: &Value) -> Result<TimeSchedule, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn plan_validation_phase(&self, _ctx: &Value, _phase: &str) -> Result<ValidationPhase, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn plan_fault_phase(&self, _ctx: &Value) -> Result<FaultInjectionPhase, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn summarize_plan(&self, _ctx: &Value) -> Result<String, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn analyze_result(&self, _ctx: &Value) -> Result<Analysis, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn propose_reconfiguration(&self, _ctx: &Value, _history: &Value) -> Result<Reconfiguration, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn debug_reconfiguration(&self, _ctx: &Value, _error_history: &History<String, String>) -> Result<Reconfiguration, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn adjust_fault_scope(&self, _ctx: &Value, _prev: &Value, _curr: &Value, _fault: &Fault) -> Result<String, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }

    async fn adjust_unit_test(&self, _ctx: &Value, _prev_yamls: &Value, _curr_yamls: &Value, _test_code: &str) -> Result<AdjustUnitTest, LlmError> {
        unimplemented!("not exercised by the steady-state builder")
    }
}

fn data(work_dir: &Path) -> ProcessedData {
    ProcessedData {
        work_dir: work_dir.to_path_buf(),
        input: "a deployment with 3 replicas".into(),
        k8s_yamls: vec![ce_types::File::text(work_dir, "deployment.yaml", "apiVersion: v1\nkind: Deployment")],
        k8s_summaries: vec!["3-replica deployment".into()],
        k8s_weakness_summary: "no PodDisruptionBudget".into(),
        k8s_app: "demo".into(),
        ce_instructions: None,
    }
}

#[tokio::test]
async fn builds_one_steady_state_and_stops_when_completion_check_says_so() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new(dir.path());
    let cluster = FakeCluster::new(vec![(0, "3 replicas"), (0, "unit test passed")]);
    let llm = FakeLlm::new();
    let ctx = RunContext::new("kind-chaos", "chaos-eater", dir.path());

    let builder = SteadyStateBuilder::new(&llm, &cluster, &store);
    let steady_states = builder.build(&data(dir.path()), &ctx).await.unwrap();

    assert_eq!(steady_states.len(), 1);
    assert_eq!(steady_states[0].name, "replica-count");
    assert_eq!(steady_states[0].threshold.value, "== 3");
    assert_eq!(*llm.rewrite_inspection_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn retries_inspection_once_on_a_failing_probe_before_accepting_it() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new(dir.path());
    let cluster = FakeCluster::new(vec![(1, "assertion failed: expected 3"), (0, "3 replicas"), (0, "unit test passed")]);
    let llm = FakeLlm::new();
    let ctx = RunContext::new("kind-chaos", "chaos-eater", dir.path());

    let builder = SteadyStateBuilder::new(&llm, &cluster, &store);
    let steady_states = builder.build(&data(dir.path()), &ctx).await.unwrap();

    assert_eq!(steady_states.len(), 1);
    assert_eq!(*llm.rewrite_inspection_calls.lock().unwrap(), 1);
}
