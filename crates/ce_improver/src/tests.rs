// SPDX-License-Identifier: Apache-2.0

use crate::{ImproveError, Improver};
use async_trait::async_trait;
use ce_cluster::{ClusterAdapter, ClusterError, PodStatus, WorkflowNode};
use ce_llm::{
    AdjustUnitTest, CheckCompletion, DefineThreshold, DesignInspection, DraftSteadyState, History, LlmError,
    LlmGateway, WriteUnitTest,
};
use ce_types::{
    Analysis, Fault, FaultInjectionPhase, FaultScenario, File, ManifestMod, ModType, Reconfiguration, RunContext,
    SteadyState, TimeSchedule, ValidationPhase,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Mutex;

struct FakeCluster {
    applied: Mutex<Vec<String>>,
    fail_fname: Option<&'static str>,
    fail_until_attempt: u32,
}

impl FakeCluster {
    fn new() -> Self {
        FakeCluster { applied: Mutex::new(Vec::new()), fail_fname: None, fail_until_attempt: 0 }
    }

    fn failing(fname: &'static str, fail_until_attempt: u32) -> Self {
        FakeCluster { applied: Mutex::new(Vec::new()), fail_fname: Some(fname), fail_until_attempt }
    }
}

#[async_trait]
impl ClusterAdapter for FakeCluster {
    async fn apply(&self, path: &Path, _context: &str, _namespace: &str) -> Result<(), ClusterError> {
        let fname = path.file_name().unwrap().to_string_lossy().into_owned();
        let mut applied = self.applied.lock().unwrap();
        applied.push(fname.clone());
        let attempt = applied.iter().filter(|f| *f == &fname).count() as u32;
        if self.fail_fname == Some(fname.as_str()) && attempt <= self.fail_until_attempt {
            return Err(ClusterError::Process { args: "apply".into(), code: Some(1), stderr: "admission webhook denied".into() });
        }
        Ok(())
    }

    async fn delete_by_label(&self, _selector: &str, _context: &str) -> Result<(), ClusterError> {
        unimplemented!("not exercised by the improver")
    }

    async fn delete_by_namespace(&self, _kinds: &[&str], _namespace: &str, _context: &str) -> Result<(), ClusterError> {
        unimplemented!("not exercised by the improver")
    }

    async fn get_pod(&self, _name: &str, _context: &str, _namespace: &str) -> Result<PodStatus, ClusterError> {
        unimplemented!("not exercised by the improver")
    }

    async fn get_pod_logs(&self, _name: &str, _context: &str, _namespace: &str) -> Result<String, ClusterError> {
        unimplemented!("not exercised by the improver")
    }

    async fn list_pod_names(&self, _label_selector: &str, _context: &str, _namespace: &str) -> Result<Vec<String>, ClusterError> {
        unimplemented!("not exercised by the improver")
    }

    async fn wait_until_ready(&self, _label_selector: &str, _context: &str, _namespace: &str, _timeout_secs: u64) -> Result<bool, ClusterError> {
        unimplemented!("not exercised by the improver")
    }

    async fn dry_run_apply(&self, _path: &Path) -> Result<(bool, String), ClusterError> {
        unimplemented!("not exercised by the improver")
    }

    async fn get_entry_workflow_node(&self, _label_selector: &str, _context: &str, _namespace: &str) -> Result<WorkflowNode, ClusterError> {
        unimplemented!("not exercised by the improver")
    }
}

struct FakeLlm {
    proposal: Reconfiguration,
    debug_reconfiguration: Option<Reconfiguration>,
    debug_calls: Mutex<u32>,
}

impl FakeLlm {
    fn new(proposal: Reconfiguration) -> Self {
        FakeLlm { proposal, debug_reconfiguration: None, debug_calls: Mutex::new(0) }
    }

    fn with_debug_reconfiguration(mut self, reconfig: Reconfiguration) -> Self {
        self.debug_reconfiguration = Some(reconfig);
        self
    }
}

#[async_trait]
impl LlmGateway for FakeLlm {
    async fn summarize_manifest(&self, _ctx: &Value) -> Result<String, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn summarize_weaknesses(&self, _ctx: &Value) -> Result<String, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn assume_app(&self, _ctx: &Value) -> Result<ce_llm::K8sAppAssumption, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn summarize_instructions(&self, _ctx: &Value) -> Result<String, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn draft_steady_state(&self, _ctx: &Value) -> Result<DraftSteadyState, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn design_inspection(&self, _ctx: &Value) -> Result<DesignInspection, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn rewrite_inspection(&self, _ctx: &Value, _error_history: &History<String, String>) -> Result<DesignInspection, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn define_threshold(&self, _ctx: &Value) -> Result<DefineThreshold, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn write_unit_test(&self, _ctx: &Value) -> Result<WriteUnitTest, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn rewrite_unit_test(&self, _ctx: &Value, _error_history: &History<String, String>) -> Result<WriteUnitTest, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn check_completion(&self, _ctx: &Value) -> Result<CheckCompletion, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn propose_fault_scenario(&self, _ctx: &Value) -> Result<FaultScenario, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn refine_fault_params(&self, _ctx: &Value, _fault: &Fault) -> Result<Value, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn plan_time_schedule(&self, _ctx: &Value) -> Result<TimeSchedule, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn plan_validation_phase(&self, _ctx: &Value, _phase: &str) -> Result<ValidationPhase, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn plan_fault_phase(&self, _ctx: &Value) -> Result<FaultInjectionPhase, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn summarize_plan(&self, _ctx: &Value) -> Result<String, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn analyze_result(&self, _ctx: &Value) -> Result<Analysis, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn propose_reconfiguration(&self, _ctx: &Value, _history: &Value) -> Result<Reconfiguration, LlmError> {
        Ok(self.proposal.clone())
    }

    async fn debug_reconfiguration(&self, _ctx: &Value, _error_history: &History<String, String>) -> Result<Reconfiguration, LlmError> {
        *self.debug_calls.lock().unwrap() += 1;
        Ok(self.debug_reconfiguration.clone().expect("test did not expect a debug_reconfiguration call"))
    }

    async fn adjust_fault_scope(&self, _ctx: &Value, _prev: &Value, _curr: &Value, _fault: &Fault) -> Result<String, LlmError> {
        unimplemented!("not exercised by the improver")
    }

    async fn adjust_unit_test(&self, _ctx: &Value, _prev_yamls: &Value, _curr_yamls: &Value, _test_code: &str) -> Result<AdjustUnitTest, LlmError> {
        unimplemented!("not exercised by the improver")
    }
}

fn deployment_yaml(work_dir: &Path) -> File {
    File::text(work_dir.to_path_buf(), "mod_dir/mod_0/deployment.yaml", "replicas: 1\n")
}

#[tokio::test]
async fn applies_a_replace_mod_and_deploys_the_updated_yaml_set() {
    let dir = tempfile::tempdir().unwrap();
    let store = ce_store::LocalFileStore::new(dir.path());
    store.write_text("mod_dir/mod_0/deployment.yaml", "replicas: 1\n").await.unwrap();
    let ctx = RunContext::new("kind-chaos", "chaos-eater", dir.path());

    let reconfig = Reconfiguration {
        mod_k8s_yamls: vec![ManifestMod {
            mod_type: ModType::Replace,
            fname: "deployment.yaml".into(),
            explanation: "raise replica count so the pod-kill fault cannot starve the deployment".into(),
            code: Some("replicas: 3\n".into()),
        }],
    };
    let llm = FakeLlm::new(reconfig);
    let cluster = FakeCluster::new();
    let improver = Improver::new(&llm, &cluster, &store);

    let (accepted, yamls, mod_dir) = improver
        .improve(&ctx, &json!({}), &json!({}), &[deployment_yaml(dir.path())], Path::new("mod_dir/mod_0"), 1)
        .await
        .unwrap();

    assert_eq!(mod_dir, Path::new("mod_dir/mod_1"));
    assert_eq!(yamls.len(), 1);
    assert_eq!(yamls[0].content.as_text().unwrap(), "replicas: 3\n");
    assert_eq!(accepted.mod_k8s_yamls.len(), 1);
    assert_eq!(*cluster.applied.lock().unwrap(), vec!["deployment.yaml".to_string()]);
    let bundle = store.read_text("mod_dir/mod_1/deploy_bundle.txt").await.unwrap();
    assert!(bundle.contains("deployment.yaml"));
}

#[tokio::test]
async fn a_create_mod_appends_a_new_yaml_and_a_delete_mod_removes_one() {
    let dir = tempfile::tempdir().unwrap();
    let store = ce_store::LocalFileStore::new(dir.path());
    store.write_text("mod_dir/mod_0/deployment.yaml", "replicas: 1\n").await.unwrap();
    let ctx = RunContext::new("kind-chaos", "chaos-eater", dir.path());

    let reconfig = Reconfiguration {
        mod_k8s_yamls: vec![
            ManifestMod { mod_type: ModType::Delete, fname: "deployment.yaml".into(), explanation: "retiring the deployment".into(), code: None },
            ManifestMod {
                mod_type: ModType::Create,
                fname: "statefulset.yaml".into(),
                explanation: "replace with a StatefulSet so recovery preserves pod identity".into(),
                code: Some("kind: StatefulSet\n".into()),
            },
        ],
    };
    let llm = FakeLlm::new(reconfig);
    let cluster = FakeCluster::new();
    let improver = Improver::new(&llm, &cluster, &store);

    let (_, yamls, _) = improver
        .improve(&ctx, &json!({}), &json!({}), &[deployment_yaml(dir.path())], Path::new("mod_dir/mod_0"), 1)
        .await
        .unwrap();

    assert_eq!(yamls.len(), 1);
    assert_eq!(yamls[0].fname, "statefulset.yaml");
}

#[tokio::test]
async fn retries_with_debug_reconfiguration_after_a_rejected_deploy() {
    let dir = tempfile::tempdir().unwrap();
    let store = ce_store::LocalFileStore::new(dir.path());
    store.write_text("mod_dir/mod_0/deployment.yaml", "replicas: 1\n").await.unwrap();
    let ctx = RunContext::new("kind-chaos", "chaos-eater", dir.path());

    let bad = Reconfiguration {
        mod_k8s_yamls: vec![ManifestMod {
            mod_type: ModType::Replace,
            fname: "deployment.yaml".into(),
            explanation: "raise replicas".into(),
            code: Some("replicas: 3\n".into()),
        }],
    };
    let fixed = Reconfiguration {
        mod_k8s_yamls: vec![ManifestMod {
            mod_type: ModType::Replace,
            fname: "deployment.yaml".into(),
            explanation: "raise replicas within the namespace quota".into(),
            code: Some("replicas: 2\n".into()),
        }],
    };
    let llm = FakeLlm::new(bad).with_debug_reconfiguration(fixed);
    let cluster = FakeCluster::failing("deployment.yaml", 1);
    let improver = Improver::new(&llm, &cluster, &store);

    let (accepted, yamls, mod_dir) = improver
        .improve(&ctx, &json!({}), &json!({}), &[deployment_yaml(dir.path())], Path::new("mod_dir/mod_0"), 1)
        .await
        .unwrap();

    assert_eq!(mod_dir, Path::new("mod_dir/mod_2"));
    assert_eq!(yamls[0].content.as_text().unwrap(), "replicas: 2\n");
    assert_eq!(accepted.mod_k8s_yamls[0].code.as_deref(), Some("replicas: 2\n"));
    assert_eq!(*llm.debug_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn gives_up_after_max_retries_exhausted() {
    let dir = tempfile::tempdir().unwrap();
    let store = ce_store::LocalFileStore::new(dir.path());
    store.write_text("mod_dir/mod_0/deployment.yaml", "replicas: 1\n").await.unwrap();
    let ctx = RunContext::new("kind-chaos", "chaos-eater", dir.path());

    let reconfig = Reconfiguration {
        mod_k8s_yamls: vec![ManifestMod {
            mod_type: ModType::Replace,
            fname: "deployment.yaml".into(),
            explanation: "raise replicas".into(),
            code: Some("replicas: 3\n".into()),
        }],
    };
    let llm = FakeLlm::new(reconfig.clone()).with_debug_reconfiguration(reconfig);
    let cluster = FakeCluster::failing("deployment.yaml", 10);
    let improver = Improver::new(&llm, &cluster, &store).with_max_retries(2);

    let err = improver
        .improve(&ctx, &json!({}), &json!({}), &[deployment_yaml(dir.path())], Path::new("mod_dir/mod_0"), 1)
        .await
        .unwrap_err();

    match err {
        ImproveError::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 2),
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}
