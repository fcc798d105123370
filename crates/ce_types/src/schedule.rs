// SPDX-License-Identifier: Apache-2.0

use crate::file::File;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aggregate timing envelope for one experiment. `total` is derived,
/// never set directly — see `ce_schedule` for the arithmetic and the
/// canonical `deadline_margin` default (300s).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema)]
pub struct TimeSchedule {
    pub total: u64,
    pub pre_validation: u64,
    pub fault_injection: u64,
    pub post_validation: u64,
}

impl TimeSchedule {
    pub fn expected_total(&self, deadline_margin: u64) -> u64 {
        self.pre_validation + self.fault_injection + self.post_validation + 3 * deadline_margin
    }

    pub fn is_consistent(&self, deadline_margin: u64) -> bool {
        self.total == self.expected_total(deadline_margin)
    }
}

/// One planned unit-test task, before binding to a rendered workflow.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct UnitTestTask {
    pub name: String,
    pub workflow_name: String,
    pub grace_period: u64,
    pub duration: u64,
    pub deadline: u64,
    pub file_path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct ValidationPhase {
    pub thought: String,
    pub unit_tests: Vec<UnitTestTask>,
}

/// One planned fault task, before binding to a rendered workflow.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct FaultInjectionTask {
    pub name: String,
    pub name_id: u32,
    pub workflow_name: String,
    pub grace_period: u64,
    pub duration: u64,
    pub deadline: u64,
    pub params: serde_json::Value,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct FaultInjectionPhase {
    pub thought: String,
    pub unit_tests: Vec<UnitTestTask>,
    pub fault_injection: Vec<FaultInjectionTask>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExperimentPlan {
    pub time_schedule: TimeSchedule,
    pub pre_validation: ValidationPhase,
    pub fault_injection: FaultInjectionPhase,
    pub post_validation: ValidationPhase,
    pub summary: String,
}

/// A compiled, ready-to-apply experiment. `workflow_name` is enforced
/// DNS-1123-label compatible and prefixed `chaos-experiment-<timestamp>`
/// by the compiler; this type doesn't re-validate that on construction
/// since only the compiler builds one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChaosExperiment {
    pub plan: ExperimentPlan,
    pub workflow_name: String,
    pub workflow: File,
}
