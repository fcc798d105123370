// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Terminal outcome of one task pod (a unit test or a fault). Exit
/// code 0 means the task's assertions held; anything else is a
/// failure the analysis phase must explain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskStatus {
    pub exit_code: i32,
    pub logs: String,
}

impl TaskStatus {
    pub fn passed(&self) -> bool {
        self.exit_code == 0
    }
}

/// Keyed by each task's `workflow_name`, as assigned by the compiler.
/// `BTreeMap` keeps iteration order stable, which matters when the
/// result is serialized into a snapshot for a human to diff across
/// retries.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ExperimentResult {
    pub pod_statuses: BTreeMap<String, TaskStatus>,
}

impl ExperimentResult {
    pub fn all_passed(&self) -> bool {
        self.pod_statuses.values().all(TaskStatus::passed)
    }

    pub fn failing(&self) -> impl Iterator<Item = (&String, &TaskStatus)> {
        self.pod_statuses.iter().filter(|(_, s)| !s.passed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_passed_true_when_empty() {
        let r = ExperimentResult::default();
        assert!(r.all_passed());
    }

    #[test]
    fn all_passed_false_on_any_nonzero() {
        let mut r = ExperimentResult::default();
        r.pod_statuses.insert(
            "pre-unittest-latency".into(),
            TaskStatus { exit_code: 0, logs: String::new() },
        );
        r.pod_statuses.insert(
            "fault-podchaos".into(),
            TaskStatus { exit_code: 1, logs: "boom".into() },
        );
        assert!(!r.all_passed());
        assert_eq!(r.failing().count(), 1);
    }
}
