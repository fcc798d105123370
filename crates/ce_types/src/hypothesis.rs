// SPDX-License-Identifier: Apache-2.0

use crate::fault::FaultScenario;
use crate::steady_state::SteadyState;
use serde::{Deserialize, Serialize};

/// What the cycle is trying to falsify: a set of steady states the
/// system should hold, paired with the fault scenario expected to
/// challenge them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hypothesis {
    pub steady_states: Vec<SteadyState>,
    pub fault: FaultScenario,
}

impl Hypothesis {
    /// True if every `steady_states[i].id` is unique. The compiler
    /// keys on these ids when it generates unit-test file names, so a
    /// duplicate would silently overwrite one steady state's test with
    /// another's.
    pub fn has_unique_steady_state_ids(&self) -> bool {
        let mut ids: Vec<&str> = self.steady_states.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        ids.len() == before
    }
}
