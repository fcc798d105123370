// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct WorkflowCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
}

/// The subset of a Chaos Mesh `WorkflowNode`'s status the runner needs
/// — not a full typed CRD model, since the rest of the object is
/// never inspected.
#[derive(Clone, Debug, Deserialize)]
pub struct WorkflowNode {
    pub name: String,
    #[serde(default)]
    pub conditions: Vec<WorkflowCondition>,
}

impl WorkflowNode {
    /// A workflow is terminal once its `Accomplished` condition's
    /// status is anything other than `"False"` (including when the
    /// condition hasn't appeared yet, which this treats as not yet
    /// accomplished).
    pub fn is_accomplished(&self) -> bool {
        self.conditions
            .iter()
            .find(|c| c.condition_type == "Accomplished")
            .map(|c| c.status != "False")
            .unwrap_or(false)
    }
}
