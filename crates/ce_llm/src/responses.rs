// SPDX-License-Identifier: Apache-2.0

use ce_types::{Threshold, ToolType};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct DraftSteadyState {
    pub thought: String,
    pub manifest: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct ToolSpec {
    pub duration: String,
    pub vus: Option<u32>,
    pub script: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct DesignInspection {
    pub thought: String,
    pub tool_type: ToolType,
    pub tool: ToolSpec,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct DefineThreshold {
    pub thought: String,
    pub threshold: Threshold,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct WriteUnitTest {
    pub thought: String,
    pub code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct CheckCompletion {
    pub thought: String,
    pub requires_addition: bool,
}

/// Response of `adjust_unit_test`: `code` is `None` when the existing
/// test still applies unchanged to the new manifest set.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct AdjustUnitTest {
    pub thought: String,
    pub code: Option<String>,
}

/// Response of `assume_app`: a guess at the real-world service the
/// ingested manifests implement, used to ground later prompts.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct K8sAppAssumption {
    pub thought: String,
    pub k8s_application: String,
}
