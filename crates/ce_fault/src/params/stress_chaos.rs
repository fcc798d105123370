// SPDX-License-Identifier: Apache-2.0

use crate::selectors::{SelectionMode, Selectors};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ref: https://chaos-mesh.org/docs/simulate-heavy-stress-on-kubernetes/#memorystressor
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStressor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<u32>,
    /// Total memory to occupy, e.g. `"256MB"`, or a percentage of total memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oom_score_adj: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct CpuStressor {
    pub workers: u32,
    /// Percentage of CPU occupied per worker; the fault's total load is `workers * load`.
    pub load: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Stressors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryStressor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuStressor>,
}

/// ref: https://chaos-mesh.org/docs/simulate-heavy-stress-on-kubernetes/
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StressChaosParams {
    pub mode: SelectionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stressors: Option<Stressors>,
    /// Raw `stress-ng` parameters for stress beyond the structured CPU/memory stressors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stressng_stressors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_names: Option<Vec<String>>,
    pub selector: Selectors,
}
