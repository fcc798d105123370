// SPDX-License-Identifier: Apache-2.0

use crate::selectors::{SelectionMode, Selectors};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PodChaosAction {
    PodKill,
    ContainerKill,
}

/// ref: https://chaos-mesh.org/docs/simulate-pod-chaos-on-kubernetes/ (ver. 2.6.2)
///
/// `pod-failure` is deliberately excluded from `PodChaosAction`: Chaos
/// Mesh only honors it when the target's container already defines
/// both liveness and readiness probes, a precondition this tool has no
/// way to check up front.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PodChaosParams {
    pub action: PodChaosAction,
    pub mode: SelectionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub selector: Selectors,
    /// Required when `action` is `container-kill`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_names: Option<Vec<String>>,
}
