// SPDX-License-Identifier: Apache-2.0

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Chaos Mesh's selection mode: how many of the matched pods actually
/// get the fault. Shared by every fault kind's `mode` field.
/// ref: https://chaos-mesh.org/docs/define-chaos-experiment-scope/
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    One,
    All,
    Fixed,
    FixedPercent,
    RandomMaxPercent,
}

/// ref: https://kubernetes.io/docs/concepts/overview/working-with-objects/labels/#resources-that-support-set-based-requirements
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum SetOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct SetBasedRequirement {
    /// Label key.
    pub key: String,
    pub operator: SetOperator,
    /// Must be non-empty when `operator` is `In` or `NotIn`.
    pub values: Vec<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

/// ref: https://chaos-mesh.org/docs/define-chaos-experiment-scope/
///
/// Every field is optional; an absent selector doesn't narrow the
/// match. `pods`, if set, overrides every other selector per Chaos
/// Mesh's own precedence rule.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Selectors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_selectors: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_selectors: Option<Vec<SetBasedRequirement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_selectors: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_selectors: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_phase_selectors: Option<Vec<PodPhase>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_selectors: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<String>>,
    /// Namespace -> pod names. Overrides every other selector when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pods: Option<BTreeMap<String, Vec<String>>>,
}
