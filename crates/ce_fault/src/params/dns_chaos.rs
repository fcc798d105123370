// SPDX-License-Identifier: Apache-2.0

use crate::selectors::{SelectionMode, Selectors};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DnsChaosAction {
    Random,
    Error,
}

/// ref: https://chaos-mesh.org/docs/simulate-dns-chaos-on-kubernetes/
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DnsChaosParams {
    pub action: DnsChaosAction,
    pub mode: SelectionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Domain templates the fault applies to (`?`/`*` wildcards, `*`
    /// only valid at the end). Unset means every domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    pub selector: Selectors,
}
