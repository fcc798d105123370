// SPDX-License-Identifier: Apache-2.0

use crate::selectors::{SelectionMode, Selectors};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_clock_ids() -> Vec<String> {
    vec!["CLOCK_REALTIME".to_string()]
}

/// ref: https://chaos-mesh.org/docs/simulate-time-chaos-on-kubernetes/
// TODO: validate clockIds against the clock_gettime(2) enumeration once a concrete need shows up.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeChaosParams {
    /// Length of the time offset, e.g. `"-5m"`.
    pub time_offset: String,
    #[serde(default = "default_clock_ids")]
    pub clock_ids: Vec<String>,
    pub mode: SelectionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_names: Option<Vec<String>>,
    pub selector: Selectors,
}
