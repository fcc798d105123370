// SPDX-License-Identifier: Apache-2.0

use crate::selectors::{SelectionMode, Selectors};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A directional sub-selector: `target` narrows which packets a
/// `direction` applies to, separately from the fault's own `selector`.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkTarget {
    pub mode: SelectionMode,
    pub selector: Selectors,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reorder {
    /// Probability of reordering, range `[0, 100]` expressed as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Delay {
    /// Network latency, e.g. `"2ms"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder: Option<Reorder>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Loss {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Duplicate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Corrupt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrupt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<String>,
}

/// A standalone bandwidth-limit rate, usable alongside other `netem`
/// actions (unlike `Bandwidth`, which is mutually exclusive with them).
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    /// e.g. `"1mbps"`. Allows bit/kbit/mbit/gbit/tbit/bps/kbps/mbps/gbps/tbps units.
    pub rate: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bandwidth {
    pub rate: String,
    /// Number of bytes waiting in queue.
    pub limit: u32,
    /// Maximum number of bytes that can be sent instantaneously.
    pub buffer: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peakrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minburst: Option<u32>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NetworkChaosAction {
    Netem,
    Delay,
    Loss,
    Duplicate,
    Corrupt,
    Partition,
    Bandwidth,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NetworkDirection {
    From,
    To,
    Both,
}

/// ref: https://chaos-mesh.org/docs/simulate-network-chaos-on-kubernetes/ (ver. 2.6.2)
///
/// `bandwidth` is mutually exclusive with every `netem`-family action
/// above it; `rate` is not, since it composes with the others.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkChaosParams {
    pub action: NetworkChaosAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<NetworkDirection>,
    /// Only meaningful in combination with `direction`; `from`/`both`
    /// require this to be set when `action` is `netem`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<NetworkTarget>,
    pub mode: SelectionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub selector: Selectors,
    /// IPv4 addresses or domains; only effective with `direction: to`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_targets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<Delay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss: Option<Loss>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<Duplicate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrupt: Option<Corrupt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<Bandwidth>,
}
