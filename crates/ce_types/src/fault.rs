// SPDX-License-Identifier: Apache-2.0

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The closed enumeration of fault kinds the fault tool supports.
/// Adding a kind means adding one variant plus one schema/template
/// entry in `ce_fault` — this type is never extended piecemeal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum FaultKind {
    PodChaos,
    NetworkChaos,
    DnsChaos,
    HttpChaos,
    StressChaos,
    IoChaos,
    TimeChaos,
}

impl FaultKind {
    pub const ALL: [FaultKind; 7] = [
        FaultKind::PodChaos,
        FaultKind::NetworkChaos,
        FaultKind::DnsChaos,
        FaultKind::HttpChaos,
        FaultKind::StressChaos,
        FaultKind::IoChaos,
        FaultKind::TimeChaos,
    ];

    /// The PascalCase name as the fault tool's workflow YAML spells it
    /// (e.g. `"PodChaos"`), used for both LLM-facing names and
    /// template rendering.
    pub fn name(&self) -> &'static str {
        match self {
            FaultKind::PodChaos => "PodChaos",
            FaultKind::NetworkChaos => "NetworkChaos",
            FaultKind::DnsChaos => "DnsChaos",
            FaultKind::HttpChaos => "HttpChaos",
            FaultKind::StressChaos => "StressChaos",
            FaultKind::IoChaos => "IoChaos",
            FaultKind::TimeChaos => "TimeChaos",
        }
    }

    /// Lower-camel prefix before "Chaos", e.g. `PodChaos` -> `podChaos`,
    /// matching the fault tool's `kind:`-adjacent field naming.
    pub fn lower_camel(&self) -> String {
        let name = self.name();
        let chaos_idx = name.len() - "Chaos".len();
        let (prefix, suffix) = name.split_at(chaos_idx);
        let mut lowered = prefix.to_ascii_lowercase();
        lowered.push_str(suffix);
        lowered
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// One typed disturbance. `name_id` disambiguates repeated faults of
/// the same kind within a scenario (e.g. two independent `PodChaos`
/// waves), and is what the compiler uses to bind params back to the
/// plan's `fault_injection` entries.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Fault {
    pub name: FaultKind,
    pub name_id: u32,
    pub params: serde_json::Value,
}

/// An ordered sequence of waves. The outer list is temporal order;
/// each inner list ("wave") is injected simultaneously.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct FaultScenario {
    pub event: String,
    pub faults: Vec<Vec<Fault>>,
    pub description: String,
}
