// SPDX-License-Identifier: Apache-2.0

use crate::params::{
    DnsChaosParams, HttpChaosParams, IoChaosParams, NetworkChaosParams, PodChaosParams, StressChaosParams,
    TimeChaosParams,
};
use ce_types::FaultKind;
use schemars::schema::RootSchema;
use schemars::schema_for;

/// The JSON schema a fault kind's `params` must validate against,
/// handed to the LLM gateway alongside the refinement prompt so the
/// model sees the exact shape expected — the fault tool's own
/// server-side dry-run (`ClusterAdapter::dry_run_apply`) is what
/// actually enforces it.
pub fn schema_for_kind(kind: FaultKind) -> RootSchema {
    match kind {
        FaultKind::PodChaos => schema_for!(PodChaosParams),
        FaultKind::NetworkChaos => schema_for!(NetworkChaosParams),
        FaultKind::DnsChaos => schema_for!(DnsChaosParams),
        FaultKind::HttpChaos => schema_for!(HttpChaosParams),
        FaultKind::StressChaos => schema_for!(StressChaosParams),
        FaultKind::IoChaos => schema_for!(IoChaosParams),
        FaultKind::TimeChaos => schema_for!(TimeChaosParams),
    }
}
