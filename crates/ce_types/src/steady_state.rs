// SPDX-License-Identifier: Apache-2.0

use crate::file::File;
use crate::inspection::Inspection;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Threshold {
    pub value: String,
    pub rationale: String,
}

/// A measurable, named property whose threshold defines normal
/// behavior. Only valid (per the builder's contract) once `unit_test`
/// has run to exit 0 against the pre-fault cluster — this type itself
/// doesn't enforce that, the builder does, because enforcing it here
/// would require embedding an async runner in a pure data type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SteadyState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub inspection: Inspection,
    pub threshold: Threshold,
    pub unit_test: File,
}
