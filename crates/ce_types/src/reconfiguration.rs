// SPDX-License-Identifier: Apache-2.0

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModType {
    Create,
    Replace,
    Delete,
}

/// One manifest-level edit proposed by the improver. `code` carries
/// the new yaml content and is required unless `mod_type` is `Delete`,
/// in which case `fname` alone identifies what to remove.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct ManifestMod {
    pub mod_type: ModType,
    pub fname: String,
    pub explanation: String,
    pub code: Option<String>,
}

impl ManifestMod {
    pub fn is_well_formed(&self) -> bool {
        match self.mod_type {
            ModType::Delete => true,
            ModType::Create | ModType::Replace => self.code.is_some(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Reconfiguration {
    pub mod_k8s_yamls: Vec<ManifestMod>,
}

impl Reconfiguration {
    pub fn is_well_formed(&self) -> bool {
        self.mod_k8s_yamls.iter().all(ManifestMod::is_well_formed)
    }
}
