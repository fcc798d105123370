// SPDX-License-Identifier: Apache-2.0

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pure LLM output explaining why an experiment result passed or
/// failed. Not machine-validated — the engine persists it and hands it
/// to the improver verbatim.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Analysis {
    pub report: String,
}
