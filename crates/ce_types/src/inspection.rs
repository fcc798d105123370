// SPDX-License-Identifier: Apache-2.0

use crate::file::File;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    ProbeScript,
    LoadTest,
}

/// A generated probe, bound to the interpreter/tool that runs it.
/// `result` is populated only after a successful run through the
/// inspection runner — before that it's `None`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Inspection {
    pub tool_type: ToolType,
    /// Canonical duration string, e.g. "30s" — see `ce_schedule` for
    /// the parse/format boundary; this crate stores it verbatim.
    pub duration: String,
    pub script: File,
    pub result: Option<String>,
}

impl Inspection {
    pub fn new(tool_type: ToolType, duration: impl Into<String>, script: File) -> Self {
        Inspection {
            tool_type,
            duration: duration.into(),
            script,
            result: None,
        }
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }
}
