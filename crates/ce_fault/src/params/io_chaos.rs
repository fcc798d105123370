// SPDX-License-Identifier: Apache-2.0

use crate::selectors::{SelectionMode, Selectors};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct TimeSpec {
    /// Specify either `sec` or `nsec`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sec: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsec: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct AttrOverrideSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ino: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atime: Option<TimeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime: Option<TimeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctime: Option<TimeSpec>,
    /// File type, see `fuser::FileType`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nlink: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdev: Option<u32>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MistakeFilling {
    Zero,
    Random,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct MistakeSpec {
    pub filling: MistakeFilling,
    /// Maximum number of errors per operation.
    pub max_occurrences: u32,
    /// Maximum length of each error, in bytes.
    pub max_length: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum IoChaosAction {
    Latency,
    Fault,
    AttrOverride,
    Mistake,
}

/// ref: https://chaos-mesh.org/docs/simulate-io-chaos-on-kubernetes/
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IoChaosParams {
    pub action: IoChaosAction,
    pub mode: SelectionMode,
    pub selector: Selectors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Mount point of the volume in the target container; must be the
    /// root directory of the mount.
    pub volume_path: String,
    /// A wildcard or single file path; unset applies to every file under `volume_path`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
    /// Probability of failure per operation, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_names: Option<Vec<String>>,
    /// Required when `action` is `latency`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
    /// Required when `action` is `fault`; an errno value (1 EPERM, 2
    /// ENOENT, 5 EIO, 6 ENXIO, 12 ENOMEM, 16 EBUSY, 17 EEXIST, 20
    /// ENOTDIR, 22 EINVAL, 24 EMFILE, 28 ENOSPC).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errno: Option<u32>,
    /// Required when `action` is `attrOverride`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attr: Option<AttrOverrideSpec>,
    /// Required when `action` is `mistake`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mistake: Option<MistakeSpec>,
}
