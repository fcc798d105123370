// SPDX-License-Identifier: Apache-2.0

use crate::selectors::SelectionMode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Replace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    /// Base64-encoded request or response body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queries: Option<Vec<Vec<String>>>,
    /// Only effective when `target` is `Response`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct PatchBody {
    /// Currently only `"JSON"` is supported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Patch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<PatchBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queries: Option<Vec<Vec<String>>>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum HttpTarget {
    Request,
    Response,
}

/// ref: https://chaos-mesh.org/docs/simulate-http-chaos-on-kubernetes/
///
/// TLS-mode targets are not supported (`original_source` leaves this a
/// TODO too).
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpChaosParams {
    pub mode: SelectionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub target: HttpTarget,
    /// TCP port the target service listens on.
    pub port: u16,
    /// Only effective when `target` is `Response`. Unset applies to every status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Supports matching wildcards; unset applies to every path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub abort: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<Replace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Patch>,
}
