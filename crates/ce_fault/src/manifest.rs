// SPDX-License-Identifier: Apache-2.0

use ce_schedule::sanitize_k8s_name;
use ce_types::Fault;
use serde::Serialize;

const API_VERSION: &str = "chaos-mesh.org/v1alpha1";

#[derive(Serialize)]
struct Metadata {
    name: String,
    namespace: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChaosResource<'a> {
    api_version: &'static str,
    kind: &'static str,
    metadata: Metadata,
    spec: &'a serde_json::Value,
}

/// The DNS-1123 name a standalone dry-run manifest gets: unique per
/// `(kind, name_id)` so refining two faults of the same kind in
/// parallel never collide.
pub fn resource_name(fault: &Fault) -> String {
    sanitize_k8s_name(&format!("{}-{}", fault.name.lower_camel(), fault.name_id))
}

/// Renders a single-document Chaos Mesh custom resource for `fault`,
/// suitable for a server-side dry-run apply. This is not one of
/// `ce_templates`' registered templates: it's a flat four-field
/// envelope around data already held as a `serde_json::Value`, better
/// served by a direct `serde_yaml` serialization than a Handlebars
/// pass.
pub fn standalone_manifest(fault: &Fault, namespace: &str) -> Result<String, serde_yaml::Error> {
    let resource = ChaosResource {
        api_version: API_VERSION,
        kind: fault.name.name(),
        metadata: Metadata { name: resource_name(fault), namespace: namespace.to_string() },
        spec: &fault.params,
    };
    serde_yaml::to_string(&resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ce_types::FaultKind;

    #[test]
    fn renders_expected_envelope() {
        let fault = Fault {
            name: FaultKind::PodChaos,
            name_id: 0,
            params: serde_json::json!({"action": "pod-kill", "mode": "one", "selector": {}}),
        };
        let yaml = standalone_manifest(&fault, "chaos-eater").unwrap();
        assert!(yaml.contains("apiVersion: chaos-mesh.org/v1alpha1"));
        assert!(yaml.contains("kind: PodChaos"));
        assert!(yaml.contains("namespace: chaos-eater"));
        assert!(yaml.contains("action: pod-kill"));
    }
}
