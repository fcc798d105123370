// SPDX-License-Identifier: Apache-2.0

use crate::error::ClusterError;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, Default)]
struct ContainerStateTerminated {
    #[serde(rename = "exitCode")]
    exit_code: i32,
}

#[derive(Clone, Debug, Deserialize, Default)]
struct ContainerState {
    terminated: Option<ContainerStateTerminated>,
}

#[derive(Clone, Debug, Deserialize, Default)]
struct ContainerStatus {
    state: Option<ContainerState>,
}

#[derive(Clone, Debug, Deserialize, Default)]
struct PodStatusSection {
    phase: Option<String>,
    #[serde(rename = "containerStatuses")]
    container_statuses: Option<Vec<ContainerStatus>>,
}

/// Deserialized from `kubectl get pod <name> -o json`. Carries just
/// enough of the object to answer "is it ready" or "what did its
/// container exit with" — never the full Pod spec.
#[derive(Clone, Debug, Deserialize)]
pub struct PodStatus {
    #[serde(default)]
    status: PodStatusSection,
}

impl PodStatus {
    pub fn phase(&self) -> Option<&str> {
        self.status.phase.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.phase() == Some("Running")
    }

    /// The first terminated container's exit code, per the inspection
    /// runner's and experiment runner's shared contract: a pod with no
    /// `containerStatuses` entries at all is an adapter-level parse
    /// error (the pod hasn't started scheduling), not "not yet
    /// terminated".
    pub fn terminated_exit_code(&self) -> Result<Option<i32>, ClusterError> {
        let statuses = self.status.container_statuses.as_ref().ok_or_else(|| ClusterError::Parse {
            context: "pod status".to_string(),
            message: "containerStatuses missing".to_string(),
        })?;
        if statuses.is_empty() {
            return Err(ClusterError::Parse {
                context: "pod status".to_string(),
                message: "containerStatuses is empty".to_string(),
            });
        }
        Ok(statuses
            .iter()
            .find_map(|s| s.state.as_ref()?.terminated.as_ref())
            .map(|t| t.exit_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_terminated_exit_code() {
        let json = serde_json::json!({
            "status": {
                "phase": "Succeeded",
                "containerStatuses": [
                    {"state": {"terminated": {"exitCode": 0}}}
                ]
            }
        });
        let status: PodStatus = serde_json::from_value(json).unwrap();
        assert_eq!(status.terminated_exit_code().unwrap(), Some(0));
    }

    #[test]
    fn missing_container_statuses_is_a_parse_error() {
        let json = serde_json::json!({"status": {"phase": "Pending"}});
        let status: PodStatus = serde_json::from_value(json).unwrap();
        assert!(status.terminated_exit_code().is_err());
    }

    #[test]
    fn non_terminated_container_yields_none() {
        let json = serde_json::json!({
            "status": {
                "phase": "Running",
                "containerStatuses": [{"state": {"running": {}}}]
            }
        });
        let status: PodStatus = serde_json::from_value(json).unwrap();
        assert_eq!(status.terminated_exit_code().unwrap(), None);
    }
}
