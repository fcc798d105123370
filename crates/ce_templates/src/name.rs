// SPDX-License-Identifier: Apache-2.0

/// The fixed, enumerated set of templates the renderer knows about —
/// matching exactly one embedded `.hbs` asset apiece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateName {
    PodProbe,
    PodLoadTest,
    WorkflowMeta,
    TaskProbe,
    TaskLoadTest,
    Fault,
    Groundchildren,
    Suspend,
    DeployBundle,
}

impl TemplateName {
    pub fn key(&self) -> &'static str {
        match self {
            TemplateName::PodProbe => "pod_probe",
            TemplateName::PodLoadTest => "pod_load_test",
            TemplateName::WorkflowMeta => "workflow_meta",
            TemplateName::TaskProbe => "task_probe",
            TemplateName::TaskLoadTest => "task_load_test",
            TemplateName::Fault => "fault",
            TemplateName::Groundchildren => "groundchildren",
            TemplateName::Suspend => "suspend",
            TemplateName::DeployBundle => "deploy_bundle",
        }
    }

    pub const ALL: [TemplateName; 9] = [
        TemplateName::PodProbe,
        TemplateName::PodLoadTest,
        TemplateName::WorkflowMeta,
        TemplateName::TaskProbe,
        TemplateName::TaskLoadTest,
        TemplateName::Fault,
        TemplateName::Groundchildren,
        TemplateName::Suspend,
        TemplateName::DeployBundle,
    ];
}
