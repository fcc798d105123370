// SPDX-License-Identifier: Apache-2.0

use crate::error::CompileError;
use ce_schedule::{
    compile_phase_tree, format_duration, sanitize_k8s_name, NameConflictAvoider, PhaseTree,
    ScheduledTask, DEFAULT_DEADLINE_MARGIN,
};
use ce_templates::{render, TemplateName};
use ce_types::{
    ChaosExperiment, ExperimentPlan, FaultInjectionTask, FaultKind, FaultScenario, File, Hypothesis,
    RunContext, SteadyState, TimeSchedule, UnitTestTask,
};
use serde_json::json;
use std::path::Path;

/// Binds names/deadlines/params onto a planned experiment and renders
/// the full Argo/Chaos-Mesh workflow manifest. Holds no state of its
/// own; every input needed to reproduce a given output is passed in.
pub struct ExperimentCompiler {
    deadline_margin: u64,
}

impl Default for ExperimentCompiler {
    fn default() -> Self {
        ExperimentCompiler { deadline_margin: DEFAULT_DEADLINE_MARGIN }
    }
}

impl ExperimentCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline_margin(mut self, margin: u64) -> Self {
        self.deadline_margin = margin;
        self
    }

    pub fn compile(
        &self,
        hypothesis: &Hypothesis,
        plan: &ExperimentPlan,
        ctx: &RunContext,
    ) -> Result<ChaosExperiment, CompileError> {
        let mut plan = plan.clone();
        let mut avoider = NameConflictAvoider::new();

        bind_unit_tests(&mut plan.pre_validation.unit_tests, "pre", &hypothesis.steady_states, &mut avoider, self.deadline_margin)?;
        bind_unit_tests(&mut plan.fault_injection.unit_tests, "fault", &hypothesis.steady_states, &mut avoider, self.deadline_margin)?;
        bind_unit_tests(&mut plan.post_validation.unit_tests, "post", &hypothesis.steady_states, &mut avoider, self.deadline_margin)?;
        bind_faults(&mut plan.fault_injection.fault_injection, &hypothesis.fault, &mut avoider)?;

        let (pre_tree, pre_total) = compile_phase_tree(
            "pre_validation",
            &scheduled_tasks(&plan.pre_validation.unit_tests, &[]),
        )?;
        let (fault_tree, fault_total) = compile_phase_tree(
            "fault_injection",
            &scheduled_tasks(&plan.fault_injection.unit_tests, &plan.fault_injection.fault_injection),
        )?;
        let (post_tree, post_total) = compile_phase_tree(
            "post_validation",
            &scheduled_tasks(&plan.post_validation.unit_tests, &[]),
        )?;

        let pre_time = pre_total + self.deadline_margin;
        let fault_time = fault_total + self.deadline_margin;
        let post_time = post_total + self.deadline_margin;
        let total_time = pre_time + fault_time + post_time;

        plan.time_schedule = TimeSchedule {
            total: total_time,
            pre_validation: pre_time,
            fault_injection: fault_time,
            post_validation: post_time,
        };

        let (pre_children, pre_grandchildren) = phase_children(&pre_tree)?;
        let (fault_children, fault_grandchildren) = phase_children(&fault_tree)?;
        let (post_children, post_grandchildren) = phase_children(&post_tree)?;

        let workflow_name = format!("chaos-experiment-{}", timestamp_suffix());
        let body = render(
            TemplateName::WorkflowMeta,
            &json!({
                "workflow_name": workflow_name,
                "total_time": total_time,
                "pre_validation_time": pre_time,
                "fault_injection_time": fault_time,
                "post_validation_time": post_time,
                "pre_validation_children": pre_children,
                "pre_validation_grandchildren": reindent(&pre_grandchildren, 4),
                "fault_injection_children": fault_children,
                "fault_injection_grandchildren": reindent(&fault_grandchildren, 4),
                "post_validation_children": post_children,
                "post_validation_grandchildren": reindent(&post_grandchildren, 4),
            }),
        )?;

        let mut leaves = Vec::new();
        for task in plan.pre_validation.unit_tests.iter().chain(plan.post_validation.unit_tests.iter()).chain(plan.fault_injection.unit_tests.iter()) {
            leaves.push(render_unit_test_leaf(task)?);
        }
        for task in plan.fault_injection.fault_injection.iter() {
            leaves.push(render_fault_leaf(task)?);
        }
        let leaves_block = reindent(&leaves.join("\n\n"), 4);

        let content = format!("{body}\n{leaves_block}\n");
        tracing::debug!(%workflow_name, total_time, "compiled experiment workflow");

        Ok(ChaosExperiment {
            plan,
            workflow_name,
            workflow: File::text(ctx.work_dir.clone(), "workflow.yaml", content),
        })
    }
}

fn timestamp_suffix() -> String {
    chrono::Utc::now().format("%Y%m%d%H%M%S").to_string()
}

fn bind_unit_tests(
    tasks: &mut [UnitTestTask],
    prefix: &str,
    steady_states: &[SteadyState],
    avoider: &mut NameConflictAvoider,
    deadline_margin: u64,
) -> Result<(), CompileError> {
    for task in tasks.iter_mut() {
        let base = format!("{prefix}-unittest-{}", sanitize_k8s_name(&task.name));
        task.workflow_name = avoider.avoid(&base);
        task.deadline = task.duration + deadline_margin;
        let steady_state = steady_states
            .iter()
            .find(|s| s.name == task.name)
            .ok_or_else(|| CompileError::UnknownSteadyState(task.name.clone()))?;
        task.file_path = steady_state.unit_test.path.to_string_lossy().into_owned();
    }
    Ok(())
}

fn bind_faults(
    tasks: &mut [FaultInjectionTask],
    scenario: &FaultScenario,
    avoider: &mut NameConflictAvoider,
) -> Result<(), CompileError> {
    for task in tasks.iter_mut() {
        let kind = FaultKind::from_name(&task.name)
            .ok_or_else(|| CompileError::UnknownFaultKind(task.name.clone()))?;
        let fault = scenario
            .faults
            .iter()
            .flatten()
            .find(|f| f.name == kind && f.name_id == task.name_id)
            .ok_or_else(|| CompileError::UnknownFault { kind: task.name.clone(), name_id: task.name_id })?;
        task.workflow_name = avoider.avoid(&format!("fault-{}", kind.name().to_ascii_lowercase()));
        task.deadline = task.duration;
        task.params = fault.params.clone();
    }
    Ok(())
}

fn scheduled_tasks(unit_tests: &[UnitTestTask], faults: &[FaultInjectionTask]) -> Vec<ScheduledTask> {
    unit_tests
        .iter()
        .map(|t| ScheduledTask { workflow_name: t.workflow_name.clone(), grace_period: t.grace_period, deadline: t.deadline })
        .chain(faults.iter().map(|t| ScheduledTask { workflow_name: t.workflow_name.clone(), grace_period: t.grace_period, deadline: t.deadline }))
        .collect()
}

/// Returns `(children_bullets, grandchildren_text)` for a phase's root
/// `Serial` node: the bullet list of its direct children's names (used
/// both by the `entry` template and the phase's own block), and the
/// concatenated rendering of every non-leaf descendant, deepest first.
fn phase_children(tree: &PhaseTree) -> Result<(String, String), CompileError> {
    let children = match tree {
        PhaseTree::Serial { children, .. } => children,
        other => unreachable!("compile_phase_tree always returns a Serial root, got {other:?}"),
    };
    let bullets = bullet_list(children.iter().map(PhaseTree::name));
    let mut grandchildren = Vec::new();
    for child in children {
        collect_grandchildren(child, &mut grandchildren)?;
    }
    Ok((bullets, grandchildren.join("\n\n")))
}

fn collect_grandchildren(node: &PhaseTree, out: &mut Vec<String>) -> Result<(), CompileError> {
    match node {
        PhaseTree::Leaf { .. } => Ok(()),
        PhaseTree::Suspend { name, deadline } => {
            out.push(render(TemplateName::Suspend, &json!({"name": name, "deadline": deadline}))?);
            Ok(())
        }
        PhaseTree::Parallel { name, deadline, children } => {
            for child in children {
                collect_grandchildren(child, out)?;
            }
            out.push(render(
                TemplateName::Groundchildren,
                &json!({"name": name, "template_type": "Parallel", "deadline": deadline, "children": bullet_list(children.iter().map(PhaseTree::name))}),
            )?);
            Ok(())
        }
        PhaseTree::Serial { name, deadline, children } => {
            for child in children {
                collect_grandchildren(child, out)?;
            }
            out.push(render(
                TemplateName::Groundchildren,
                &json!({"name": name, "template_type": "Serial", "deadline": deadline, "children": bullet_list(children.iter().map(PhaseTree::name))}),
            )?);
            Ok(())
        }
    }
}

fn bullet_list<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.map(|n| format!("- {n}")).collect::<Vec<_>>().join("\n")
}

fn reindent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| if line.is_empty() { String::new() } else { format!("{pad}{line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_unit_test_leaf(task: &UnitTestTask) -> Result<String, CompileError> {
    let is_python = Path::new(&task.file_path).extension().map(|e| e == "py").unwrap_or(false);
    if is_python {
        Ok(render(
            TemplateName::TaskProbe,
            &json!({
                "task_name": task.workflow_name,
                "deadline": task.deadline,
                "duration": task.duration,
                "unittest_path": task.file_path,
            }),
        )?)
    } else {
        Ok(render(
            TemplateName::TaskLoadTest,
            &json!({
                "task_name": task.workflow_name,
                "deadline": task.deadline,
                "duration": format_duration(task.duration),
                "unittest_path": task.file_path,
            }),
        )?)
    }
}

fn render_fault_leaf(task: &FaultInjectionTask) -> Result<String, CompileError> {
    let kind = FaultKind::from_name(&task.name)
        .ok_or_else(|| CompileError::UnknownFaultKind(task.name.clone()))?;
    let specs = serde_yaml::to_string(&task.params)?;
    Ok(render(
        TemplateName::Fault,
        &json!({
            "name": task.workflow_name,
            "fault_name": kind.name(),
            "fault_kind": kind.lower_camel(),
            "deadline": task.deadline,
            "specs": specs,
        }),
    )?)
}
