// SPDX-License-Identifier: Apache-2.0

use crate::error::ScheduleError;
use crate::name_conflict::NameConflictAvoider;
use std::collections::BTreeMap;

/// One task (unit test or fault) ready to be placed into a phase's
/// workflow tree. `deadline` already carries the task's full envelope
/// (`duration + deadline_margin` for unit tests, `duration` for
/// faults, per the compiler's binding rule) — grouping and span math
/// operate on `deadline`, never on `duration` directly.
#[derive(Clone, Debug)]
pub struct ScheduledTask {
    pub workflow_name: String,
    pub grace_period: u64,
    pub deadline: u64,
}

/// A node in a compiled phase's workflow tree. `Leaf` is a task
/// template reference; `Parallel`/`Serial`/`Suspend` are the three
/// generated wrapper templates the renderer turns into
/// `Workflow`/`Template` YAML nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhaseTree {
    Leaf {
        workflow_name: String,
        deadline: u64,
    },
    Parallel {
        name: String,
        deadline: u64,
        children: Vec<PhaseTree>,
    },
    Serial {
        name: String,
        deadline: u64,
        children: Vec<PhaseTree>,
    },
    Suspend {
        name: String,
        deadline: u64,
    },
}

impl PhaseTree {
    pub fn deadline(&self) -> u64 {
        match self {
            PhaseTree::Leaf { deadline, .. }
            | PhaseTree::Parallel { deadline, .. }
            | PhaseTree::Serial { deadline, .. }
            | PhaseTree::Suspend { deadline, .. } => *deadline,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PhaseTree::Leaf { workflow_name, .. } => workflow_name,
            PhaseTree::Parallel { name, .. }
            | PhaseTree::Serial { name, .. }
            | PhaseTree::Suspend { name, .. } => name,
        }
    }
}

struct ParaGroup {
    start: u64,
    end: u64,
    span: u64,
    tasks: Vec<ScheduledTask>,
}

/// Buckets tasks by shared `grace_period` — tasks starting at the same
/// instant are candidates for a single `Parallel` node.
pub fn group_by_grace_period(tasks: &[ScheduledTask]) -> BTreeMap<u64, Vec<ScheduledTask>> {
    let mut groups: BTreeMap<u64, Vec<ScheduledTask>> = BTreeMap::new();
    for task in tasks {
        groups.entry(task.grace_period).or_default().push(task.clone());
    }
    groups
}

fn para_groups_from(grouped: BTreeMap<u64, Vec<ScheduledTask>>) -> Vec<ParaGroup> {
    let mut groups: Vec<ParaGroup> = grouped
        .into_iter()
        .map(|(grace_period, tasks)| {
            let span = tasks.iter().map(|t| t.deadline).max().unwrap_or(0);
            ParaGroup {
                start: grace_period,
                end: grace_period + span,
                span,
                tasks,
            }
        })
        .collect();
    groups.sort_by_key(|g| g.start);
    groups
}

struct OverlapEntry {
    suspend_time: u64,
    group: ParaGroup,
}

struct OverlappedGroup {
    span: u64,
    entries: Vec<OverlapEntry>,
}

/// Merges time-overlapping `ParaGroup`s into `OverlappedGroup`s. Two
/// groups overlap when the next one's start falls before the running
/// group's current end; each merged entry records how long it must
/// `Suspend` after the group's own start before it begins.
fn group_by_overlap(groups: Vec<ParaGroup>) -> Vec<OverlappedGroup> {
    let mut groups = groups.into_iter();
    let first = match groups.next() {
        Some(g) => g,
        None => return Vec::new(),
    };

    let mut result = Vec::new();
    let mut current_start = first.start;
    let mut current_end = first.end;
    let mut span = first.span;
    let mut entries = vec![OverlapEntry {
        suspend_time: first.start,
        group: first,
    }];

    for group in groups {
        if group.start < current_end {
            let suspend_time = group.start - current_start;
            if current_end < group.end {
                span += group.end - current_end;
            }
            current_end = current_end.max(group.end);
            entries.push(OverlapEntry {
                suspend_time,
                group,
            });
        } else {
            result.push(OverlappedGroup {
                span,
                entries: std::mem::take(&mut entries),
            });
            span = group.span;
            current_start = group.start;
            current_end = group.end;
            entries.push(OverlapEntry {
                suspend_time: 0,
                group,
            });
        }
    }
    result.push(OverlappedGroup { span, entries });
    result
}

fn parallel_node(
    avoider: &mut NameConflictAvoider,
    phase_slug: &str,
    base: &str,
    span: u64,
    tasks: &[ScheduledTask],
) -> PhaseTree {
    if tasks.len() == 1 {
        PhaseTree::Leaf {
            workflow_name: tasks[0].workflow_name.clone(),
            deadline: tasks[0].deadline,
        }
    } else {
        PhaseTree::Parallel {
            name: avoider.avoid(&format!("{phase_slug}-{base}")),
            deadline: span,
            children: tasks
                .iter()
                .map(|t| PhaseTree::Leaf {
                    workflow_name: t.workflow_name.clone(),
                    deadline: t.deadline,
                })
                .collect(),
        }
    }
}

/// Direct port of the sweep-merge algorithm: groups tasks by shared
/// start time, merges overlapping groups, and wraps each merged group
/// in the minimal Serial/Parallel/Suspend shape needed to express it.
/// Returns the phase's root node (always `Serial`) and its total
/// deadline — the sum of every top-level child's own deadline,
/// computed directly from the tree rather than re-derived by matching
/// generated names back to a flat template list.
pub fn compile_phase_tree(
    phase_name: &str,
    tasks: &[ScheduledTask],
) -> Result<(PhaseTree, u64), ScheduleError> {
    if tasks.is_empty() {
        return Err(ScheduleError::EmptyPhase);
    }
    let phase_slug = phase_name.replace('_', "-");
    let grouped = group_by_grace_period(tasks);
    let para_groups = para_groups_from(grouped);
    let overlapped_groups = group_by_overlap(para_groups);

    let mut avoider = NameConflictAvoider::new();
    let mut children = Vec::with_capacity(overlapped_groups.len());

    for overlapped in overlapped_groups {
        let child = if overlapped.entries.len() == 1 {
            let entry = overlapped.entries.into_iter().next().unwrap();
            parallel_node(
                &mut avoider,
                &phase_slug,
                "parallel-workflows",
                entry.group.span,
                &entry.group.tasks,
            )
        } else {
            let mut overlapped_nodes = Vec::with_capacity(overlapped.entries.len());
            for entry in overlapped.entries {
                if entry.suspend_time == 0 {
                    overlapped_nodes.push(parallel_node(
                        &mut avoider,
                        &phase_slug,
                        "parallel-workflow",
                        entry.group.span,
                        &entry.group.tasks,
                    ));
                } else {
                    let inner = parallel_node(
                        &mut avoider,
                        &phase_slug,
                        "parallel-workflows",
                        entry.group.span,
                        &entry.group.tasks,
                    );
                    let suspend = PhaseTree::Suspend {
                        name: avoider.avoid(&format!("{phase_slug}-suspend")),
                        deadline: entry.suspend_time,
                    };
                    overlapped_nodes.push(PhaseTree::Serial {
                        name: avoider.avoid(&format!("{phase_slug}-suspend-workflow")),
                        deadline: entry.suspend_time + inner.deadline(),
                        children: vec![suspend, inner],
                    });
                }
            }
            PhaseTree::Parallel {
                name: avoider.avoid(&format!("{phase_slug}-overlapped-workflows")),
                deadline: overlapped.span,
                children: overlapped_nodes,
            }
        };
        children.push(child);
    }

    let total_deadline = children.iter().map(PhaseTree::deadline).sum();
    Ok((
        PhaseTree::Serial {
            name: format!("{phase_slug}-phase"),
            deadline: total_deadline,
            children,
        },
        total_deadline,
    ))
}
