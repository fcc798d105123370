// SPDX-License-Identifier: Apache-2.0

//! Duration parsing/formatting and the sweep-merge workflow-tree
//! compiler. Pure and synchronous throughout — callers that need I/O
//! (rendering to YAML, applying to a cluster) live in `ce_templates`
//! and `ce_cluster`.

pub mod duration;
pub mod error;
pub mod name_conflict;
pub mod sweep;

pub use duration::{format_duration, limit_string_length, parse_duration, sanitize_k8s_name, DEFAULT_DEADLINE_MARGIN};
pub use error::ScheduleError;
pub use name_conflict::NameConflictAvoider;
pub use sweep::{compile_phase_tree, group_by_grace_period, PhaseTree, ScheduledTask};
