// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("'{0}' is not a valid duration (expected a sequence of <n>d, <n>h, <n>m, <n>s components, or the literal \"0\")")]
    InvalidDuration(String),

    #[error("cannot compile a phase tree with zero tasks")]
    EmptyPhase,
}
