// SPDX-License-Identifier: Apache-2.0

//! Runs one generated inspection script (probe or load test) as an
//! ephemeral Pod and reports its exit code and trimmed logs. Owns no
//! state across calls — every run applies, waits, collects, and
//! deletes within a single `run` invocation.

mod error;
mod runner;
#[cfg(test)]
mod tests;

pub use error::InspectionError;
pub use runner::InspectionRunner;
