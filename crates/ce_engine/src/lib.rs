// SPDX-License-Identifier: Apache-2.0

//! The top-level cycle state machine: Preprocess -> Hypothesis -> Plan
//! -> Run -> (Postprocess | Analyze -> Improve -> Replan -> Run)*,
//! with per-phase retry caps and invariant checks between transitions.
//! Every other crate in the workspace is a tool this one calls; this
//! is the only crate that owns mutable cycle state.

mod engine;
mod error;
mod types;

pub use engine::CycleEngine;
pub use error::EngineError;
pub use types::{CycleOutput, CyclePhase, EngineInput, PhaseLog};
