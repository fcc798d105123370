// SPDX-License-Identifier: Apache-2.0

//! Shared data model for the chaos-engineering cycle engine.
//!
//! Every type here is a plain, serde-serializable value. None of them
//! perform I/O or hold a cluster/LLM handle; that keeps the model safe
//! to snapshot to JSON and safe to hand around between crates as
//! read-only views, per the ownership rules in the engine design.

pub mod analysis;
pub mod context;
pub mod cycle_state;
pub mod error;
pub mod experiment;
pub mod fault;
pub mod file;
pub mod hypothesis;
pub mod inspection;
pub mod processed_data;
pub mod reconfiguration;
pub mod schedule;
pub mod steady_state;

pub use analysis::Analysis;
pub use context::RunContext;
pub use cycle_state::CycleState;
pub use error::ValidationError;
pub use experiment::{ExperimentResult, TaskStatus};
pub use fault::{Fault, FaultKind, FaultScenario};
pub use file::{File, FileContent};
pub use hypothesis::Hypothesis;
pub use inspection::{Inspection, ToolType};
pub use processed_data::ProcessedData;
pub use reconfiguration::{ManifestMod, ModType, Reconfiguration};
pub use schedule::{
    ChaosExperiment, ExperimentPlan, FaultInjectionPhase, FaultInjectionTask, TimeSchedule,
    UnitTestTask, ValidationPhase,
};
pub use steady_state::{SteadyState, Threshold};
