// SPDX-License-Identifier: Apache-2.0

//! Per-kind Chaos Mesh fault parameter schemas and the builder that
//! proposes, refines, and dry-run-validates a `FaultScenario`.

mod builder;
mod error;
mod manifest;
pub mod params;
mod schema;
mod selectors;

pub use builder::FaultScenarioBuilder;
pub use error::BuildError;
pub use manifest::{resource_name, standalone_manifest};
pub use schema::schema_for_kind;
pub use selectors::{PodPhase, SelectionMode, SetBasedRequirement, SetOperator, Selectors};
