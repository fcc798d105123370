// SPDX-License-Identifier: Apache-2.0

mod builder;
mod error;

pub use builder::SteadyStateBuilder;
pub use error::BuildError;

#[cfg(test)]
mod tests;
