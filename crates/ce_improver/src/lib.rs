// SPDX-License-Identifier: Apache-2.0

//! Turns a failed experiment's analysis into a manifest reconfiguration,
//! applies it to a fresh copy of the previous mod directory, and
//! deploys it to the cluster — retrying against the oracle when a
//! deploy attempt is rejected.

mod error;
mod improver;

pub use error::ImproveError;
pub use improver::Improver;

#[cfg(test)]
mod tests;
