// SPDX-License-Identifier: Apache-2.0

//! File access scoped to one cycle's working directory, plus atomic
//! `CycleState` snapshotting.

mod error;
mod store;

pub use error::StoreError;
pub use store::{LocalFileStore, SNAPSHOT_KEY};
