// SPDX-License-Identifier: Apache-2.0

mod dns_chaos;
mod http_chaos;
mod io_chaos;
mod network_chaos;
mod pod_chaos;
mod stress_chaos;
mod time_chaos;

pub use dns_chaos::{DnsChaosAction, DnsChaosParams};
pub use http_chaos::{HttpChaosParams, HttpTarget, Patch, PatchBody, Replace};
pub use io_chaos::{AttrOverrideSpec, IoChaosAction, IoChaosParams, MistakeFilling, MistakeSpec, TimeSpec};
pub use network_chaos::{
    Bandwidth, Corrupt, Delay, Duplicate, Loss, NetworkChaosAction, NetworkChaosParams, NetworkDirection,
    NetworkTarget, Rate, Reorder,
};
pub use pod_chaos::{PodChaosAction, PodChaosParams};
pub use stress_chaos::{CpuStressor, MemoryStressor, StressChaosParams, Stressors};
pub use time_chaos::TimeChaosParams;
