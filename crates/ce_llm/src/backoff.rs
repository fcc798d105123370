// SPDX-License-Identifier: Apache-2.0

use rand::Rng;
use std::time::Duration;

/// Exponential backoff with full jitter, capped at `max`: attempt 0
/// returns a value in `[0, base]`, attempt 1 in `[0, 2*base]`, and so
/// on, never exceeding `max`.
pub fn backoff_with_jitter(attempt: u32, base: Duration, max: Duration) -> Duration {
    let exp = base.as_millis().saturating_mul(1u128 << attempt.min(20));
    let capped = exp.min(max.as_millis());
    let jittered = rand::thread_rng().gen_range(0..=capped.max(1));
    Duration::from_millis(jittered as u64)
}
