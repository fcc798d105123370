// SPDX-License-Identifier: Apache-2.0

use tracing_subscriber::EnvFilter;

/// Plain structured logging to stderr, filtered by `RUST_LOG` and
/// falling back to `info`. No exporter is wired up here: picking a
/// telemetry *backend* (Jaeger, OTLP, ...) is a deployment decision
/// this binary doesn't make on a user's behalf.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}
