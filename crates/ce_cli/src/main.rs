// SPDX-License-Identifier: Apache-2.0

//! Entry point: parses CLI flags into an `EngineInput`, wires the
//! concrete `ClusterAdapter`/`LlmGateway` implementations into
//! `CycleEngine`, and maps the cycle's outcome to a process exit code.

mod cli;
mod config;
mod telemetry;

use anyhow::{Context, Result};
use ce_cluster::KubeAdapter;
use ce_engine::{CycleEngine, CycleOutput, EngineError};
use ce_llm::HttpLlmGateway;
use clap::Parser;
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, info};

async fn run(cli: cli::Cli) -> Result<(CycleOutput, Option<EngineError>)> {
    let input = config::load_engine_input(&cli)?;

    let cluster = KubeAdapter::infer().await.context("connecting to the configured kube context")?;
    let llm = HttpLlmGateway::new(cli.llm_base_url.clone(), cli.llm_api_key.clone(), cli.llm_model.clone())
        .with_max_retries(cli.llm_max_retries);
    let engine = CycleEngine::new(&llm, &cluster);

    info!(project = %cli.project_name, namespace = %cli.namespace, "starting chaos-engineering cycle");

    match engine.run(input).await {
        Ok(output) => Ok((output, None)),
        Err((output, err)) => Ok((output, Some(err))),
    }
}

/// Maps a cycle's outcome to the process exit code contract: 0 on a
/// fully resolved cycle, 2 once the reconfiguration budget is
/// exhausted, 3 on external cancellation, 1 for every other failure.
fn exit_code_for(err: &EngineError) -> i32 {
    match err {
        EngineError::BudgetExceeded(_) => 2,
        EngineError::UserCancel => 3,
        _ => 1,
    }
}

fn main() {
    telemetry::init();
    let cli = cli::Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            std::process::exit(1);
        }
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| runtime.block_on(run(cli))));

    let code = match outcome {
        Ok(Ok((output, None))) => {
            info!(summary = %output.state.summary, "cycle resolved");
            0
        }
        Ok(Ok((output, Some(err)))) => {
            error!(error = %err, phases = output.phases.len(), "cycle ended without resolving");
            exit_code_for(&err)
        }
        Ok(Err(e)) => {
            error!(error = %format!("{e:#}"), "cycle failed before it could start");
            1
        }
        Err(_) => {
            error!("cycle engine panicked");
            1
        }
    };

    std::process::exit(code);
}
