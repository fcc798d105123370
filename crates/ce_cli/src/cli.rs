// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use std::path::PathBuf;

/// Drives one chaos-engineering cycle against a Kubernetes workload:
/// ingest manifests, hypothesize steady states and a fault, plan and
/// run an experiment, and reconfigure on failure until it passes or
/// the retry budget runs out.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory of Kubernetes manifests (.yaml/.yml) to ingest.
    #[arg(long, env = "CE_MANIFESTS_DIR")]
    pub manifests_dir: PathBuf,

    /// Scratch directory the cycle writes every generated artifact
    /// under (mods, probes, unit tests, rendered workflows).
    #[arg(long, env = "CE_WORK_DIR")]
    pub work_dir: PathBuf,

    /// Logical name for this run, used to label the workload the
    /// experiment targets.
    #[arg(long, env = "CE_PROJECT_NAME")]
    pub project_name: String,

    /// `kubectl` context to target.
    #[arg(long, env = "CE_KUBE_CONTEXT")]
    pub kube_context: String,

    /// Namespace the workload lives (or will be deployed) in.
    #[arg(long, env = "CE_NAMESPACE")]
    pub namespace: String,

    /// Deploy `manifests_dir` before reasoning begins, rather than
    /// assuming it's already running in the cluster.
    #[arg(long, env = "CE_NEW_DEPLOYMENT", default_value_t = true)]
    pub new_deployment: bool,

    /// Free-text instructions steering hypothesis generation, e.g.
    /// "focus on network faults only".
    #[arg(long, env = "CE_INSTRUCTIONS")]
    pub ce_instructions: Option<String>,

    /// Upper bound on distinct steady states the cycle will hypothesize.
    #[arg(long, env = "CE_MAX_STEADY_STATES", default_value_t = 2)]
    pub max_num_steady_states: usize,

    /// Upper bound on reconfiguration attempts before giving up.
    #[arg(long, env = "CE_MAX_RECONFIG_ATTEMPTS", default_value_t = 3)]
    pub max_reconfig_attempts: u32,

    /// Base URL of the LLM gateway's completions endpoint.
    #[arg(long, env = "CE_LLM_BASE_URL")]
    pub llm_base_url: String,

    /// API key for the LLM gateway. Never logged.
    #[arg(long, env = "CE_LLM_API_KEY")]
    pub llm_api_key: String,

    /// Model identifier to request from the LLM gateway.
    #[arg(long, env = "CE_LLM_MODEL", default_value = "gpt-4o")]
    pub llm_model: String,

    /// Retries the LLM gateway performs on a rate-limited response
    /// before surfacing `LlmError::RetriesExhausted`.
    #[arg(long, env = "CE_LLM_MAX_RETRIES", default_value_t = 5)]
    pub llm_max_retries: u32,
}
