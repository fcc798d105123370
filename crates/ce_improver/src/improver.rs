// SPDX-License-Identifier: Apache-2.0

use crate::error::ImproveError;
use ce_cluster::ClusterAdapter;
use ce_llm::{LlmGateway, RetryPolicy};
use ce_store::LocalFileStore;
use ce_templates::{render, TemplateName};
use ce_types::{File, ModType, Reconfiguration, RunContext};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

const DEFAULT_MAX_RETRIES: u32 = 3;

/// Proposes a manifest reconfiguration from the oracle, applies it onto
/// a fresh copy of the previous mod directory, and deploys the result —
/// retrying with accumulated failure context when a deploy attempt is
/// rejected, mirroring the fault scenario builder's dry-run retry shape.
pub struct Improver<'a> {
    llm: &'a dyn LlmGateway,
    cluster: &'a dyn ClusterAdapter,
    store: &'a LocalFileStore,
    max_retries: u32,
}

impl<'a> Improver<'a> {
    pub fn new(llm: &'a dyn LlmGateway, cluster: &'a dyn ClusterAdapter, store: &'a LocalFileStore) -> Self {
        Improver { llm, cluster, store, max_retries: DEFAULT_MAX_RETRIES }
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// `prev_yamls`/`prev_mod_dir` describe the manifest set currently
    /// deployed; `next_mod_count` names the first candidate directory
    /// this call may write (`mod_dir/mod_<n>`, incremented on every
    /// retry). Returns the accepted reconfiguration, the updated yaml
    /// set, and the directory it was written under.
    pub async fn improve(
        &self,
        ctx: &RunContext,
        propose_ctx: &Value,
        history_ctx: &Value,
        prev_yamls: &[File],
        prev_mod_dir: &Path,
        next_mod_count: u32,
    ) -> Result<(Reconfiguration, Vec<File>, PathBuf), ImproveError> {
        let mut reconfig = self.llm.propose_reconfiguration(propose_ctx, history_ctx).await?;
        let mut retry: RetryPolicy<String, String> = RetryPolicy::new(self.max_retries);
        let mut count = next_mod_count;

        loop {
            let mod_dir = PathBuf::from(format!("mod_dir/mod_{count}"));
            self.store.copy_dir(prev_mod_dir, &mod_dir).await?;
            let updated_yamls = self.apply_mods(prev_yamls, &reconfig, &mod_dir).await?;
            self.write_deploy_bundle(&mod_dir, &updated_yamls).await?;

            match self.deploy(&updated_yamls, ctx).await {
                Ok(()) => return Ok((reconfig, updated_yamls, mod_dir)),
                Err(message) => {
                    if retry.exhausted() {
                        return Err(ImproveError::RetriesExhausted { attempts: retry.attempts(), last_error: message });
                    }
                    tracing::warn!(%message, attempt = retry.attempts(), "deploy of reconfigured manifests failed");
                    retry.record_failure(summarize(&reconfig), message);
                    reconfig = self.llm.debug_reconfiguration(propose_ctx, retry.history()).await?;
                    count += 1;
                }
            }
        }
    }

    /// Replays `reconfig`'s mods onto a copy of the prior yaml set,
    /// already materialized on disk under `mod_dir` by `copy_dir`.
    async fn apply_mods(&self, prev_yamls: &[File], reconfig: &Reconfiguration, mod_dir: &Path) -> Result<Vec<File>, ImproveError> {
        let mut yamls: Vec<File> = prev_yamls
            .iter()
            .map(|f| File::text(f.work_dir.clone(), mod_dir.join(&f.fname), f.content.as_text().unwrap_or_default()))
            .collect();

        for m in &reconfig.mod_k8s_yamls {
            match m.mod_type {
                ModType::Delete => {
                    self.store.remove(mod_dir.join(&m.fname)).await?;
                    yamls.retain(|f| f.fname != m.fname);
                }
                ModType::Create | ModType::Replace => {
                    let code = m
                        .code
                        .clone()
                        .ok_or_else(|| ImproveError::MalformedMod { fname: m.fname.clone() })?;
                    let file = self.store.write_text(mod_dir.join(&m.fname), code).await?;
                    yamls.retain(|f| f.fname != m.fname);
                    yamls.push(file);
                }
            }
        }
        Ok(yamls)
    }

    /// Records the deploy order as a plain-text artifact, the
    /// Rust-side counterpart of the original's generated `skaffold.yaml`.
    async fn write_deploy_bundle(&self, mod_dir: &Path, yamls: &[File]) -> Result<(), ImproveError> {
        let yaml_paths: Vec<String> = yamls.iter().map(|f| f.path.to_string_lossy().into_owned()).collect();
        let bundle = render(
            TemplateName::DeployBundle,
            &json!({ "name": mod_dir.to_string_lossy(), "yaml_paths": yaml_paths }),
        )?;
        self.store.write_text(mod_dir.join("deploy_bundle.txt"), bundle).await?;
        Ok(())
    }

    /// Applies every yaml in order, stopping at the first failure.
    /// Order usually doesn't matter for a handful of loose manifests,
    /// but CRDs and the resources that reference them do, so the set
    /// is walked sequentially rather than in parallel.
    async fn deploy(&self, yamls: &[File], ctx: &RunContext) -> Result<(), String> {
        for file in yamls {
            let absolute = ctx.work_dir.join(&file.path);
            self.cluster
                .apply(&absolute, &ctx.kube_context, &ctx.namespace)
                .await
                .map_err(|e| format!("apply failed for {}: {e}", file.fname))?;
        }
        Ok(())
    }
}

fn summarize(reconfig: &Reconfiguration) -> String {
    reconfig
        .mod_k8s_yamls
        .iter()
        .map(|m| format!("{:?} {}", m.mod_type, m.fname))
        .collect::<Vec<_>>()
        .join(", ")
}
