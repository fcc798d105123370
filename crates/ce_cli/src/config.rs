// SPDX-License-Identifier: Apache-2.0

use crate::cli::Cli;
use anyhow::{Context, Result};
use ce_engine::EngineInput;
use ce_types::File;
use std::path::Path;
use walkdir::WalkDir;

/// Reads every `.yaml`/`.yml` file directly under `manifests_dir`
/// (non-recursive: a cycle ingests one flat manifest set, not an
/// arbitrary directory tree) and folds the CLI into an `EngineInput`.
pub fn load_engine_input(cli: &Cli) -> Result<EngineInput> {
    let files = ingest_manifests(&cli.manifests_dir)?;
    if files.is_empty() {
        anyhow::bail!("no .yaml/.yml manifests found under {}", cli.manifests_dir.display());
    }

    let mut input = EngineInput::new(
        cli.project_name.clone(),
        cli.kube_context.clone(),
        cli.namespace.clone(),
        cli.work_dir.clone(),
        files,
    )
    .with_is_new_deployment(cli.new_deployment)
    .with_max_num_steady_states(cli.max_num_steady_states)
    .with_max_reconfig_attempts(cli.max_reconfig_attempts);

    if let Some(instructions) = &cli.ce_instructions {
        input = input.with_ce_instructions(instructions.clone());
    }

    Ok(input)
}

fn ingest_manifests(dir: &Path) -> Result<Vec<File>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).into_iter() {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        let path = entry.path();
        let is_yaml = path.extension().map(|e| e == "yaml" || e == "yml").unwrap_or(false);
        if !entry.file_type().is_file() || !is_yaml {
            continue;
        }
        let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let fname = path.file_name().expect("WalkDir entry always has a file name").to_string_lossy().into_owned();
        files.push(File::text(dir, fname, content));
    }
    files.sort_by(|a, b| a.fname.cmp(&b.fname));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingests_only_top_level_yaml_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("deployment.yaml"), "kind: Deployment").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("service.yaml"), "kind: Service").unwrap();

        let files = ingest_manifests(dir.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].fname, "deployment.yaml");
    }
}
