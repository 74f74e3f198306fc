//! External parameter collection
//!
//! Reads parameter files and applies inline defines in a fixed order:
//! YAML files, then JSON files, then defines. Later entries override
//! earlier ones.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stackdsl_core::ExternalParameters;
use tracing::debug;

pub fn gather(yaml: &[PathBuf], json: &[PathBuf], defines: &[String]) -> Result<ExternalParameters> {
    let mut params = ExternalParameters::new();

    for path in yaml {
        let document = read(path)?;
        params
            .merge_yaml(&document)
            .with_context(|| format!("invalid parameter file {}", path.display()))?;
        debug!(path = %path.display(), "Merged YAML parameter file");
    }

    for path in json {
        let document = read(path)?;
        params
            .merge_json(&document)
            .with_context(|| format!("invalid parameter file {}", path.display()))?;
        debug!(path = %path.display(), "Merged JSON parameter file");
    }

    for spec in defines {
        params.set_define(spec)?;
    }

    Ok(params)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("cannot read parameter file {}", path.display()))
}
