// ============================================================
// Layer 6 — Run Directory
// ============================================================
// Persists the resolved run configuration so a pass can be
// reproduced later with --config.
//
// File layout:
//   <run_dir>/
//     run_config.json      ← RunConfig, pretty JSON; --config accepts
//                            either this file or the directory
//     pipeline_stats.csv   ← written by StatsLogger
//
// Generated batches are never written here.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::pipeline_use_case::RunConfig;

const CONFIG_FILE: &str = "run_config.json";

pub struct RunDirectory {
    dir: PathBuf,
}

impl RunDirectory {
    /// Creates the directory (and parents) if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create run directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn save_config(&self, cfg: &RunConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved run config to '{}'", path.display());
        Ok(())
    }
}

/// Read a RunConfig JSON file, or the run_config.json inside a run
/// directory. Missing fields take their defaults.
pub fn load_config_file(path: &Path) -> Result<RunConfig> {
    let path = if path.is_dir() { path.join(CONFIG_FILE) } else { path.to_path_buf() };
    let path = path.as_path();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Invalid run config '{}'", path.display()))
}
