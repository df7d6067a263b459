use crate::error::{CliError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Optional pipeline configuration file for the `all` subcommand.
///
/// Every field is optional; CLI flags win over file values, file values win
/// over built-in defaults.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub flank: Option<usize>,
    pub blend_alpha: Option<f64>,
    pub predictor: Option<FilePredictor>,
    pub balance: Option<FileBalance>,
    pub minimize: Option<FileMinimize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilePredictor {
    pub exe: Option<PathBuf>,
    pub model_type: Option<String>,
    pub recycles: Option<u32>,
    pub num_models: Option<u32>,
    pub gpu_relax: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileBalance {
    pub db_uniref: Option<PathBuf>,
    pub db_pdb: Option<PathBuf>,
    pub threads: Option<u32>,
    pub top: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileMinimize {
    pub exe: Option<PathBuf>,
    pub platform: Option<String>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: FileConfig = toml::from_str(&text).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        debug!(path = %path.display(), "loaded pipeline configuration file");
        Ok(config)
    }
}
