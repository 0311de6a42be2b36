use crate::kanban::DEFAULT_SECTION_NAME;
use crate::storage::SAVE_FILE_NAME;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.yml";
const LOG_FILE_NAME: &str = "kagoban.log";

/// User configuration, read from `config.yml`. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Where the board is saved. Defaults to the platform data directory.
    pub data_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    /// Name given to sections added or renamed with blank input.
    pub default_section_name: String,
    pub input_char_limit: usize,
    /// Save after every change instead of only on ctrl+s.
    pub autosave: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: None,
            log_file: None,
            log_level: "info".into(),
            default_section_name: DEFAULT_SECTION_NAME.into(),
            input_char_limit: 40,
            autosave: false,
        }
    }
}

impl Config {
    /// Reads `path`, or the default config location when `None`. A missing
    /// file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Config::default()),
            },
        };
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
        Self::parse(&data).with_context(|| format!("parsing {:?}", path))
    }

    pub fn parse(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Config::default());
        }
        let config = serde_yaml::from_str(data)?;
        Ok(config)
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(SAVE_FILE_NAME)),
        }
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(LOG_FILE_NAME)),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kagoban").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "kagoban").context("locating data directory")
}
