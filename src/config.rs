use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::RunError;
use crate::templates::Category;

#[derive(Deserialize, Debug, PartialEq, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub vehicles: PathBuf,
    pub counter: PathBuf,
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Explicit templates; when empty `template_dir` is scanned instead.
    pub templates: Vec<TemplateEntry>,
}

#[derive(Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct TemplateEntry {
    pub path: PathBuf,
    pub category: Option<Category>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vehicles: PathBuf::from("data").join("cars.json"),
            counter: PathBuf::from("data").join("contract_counter.json"),
            template_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("output"),
            templates: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, RunError> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|source| RunError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
