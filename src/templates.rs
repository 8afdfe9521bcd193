use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::config::Config;
use crate::document::{DocumentError, Package, Placeholders};
use crate::error::RunError;

pub const EXTENSION: &str = ".docx";

#[derive(Display, EnumIter, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[strum(serialize = "rental contract")]
    Contract,
    #[strum(serialize = "power of attorney")]
    PowerOfAttorney,
    #[strum(serialize = "waybill")]
    Waybill,
}

impl Category {
    /// Marks the category in template file names and prefixes the output.
    pub fn marker(&self) -> &'static str {
        match self {
            Category::Contract => "contract",
            Category::PowerOfAttorney => "poa",
            Category::Waybill => "waybill",
        }
    }

    /// First category, in declaration order, whose marker appears anywhere
    /// in the file name regardless of case.
    pub fn classify(file_name: &str) -> Option<Self> {
        let lower = file_name.to_lowercase();
        Self::iter().find(|category| lower.contains(category.marker()))
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Template {
    pub path: PathBuf,
    pub category: Option<Category>,
}

impl Template {
    pub fn new(path: PathBuf, category: Option<Category>) -> Self {
        Self { path, category }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn output_name(&self, client: &str) -> String {
        let client = client_slug(client);
        match self.category {
            Some(category) => {
                format!("{}_{}{}", category.marker(), client, EXTENSION)
            }
            None => format!("{}_{}", client, self.file_name()),
        }
    }
}

pub fn client_slug(name: &str) -> String {
    name.replace(' ', "_")
}

/// Templates named in the configuration, or found in its template
/// directory. `None` when the directory to scan does not exist.
pub fn resolve(config: &Config) -> Result<Option<Vec<Template>>, RunError> {
    if config.templates.is_empty() {
        return discover(&config.template_dir);
    }
    Ok(Some(
        config
            .templates
            .iter()
            .map(|entry| Template::new(entry.path.clone(), entry.category))
            .collect(),
    ))
}

/// Every `.docx` file in `dir`, sorted by name and classified by it.
pub fn discover(dir: &Path) -> Result<Option<Vec<Template>>, RunError> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut templates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        if !name.ends_with(EXTENSION) || !path.is_file() {
            continue;
        }
        if name.starts_with("~$") {
            warn!("Skipping Word lock file {}", name);
            continue;
        }
        let category = Category::classify(&name);
        debug!("{} classified as {:?}", name, category);
        templates.push(Template::new(path, category));
    }
    templates.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(Some(templates))
}

/// Fills every template with the placeholders and writes the results into
/// `output_dir`, returning the written paths.
pub fn generate(
    templates: &[Template],
    placeholders: &Placeholders,
    client: &str,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, RunError> {
    fs::create_dir_all(output_dir)?;
    if placeholders.is_empty() {
        warn!("No placeholder values, templates are copied unchanged");
    }
    debug!("Substituting {} placeholders", placeholders.len());

    let mut written = Vec::new();
    let mut names = BTreeSet::new();
    for template in templates {
        info!("Processing template: {}", template.path.display());
        let output_name = template.output_name(client);
        if !names.insert(output_name.clone()) {
            warn!(
                "{} is written by more than one template, keeping the last",
                output_name
            );
        }

        let output = output_dir.join(&output_name);
        fill(template, placeholders, &output).map_err(|source| {
            RunError::Document {
                template: template.file_name(),
                source,
            }
        })?;
        info!("Saved: {}", output.display());
        written.push(output);
    }
    Ok(written)
}

fn fill(
    template: &Template,
    placeholders: &Placeholders,
    output: &Path,
) -> Result<(), DocumentError> {
    let mut package = Package::open(&template.path)?;
    debug!(
        "Parts to substitute: {}",
        package.part_names().collect::<Vec<_>>().join(", ")
    );
    let changed = package.substitute(placeholders);
    debug!("{} paragraphs substituted", changed);
    package.save(output)
}
