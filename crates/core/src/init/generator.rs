//! Directory structure and file generation for `.trip-planner` initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for initializing a .trip-planner directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Target directory where .trip-planner will be created.
    pub target_dir: PathBuf,

    /// Overwrite an existing .trip-planner directory.
    pub force: bool,

    /// Write only `config.toml`; every capability then defaults to a mock.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a `.trip-planner` directory structure from the templates.
///
/// ```text
/// .trip-planner/
/// ├── config.toml
/// └── providers/            (unless minimal)
///     ├── accommodations.yaml
///     ├── attractions.yaml
///     ├── flights.yaml
///     ├── places.yaml
///     └── weather.yaml
/// ```
///
/// # Returns
/// The paths written, or an `InitError` if:
/// - The .trip-planner directory already exists (without force flag)
/// - A template file cannot be found
/// - File system operations fail
pub async fn generate_trip_planner_structure(options: InitOptions) -> InitResult<Vec<PathBuf>> {
    let config_dir = options.target_dir.join(CONFIG_DIR);

    if config_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(config_dir));
    }

    fs::create_dir_all(&config_dir).map_err(|source| InitError::DirectoryCreate {
        path: config_dir.clone(),
        source,
    })?;

    let mut written = vec![write_template_file(&config_dir, "config.toml")?];

    if !options.minimal {
        for provider_path in list_templates("providers/") {
            written.push(write_template_file(&config_dir, &provider_path)?);
        }
    }

    tracing::info!(
        path = %config_dir.display(),
        files = written.len(),
        "initialized trip planner project"
    );
    Ok(written)
}

/// Write one template below `config_dir`, creating parent directories.
fn write_template_file(config_dir: &Path, template_path: &str) -> InitResult<PathBuf> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = config_dir.join(template_path);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;

    Ok(target_path)
}
