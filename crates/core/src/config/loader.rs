//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed and validated settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<PathBuf>,
    /// Non-fatal findings from validation, e.g. `input.max_bytes: ...`
    pub warnings: Vec<String>,
}

impl Config {
    /// Load configuration from a file path or the standard locations.
    ///
    /// An explicit path must exist. Without one, the first standard location
    /// that exists is used, falling back to defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                let expanded = expand_path(p);
                if !expanded.exists() {
                    return Err(Error::config_not_found(&expanded));
                }
                Some(expanded)
            }
            None => find_config_file(),
        };

        let schema = match &config_path {
            Some(p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        let result = schema.validate();
        let warnings = result.warnings().iter().map(ToString::to_string).collect();
        result.to_result().map_err(|err| match &config_path {
            Some(p) => err.with_context(format!("In {}", p.display())),
            None => err,
        })?;

        Ok(Self {
            schema,
            path: config_path,
            warnings,
        })
    }

    /// Log directory with `~` and environment variables expanded
    pub fn log_directory(&self) -> Option<PathBuf> {
        self.schema.logging.directory.as_deref().map(expand_path)
    }
}

fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(raw),
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let local = [".photogate.toml", "photogate.toml"]
        .into_iter()
        .map(PathBuf::from);
    let user = dirs::config_dir().map(|dir| dir.join("photogate").join("config.toml"));

    local.chain(user).find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse config file {}", path.display()))
}
