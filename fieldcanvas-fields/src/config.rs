//! Editor configuration loaded with figment.
//!
//! Sources in precedence order (later override earlier):
//! 1. Built-in defaults
//! 2. An optional config file (TOML, YAML or JSON, chosen by extension)
//! 3. Environment variables prefixed `FIELDCANVAS_`, nested keys split on `__`
//!    (e.g. `FIELDCANVAS_REFERENCE_VIEWPORT__WIDTH=1200`)

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldsError, Result};
use crate::geometry::Viewport;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "FIELDCANVAS_";

/// Settings for a template editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Coordinate space field geometry is stored in.
    pub reference_viewport: Viewport,
    /// YAML list of custom field type definitions merged over the built-ins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            reference_viewport: Viewport::A4,
            catalog_file: None,
        }
    }
}

impl EditorConfig {
    /// Load from defaults, `file` (if given) and the environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let config: EditorConfig = Self::figment(file)?.extract()?;
        debug!(
            width = config.reference_viewport.width(),
            height = config.reference_viewport.height(),
            catalog_file = ?config.catalog_file,
            "editor configuration loaded"
        );
        Ok(config)
    }

    /// The layered figment, exposed so hosts can merge their own providers.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(EditorConfig::default()));
        if let Some(path) = file {
            figment = figment.merge(file_provider(path)?);
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }
}

fn file_provider(path: &Path) -> Result<Figment> {
    if !path.is_file() {
        return Err(FieldsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config file not found: {}", path.display()),
        )));
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("toml") => Ok(Figment::from(Toml::file(path))),
        Some("yaml") | Some("yml") => Ok(Figment::from(Yaml::file(path))),
        Some("json") => Ok(Figment::from(Json::file(path))),
        _ => Err(FieldsError::Config(figment::Error::from(format!(
            "unsupported config file format: {}",
            path.display()
        )))),
    }
}
