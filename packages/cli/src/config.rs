//! Render configuration file loading.

use std::path::{Path, PathBuf};

use ctfboard_markdown::RenderOptions;

/// Errors that can occur when loading a render config.
#[derive(Debug, thiserror::Error)]
pub enum RenderConfigError {
    /// No config file in any of the default locations.
    #[error("Render config not found")]
    NotFound,

    /// Failed to read config file.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse config file.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Get candidate paths for the config file, in search order.
#[must_use]
pub fn config_candidates() -> Vec<Option<PathBuf>> {
    vec![
        dirs::config_dir().map(|p| p.join("ctfboard/render.json")),
        dirs::home_dir().map(|p| p.join(".config/ctfboard/render.json")),
    ]
}

/// Load options from a specific JSON file. Missing fields keep their defaults.
///
/// # Errors
///
/// * [`RenderConfigError::Io`] if the file cannot be read
/// * [`RenderConfigError::Parse`] if the file is not a valid config
pub fn load_from_path(path: &Path) -> Result<RenderOptions, RenderConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Find and load the config from the first default location that exists.
///
/// # Errors
///
/// Returns an error if no config is found or parsing fails.
pub fn load_global() -> Result<RenderOptions, RenderConfigError> {
    for path in config_candidates().into_iter().flatten() {
        if path.exists() {
            log::debug!("Loading render config from: {}", path.display());
            return load_from_path(&path);
        }
    }

    Err(RenderConfigError::NotFound)
}

/// Resolve render options.
///
/// An explicit path must load. Without one, the default locations are
/// searched and a missing config falls back to [`RenderOptions::default`].
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load_render_options(explicit: Option<&Path>) -> Result<RenderOptions, RenderConfigError> {
    if let Some(path) = explicit {
        log::debug!("Loading render config from: {}", path.display());
        return load_from_path(path);
    }

    match load_global() {
        Err(RenderConfigError::NotFound) => {
            log::debug!("No render config found, using defaults");
            Ok(RenderOptions::default())
        }
        result => result,
    }
}

/// Command line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct OptionOverrides {
    pub no_sanitize: bool,
    pub no_highlight: bool,
    pub links_open_in_new_tab: bool,
    pub theme: Option<String>,
}

impl OptionOverrides {
    #[must_use]
    pub fn apply(self, mut options: RenderOptions) -> RenderOptions {
        if self.no_sanitize {
            options.sanitize = false;
        }
        if self.no_highlight {
            options.highlight = false;
        }
        if self.links_open_in_new_tab {
            options.links_open_in_new_tab = true;
        }
        if let Some(theme) = self.theme {
            options.theme = theme;
        }
        options
    }
}
