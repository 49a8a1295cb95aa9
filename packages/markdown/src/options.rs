//! Rendering options.

use ctfboard_syntax::DEFAULT_THEME;
use serde::{Deserialize, Serialize};

/// Label shown on code blocks without a recognized language.
pub const DEFAULT_CODE_LABEL: &str = "code";

/// Options controlling how a description is rendered.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Run the allow-list sanitizer over the output.
    pub sanitize: bool,
    /// Syntax highlight code blocks with a recognized language.
    pub highlight: bool,
    /// Highlight theme used for the stylesheet.
    pub theme: String,
    /// Add `target="_blank"` to links.
    pub links_open_in_new_tab: bool,
    pub default_code_label: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sanitize: true,
            highlight: true,
            theme: DEFAULT_THEME.to_string(),
            links_open_in_new_tab: false,
            default_code_label: DEFAULT_CODE_LABEL.to_string(),
        }
    }
}
