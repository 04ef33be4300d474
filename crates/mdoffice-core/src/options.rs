//! Render options
//!
//! Options handed to every renderer by the content router. The core never
//! interprets them; keys it does not know are preserved in `extra` so
//! renderer-specific settings travel through untouched.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options passed through to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Named style or template
    pub style: String,
    /// Insert a page break before each top-level section
    pub page_breaks: bool,
    /// Generate a table of contents
    pub table_of_contents: bool,
    /// Emit bookmarks for heading anchors
    pub bookmarks: bool,
    /// Directory that relative image paths resolve against
    pub base_path: Option<PathBuf>,
    /// Leave out images that cannot be found instead of failing
    pub skip_missing_images: bool,
    /// Renderer-specific keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            style: "default".to_string(),
            page_breaks: false,
            table_of_contents: false,
            bookmarks: true,
            base_path: None,
            skip_missing_images: false,
            extra: BTreeMap::new(),
        }
    }
}

impl RenderOptions {
    /// Parse options from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Set the style
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the image base path
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Set a renderer-specific key
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Look up a renderer-specific key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
