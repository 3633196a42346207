//! Emitter configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! max_num_id = 12
//! grid_column_width = 2994
//! fetch_remote_images = false
//!
//! [styles]
//! headings = ["Titre1", "Titre2"]
//! caption = "Legende"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default width of a `w:gridCol`, in twentieths of a point
pub const DEFAULT_GRID_COLUMN_WIDTH: u32 = 2994;

/// Default start of the drawing id range, above ids a template typically uses
pub const DEFAULT_DRAWING_ID_OFFSET: u32 = 5000;

/// Top-level emitter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Highest `w:numId` already present in the target template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_num_id: Option<u32>,
    /// Width of each table grid column (twips)
    pub grid_column_width: u32,
    /// Drawing ids start above this value
    pub drawing_id_offset: u32,
    /// Fetch non-data image references over HTTP
    pub fetch_remote_images: bool,
    /// Timeout for one image fetch
    pub fetch_timeout_secs: u64,
    /// Style ids used for resolved roles
    pub styles: StyleConfig,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_num_id: None,
            grid_column_width: DEFAULT_GRID_COLUMN_WIDTH,
            drawing_id_offset: DEFAULT_DRAWING_ID_OFFSET,
            fetch_remote_images: true,
            fetch_timeout_secs: 30,
            styles: StyleConfig::default(),
        }
    }
}

impl EmitterConfig {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Style ids for headings, captions, hyperlinks and list numbering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Heading style ids by level, starting at level 1
    pub headings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,
    pub bullet_abstract_num_id: u32,
    pub ordered_abstract_num_id: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            headings: Vec::new(),
            caption: None,
            hyperlink: None,
            bullet_abstract_num_id: 1,
            ordered_abstract_num_id: 2,
        }
    }
}
