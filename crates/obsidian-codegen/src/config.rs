//! Generator settings, loadable from a TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::attributes::DEFAULT_MARKER;
use crate::error::{Error, Result};

/// Default name of the generated reflection header.
pub const DEFAULT_OUTPUT_FILE: &str = "reflection.hpp";

/// Default name of the generated marker header.
pub const DEFAULT_MARKER_HEADER: &str = "obs.h";

/// Settings of one generation run.
///
/// Every key is optional in the TOML form; unknown keys are rejected.
///
/// ```toml
/// marker = "refl"
/// output_file = "reflection.hpp"
/// marker_header = "obs.h"   # "" disables it
/// include_roots = ["include"]
/// header_comment = "Generated for the engine."
/// metadata_file = "reflection.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Attribute name that opts a declaration in.
    pub marker: String,
    /// File name of the reflection header inside the output directory.
    pub output_file: String,
    /// File name of the marker header, or `None` to skip it.
    pub marker_header: Option<String>,
    /// Prefixes stripped from include paths.
    pub include_roots: Vec<String>,
    /// Banner placed above the generated header.
    pub header_comment: Option<String>,
    /// File name of the JSON metadata summary, written only when set.
    pub metadata_file: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            marker_header: Some(DEFAULT_MARKER_HEADER.to_string()),
            include_roots: Vec::new(),
            header_comment: None,
            metadata_file: None,
        }
    }
}

impl GeneratorConfig {
    /// Parse a TOML document. `path` only names the source in errors.
    pub fn from_toml_str(text: &str, path: impl Into<PathBuf>) -> Result<Self> {
        toml::from_str(text).map_err(|source| Error::Config {
            path: path.into(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&text, path)
    }

    /// Marker header file name, if one should be written.
    pub fn marker_header(&self) -> Option<&str> {
        self.marker_header.as_deref().filter(|name| !name.is_empty())
    }
}
