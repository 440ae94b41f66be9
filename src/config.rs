//! Checker configuration: marker name, diagnostic excerpt length, depth limit.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors from loading a [`CheckConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// CheckConfig
// ---------------------------------------------------------------------------

/// Configuration shared by the checkers and the bundled renderer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Name of the content substitution slot in STATIC fragments.
    pub marker: String,
    /// Characters of rendered markup quoted in structural diagnostics.
    pub excerpt_chars: usize,
    /// Maximum dependency nesting, for walking and for rendering.
    pub max_depth: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            marker: "content".to_owned(),
            excerpt_chars: 500,
            max_depth: 64,
        }
    }
}

impl CheckConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the marker name (builder).
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Set the excerpt length (builder).
    pub fn with_excerpt_chars(mut self, chars: usize) -> Self {
        self.excerpt_chars = chars;
        self
    }

    /// Set the dependency depth limit (builder).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Parse a config from TOML. Omitted keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = CheckConfig::default();
        assert_eq!(config.marker, "content");
        assert_eq!(config.excerpt_chars, 500);
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn builder_setters() {
        let config = CheckConfig::new()
            .with_marker("body_html")
            .with_excerpt_chars(80)
            .with_max_depth(8);
        assert_eq!(
            config,
            CheckConfig {
                marker: "body_html".into(),
                excerpt_chars: 80,
                max_depth: 8,
            }
        );
    }

    #[test]
    fn toml_keeps_defaults_for_omitted_keys() {
        let config = CheckConfig::from_toml_str("marker = \"slot\"").unwrap();
        assert_eq!(config.marker, "slot");
        assert_eq!(config.excerpt_chars, 500);
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = CheckConfig::from_toml_str("colour = \"red\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_depth = 3").unwrap();
        let config = CheckConfig::from_path(file.path()).unwrap();
        assert_eq!(config.max_depth, 3);
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CheckConfig::from_path(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
