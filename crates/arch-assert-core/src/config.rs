//! Configuration types for arch-assert.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Namespace prefixes excluded by default: platform assemblies that are
/// never the subject of a project's own conventions.
pub const DEFAULT_EXCLUDED_NAMESPACES: &[&str] = &["System", "Microsoft", "Windows", "mscorlib"];

/// Top-level configuration for arch-assert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Namespace prefixes whose assemblies and types are dropped before
    /// filtering.
    #[serde(default = "default_excluded")]
    pub exclude_namespaces: Vec<String>,

    /// Whether checks apply the exclusion list at all (default: true).
    #[serde(default = "default_true")]
    pub apply_exclusions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_namespaces: default_excluded(),
            apply_exclusions: true,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Converts this configuration into per-check options.
    #[must_use]
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            apply_exclusions: self.apply_exclusions,
            exclusions: ExclusionList::new(self.exclude_namespaces.clone()),
        }
    }
}

fn default_excluded() -> Vec<String> {
    DEFAULT_EXCLUDED_NAMESPACES
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_true() -> bool {
    true
}

/// An ordered set of namespace prefixes used to drop well-known
/// non-project assemblies and types before filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusionList {
    prefixes: Vec<String>,
}

impl ExclusionList {
    /// Creates an exclusion list from namespace prefixes.
    #[must_use]
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    /// An exclusion list that excludes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    /// Tests whether a name falls under any excluded prefix.
    #[must_use]
    pub fn excludes(&self, name: &str) -> bool {
        self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }

    /// Returns the configured prefixes.
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for ExclusionList {
    fn default() -> Self {
        Self::new(default_excluded())
    }
}

/// Per-invocation evaluation options.
///
/// A check carries no options of its own; the caller supplies them (or
/// the defaults) per run, so the same check can be evaluated with and
/// without exclusions.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOptions {
    /// Whether the exclusion list is applied before filtering.
    pub apply_exclusions: bool,
    /// The exclusion list to apply.
    pub exclusions: ExclusionList,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            apply_exclusions: true,
            exclusions: ExclusionList::default(),
        }
    }
}

impl CheckOptions {
    /// Options that evaluate the unfiltered universe.
    #[must_use]
    pub fn without_exclusions() -> Self {
        Self {
            apply_exclusions: false,
            exclusions: ExclusionList::empty(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_excludes_platform_namespaces() {
        let config = Config::default();
        assert!(config.apply_exclusions);
        let options = config.check_options();
        assert!(options.exclusions.excludes("System.Collections"));
        assert!(options.exclusions.excludes("Microsoft.Extensions.Logging"));
        assert!(!options.exclusions.excludes("MyApp.Domain"));
    }

    #[test]
    fn parse_overrides_defaults() {
        let toml = r#"
exclude_namespaces = ["Legacy"]
apply_exclusions = false
"#;
        let config = Config::parse(toml).expect("config should parse");
        assert_eq!(config.exclude_namespaces, vec!["Legacy"]);
        assert!(!config.apply_exclusions);
    }

    #[test]
    fn parse_rejects_invalid_toml() {
        let err = Config::parse("exclude_namespaces = 3").expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn exclusion_is_prefix_based() {
        let list = ExclusionList::new(vec!["Foo".to_string()]);
        assert!(list.excludes("Foo"));
        assert!(list.excludes("Foo.Bar"));
        assert!(list.excludes("Foobar"));
        assert!(!list.excludes("Bar.Foo"));
    }

    #[test]
    fn empty_list_excludes_nothing() {
        assert!(!ExclusionList::empty().excludes("System"));
    }
}
