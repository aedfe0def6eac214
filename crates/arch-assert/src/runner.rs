//! Config discovery and the panic bridge for `cargo test` integration.

use arch_assert_core::{BundleResult, CheckOptions, Config, TestResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["arch-assert.toml", ".arch-assert.toml"];

/// Loads the project configuration.
///
/// Searches the project root (the nearest workspace root above
/// `CARGO_MANIFEST_DIR`, or the manifest dir itself) for
/// `arch-assert.toml` / `.arch-assert.toml`. A missing file yields the
/// default configuration.
///
/// # Panics
///
/// Panics if a config file exists but cannot be read or parsed: a broken
/// config in a test run should fail loudly, not silently fall back to
/// defaults.
#[must_use]
pub fn load_config() -> Config {
    let root = find_project_root();
    for candidate in CONFIG_CANDIDATES {
        let path = root.join(candidate);
        if path.exists() {
            debug!(path = %path.display(), "loading config");
            return Config::from_file(&path).unwrap_or_else(|e| {
                panic!("arch-assert: {e}");
            });
        }
    }
    debug!(root = %root.display(), "no config file found, using defaults");
    Config::default()
}

/// The check options derived from the discovered configuration.
#[must_use]
pub fn default_check_options() -> CheckOptions {
    load_config().check_options()
}

/// Checks whether a `Cargo.toml` file defines a `[workspace]` section
/// by parsing as TOML, avoiding false positives from comments or strings.
fn has_workspace_section(cargo_toml: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(cargo_toml) else {
        return false;
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        return false;
    };
    table.contains_key("workspace")
}

/// Finds the project root by looking for `Cargo.toml` from `CARGO_MANIFEST_DIR`.
fn find_project_root() -> PathBuf {
    // CARGO_MANIFEST_DIR points to the crate containing the test,
    // which may be a workspace member. Walk up to find workspace root.
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let manifest_path = PathBuf::from(&manifest_dir);

        let mut candidate = manifest_path.as_path();
        loop {
            let cargo_toml = candidate.join("Cargo.toml");
            if cargo_toml.exists() && has_workspace_section(&cargo_toml) {
                return candidate.to_path_buf();
            }
            match candidate.parent() {
                Some(parent) => candidate = parent,
                None => break,
            }
        }

        // No workspace root found — use manifest dir itself
        return manifest_path;
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Turns a violated result into a test failure.
///
/// The check pipeline itself never panics on violations; this bridge is
/// the one place where "violated" becomes "failed", so that assertion
/// style stays a caller decision.
pub trait AssertNotViolated {
    /// Panics with the rendered report if the result is violated.
    fn assert_not_violated(&self);
}

impl AssertNotViolated for TestResult {
    fn assert_not_violated(&self) {
        if self.is_violated() {
            panic!("{}", self.report());
        }
    }
}

impl AssertNotViolated for BundleResult {
    fn assert_not_violated(&self) {
        if self.is_violated() {
            panic!("{}", self.to_report());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_assert_core::metadata::{MetadataIndex, TypeSpec};
    use arch_assert_core::{CheckError, Entity, ViolationError};

    #[test]
    fn has_workspace_section_detects_real_sections_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let member = dir.path().join("Cargo.toml");
        std::fs::write(&member, "[package]\nname = \"demo\"\n# [workspace]\n").expect("write");
        assert!(!has_workspace_section(&member));

        let root = dir.path().join("root.toml");
        std::fs::write(&root, "[workspace]\nmembers = []\n").expect("write");
        assert!(has_workspace_section(&root));
    }

    #[test]
    fn has_workspace_section_is_false_for_missing_file() {
        assert!(!has_workspace_section(Path::new("/nonexistent/Cargo.toml")));
    }

    #[test]
    fn passing_result_does_not_panic() {
        TestResult::new(vec![]).assert_not_violated();
    }

    #[test]
    #[should_panic(expected = "is violated")]
    fn violated_result_panics_with_the_report() {
        let mut b = MetadataIndex::builder();
        let asm = b.add_assembly("App");
        let ty = b.add_type(asm, TypeSpec::new("Bar"));

        let result = TestResult::new(vec![CheckError::Violation(ViolationError::new(
            ty.entity_ref(),
            "Bar",
            "Type 'Bar' should be public",
        ))]);
        result.assert_not_violated();
    }
}
