//! Wildcard name patterns.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Errors raised when constructing a [`Pattern`].
#[derive(Debug, Error)]
pub enum PatternError {
    /// The translated expression was rejected by the regex engine.
    #[error("invalid pattern `{pattern}`: {source}")]
    Invalid {
        /// The original wildcard pattern.
        pattern: String,
        /// Underlying regex error.
        source: regex::Error,
    },
}

/// An anchored wildcard pattern for matching entity names and namespaces.
///
/// `*` matches zero or more characters, `?` matches exactly one. Matching
/// is always against the full candidate string, never a substring. Both the
/// case-sensitive and case-insensitive forms are compiled once at
/// construction and reused for every match call.
///
/// # Example
///
/// ```
/// use arch_assert_core::Pattern;
///
/// let pattern = Pattern::new("*Tests")?;
/// assert!(pattern.matches(Some("OrderServiceTests"), false));
/// assert!(!pattern.matches(Some("OrderService"), false));
/// assert!(!pattern.matches(None, false));
/// # Ok::<(), arch_assert_core::PatternError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    sensitive: Regex,
    insensitive: Regex,
}

impl Pattern {
    /// Creates a new pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Invalid`] if the translated expression does
    /// not compile (e.g. it exceeds the regex engine's size limit).
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let translated = translate(pattern);
        let anchored = format!("^{translated}$");

        let compile = |ignore_case: bool| {
            RegexBuilder::new(&anchored)
                .case_insensitive(ignore_case)
                .build()
                .map_err(|source| PatternError::Invalid {
                    pattern: pattern.to_string(),
                    source,
                })
        };

        Ok(Self {
            raw: pattern.to_string(),
            sensitive: compile(false)?,
            insensitive: compile(true)?,
        })
    }

    /// Tests a candidate against this pattern.
    ///
    /// A `None` candidate never matches: entities without a namespace are
    /// represented as `None` and must not satisfy any namespace pattern,
    /// including `*`.
    #[must_use]
    pub fn matches(&self, candidate: Option<&str>, ignore_case: bool) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        if ignore_case {
            self.insensitive.is_match(candidate)
        } else {
            self.sensitive.is_match(candidate)
        }
    }

    /// Returns the original wildcard pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Escapes regex metacharacters, then rewrites the escaped wildcards.
fn translate(pattern: &str) -> String {
    regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".")
}
