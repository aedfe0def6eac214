//! The check error taxonomy.
//!
//! Errors are data, not exceptions: a failing rule never aborts
//! evaluation, it collects errors into the test result. The only
//! host-level `Error` types in this crate are for programmer misuse
//! (patterns, configuration).

use serde::Serialize;

use crate::entity::EntityRef;
use crate::metadata::AssemblyId;

/// A single error produced by a check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum CheckError {
    /// The filtered candidate set was empty. This usually signals a
    /// rule-authoring mistake (a typo'd filter), not a real violation.
    EmptySource(EmptySourceError),
    /// An entity failed a requirement.
    Violation(ViolationError),
    /// An assembly carries forbidden dependencies.
    Dependency(DependencyError),
}

impl CheckError {
    /// The offending entity, if this error refers to one.
    #[must_use]
    pub fn entity(&self) -> Option<EntityRef> {
        match self {
            Self::EmptySource(_) => None,
            Self::Violation(v) => Some(v.entity),
            Self::Dependency(d) => Some(EntityRef::Assembly(d.assembly)),
        }
    }

    /// Whether this is the empty-source error.
    #[must_use]
    pub fn is_empty_source(&self) -> bool {
        matches!(self, Self::EmptySource(_))
    }
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySource(e) => write!(f, "{e}"),
            Self::Violation(e) => write!(f, "{e}"),
            Self::Dependency(e) => write!(f, "{e}"),
        }
    }
}

/// The filtered candidate set was empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptySourceError {
    /// Descriptions of the filters that produced the empty set.
    pub filters: Vec<String>,
}

impl std::fmt::Display for EmptySourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.filters.as_slice() {
            [] => write!(f, "the rule source contains no entities"),
            [single] => write!(
                f,
                "no entities in the rule source match the filter \"{single}\""
            ),
            many => {
                write!(f, "no entities in the rule source match the filters: ")?;
                for (i, filter) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{filter}\"")?;
                }
                Ok(())
            }
        }
    }
}

/// An entity failed a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationError {
    /// Back-reference to the offending entity.
    pub entity: EntityRef,
    /// Display name of the offending entity at evaluation time.
    pub entity_name: String,
    /// The full human-readable message.
    pub message: String,
}

impl ViolationError {
    /// Creates a violation error.
    #[must_use]
    pub fn new(entity: EntityRef, entity_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entity,
            entity_name: entity_name.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ViolationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// An assembly depends on something it must not.
///
/// Carries the list of offending references so exemptions can narrow it;
/// the message is derived from the current list at render time, so it
/// regenerates automatically after partial exemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyError {
    /// The offending assembly.
    pub assembly: AssemblyId,
    /// The offending assembly's name at evaluation time.
    pub assembly_name: String,
    /// The forbidden-dependency pattern the rule was declared with.
    pub pattern: String,
    /// The offending references. Never empty inside a result: an error
    /// whose list drains to empty is removed entirely.
    pub forbidden: Vec<String>,
}

impl DependencyError {
    /// Creates a dependency error.
    #[must_use]
    pub fn new(
        assembly: AssemblyId,
        assembly_name: impl Into<String>,
        pattern: impl Into<String>,
        forbidden: Vec<String>,
    ) -> Self {
        Self {
            assembly,
            assembly_name: assembly_name.into(),
            pattern: pattern.into(),
            forbidden,
        }
    }

    /// Returns a copy of this error with every reference matching
    /// `exempt` removed, and whether the error is now fully exempted.
    ///
    /// Pure transformation: the original error value is consumed, never
    /// shared-mutated, so re-applying an exemption to an already-narrowed
    /// error is safe and changes nothing.
    #[must_use]
    pub fn with_exemption_applied<P>(self, exempt: P) -> (Self, bool)
    where
        P: Fn(&str) -> bool,
    {
        let forbidden: Vec<String> = self
            .forbidden
            .into_iter()
            .filter(|r| !exempt(r))
            .collect();
        let fully_exempted = forbidden.is_empty();
        (
            Self {
                forbidden,
                ..self
            },
            fully_exempted,
        )
    }
}

impl std::fmt::Display for DependencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Assembly '{}' should not depend on '{}', but references: ",
            self.assembly_name, self.pattern
        )?;
        for (i, reference) in self.forbidden.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{reference}'")?;
        }
        Ok(())
    }
}
