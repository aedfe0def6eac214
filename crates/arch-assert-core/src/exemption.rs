//! Exemptions: post-hoc suppression of already-produced errors.

use crate::error::CheckError;

/// A named suppressor applied to the collected error list after the
/// requirement pass completes.
///
/// Exemptions either drop an error entirely, or — for composite
/// dependency errors — narrow its reference list and drop the error only
/// once the list is empty. Application is a pure transformation, so
/// re-applying an exemption to an error it already exempted is a no-op.
pub struct Exemption {
    description: String,
    kind: Kind,
}

enum Kind {
    /// Drops any error the predicate matches.
    Error(Box<dyn Fn(&CheckError) -> bool>),
    /// Narrows dependency errors by removing matching references.
    DependencyReference(Box<dyn Fn(&str) -> bool>),
    /// Drops the empty-source error: the caller asserts that an empty
    /// candidate set is acceptable for this rule.
    AllowEmpty,
}

impl Exemption {
    /// Creates an exemption that drops whole errors matching the
    /// predicate.
    pub fn new<P>(description: impl Into<String>, predicate: P) -> Self
    where
        P: Fn(&CheckError) -> bool + 'static,
    {
        Self {
            description: description.into(),
            kind: Kind::Error(Box::new(predicate)),
        }
    }

    /// Creates a partial exemption for dependency errors: references
    /// matching `matcher` are removed from the error's list, and the
    /// error itself is dropped once the list drains to empty.
    pub fn dependency_on<M>(description: impl Into<String>, matcher: M) -> Self
    where
        M: Fn(&str) -> bool + 'static,
    {
        Self {
            description: description.into(),
            kind: Kind::DependencyReference(Box::new(matcher)),
        }
    }

    /// Creates the allow-empty exemption.
    #[must_use]
    pub fn allow_empty() -> Self {
        Self {
            description: "an empty rule source is allowed".to_string(),
            kind: Kind::AllowEmpty,
        }
    }

    /// Applies this exemption to one error. Returns `None` when the error
    /// is fully exempted, or the (possibly narrowed) error otherwise.
    #[must_use]
    pub fn apply(&self, error: CheckError) -> Option<CheckError> {
        match &self.kind {
            Kind::Error(predicate) => {
                if predicate(&error) {
                    None
                } else {
                    Some(error)
                }
            }
            Kind::AllowEmpty => {
                if error.is_empty_source() {
                    None
                } else {
                    Some(error)
                }
            }
            Kind::DependencyReference(matcher) => match error {
                CheckError::Dependency(dep) => {
                    let (narrowed, fully_exempted) = dep.with_exemption_applied(|r| matcher(r));
                    if fully_exempted {
                        None
                    } else {
                        Some(CheckError::Dependency(narrowed))
                    }
                }
                other => Some(other),
            },
        }
    }

    /// The exemption's description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl std::fmt::Debug for Exemption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exemption")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Runs every exemption over every error, keeping only errors no
/// exemption fully removed. Exemptions that match nothing are no-ops.
#[must_use]
pub fn apply_all(errors: Vec<CheckError>, exemptions: &[Exemption]) -> Vec<CheckError> {
    errors
        .into_iter()
        .filter_map(|error| {
            let mut current = error;
            for exemption in exemptions {
                current = exemption.apply(current)?;
            }
            Some(current)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityRef;
    use crate::error::{DependencyError, EmptySourceError, ViolationError};
    use crate::metadata::{AssemblyId, TypeId};

    fn violation(name: &str) -> CheckError {
        CheckError::Violation(ViolationError::new(
            EntityRef::Type(TypeId(0)),
            name,
            format!("Type '{name}' should be public"),
        ))
    }

    fn dependency(refs: &[&str]) -> CheckError {
        CheckError::Dependency(DependencyError::new(
            AssemblyId(0),
            "App",
            "Legacy.*",
            refs.iter().map(ToString::to_string).collect(),
        ))
    }

    #[test]
    fn whole_error_exemption_drops_matching_errors() {
        let exemption = Exemption::new("ignore Bar", |e| {
            matches!(e, CheckError::Violation(v) if v.entity_name == "Bar")
        });
        let errors = apply_all(vec![violation("Foo"), violation("Bar")], &[exemption]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("'Foo'"));
    }

    #[test]
    fn non_matching_exemption_is_a_no_op() {
        let exemption = Exemption::new("ignore Baz", |e| {
            matches!(e, CheckError::Violation(v) if v.entity_name == "Baz")
        });
        let errors = apply_all(vec![violation("Foo")], &[exemption]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn dependency_exemption_narrows_then_removes() {
        let partial = Exemption::dependency_on("allow Legacy.Billing", |r| r == "Legacy.Billing");
        let errors = apply_all(vec![dependency(&["Legacy.Billing", "Legacy.Auth"])], &[partial]);
        assert_eq!(errors.len(), 1);
        let CheckError::Dependency(dep) = &errors[0] else {
            panic!("expected dependency error");
        };
        assert_eq!(dep.forbidden, vec!["Legacy.Auth"]);

        // A second exemption for the remaining reference removes the error.
        let first = Exemption::dependency_on("allow Legacy.Billing", |r| r == "Legacy.Billing");
        let second = Exemption::dependency_on("allow Legacy.Auth", |r| r == "Legacy.Auth");
        let errors = apply_all(
            vec![dependency(&["Legacy.Billing", "Legacy.Auth"])],
            &[first, second],
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn reapplying_an_exemption_is_idempotent() {
        let a = Exemption::dependency_on("allow all", |_| true);
        let b = Exemption::dependency_on("allow all", |_| true);
        // Both exemptions fully cover the error; the second application
        // must not resurrect it or panic.
        let errors = apply_all(vec![dependency(&["Legacy.Auth"])], &[a, b]);
        assert!(errors.is_empty());
    }

    #[test]
    fn allow_empty_only_touches_empty_source_errors() {
        let exemption = Exemption::allow_empty();
        let empty = CheckError::EmptySource(EmptySourceError {
            filters: vec!["are sealed".to_string()],
        });
        assert!(exemption.apply(empty).is_none());

        let kept = exemption.apply(violation("Foo"));
        assert!(kept.is_some());
    }

    #[test]
    fn dependency_exemption_ignores_other_error_kinds() {
        let exemption = Exemption::dependency_on("allow all", |_| true);
        assert!(exemption.apply(violation("Foo")).is_some());
    }
}
