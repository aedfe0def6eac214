//! Requirements: predicates with error factories.

use crate::entity::{Entity, EntityRef};
use crate::error::CheckError;
use crate::metadata::MetadataIndex;

type Predicate<E> = Box<dyn Fn(&MetadataIndex, E) -> bool>;

/// A named predicate plus an error factory, evaluated per surviving
/// entity.
///
/// The factory runs *only* when the predicate is false, so no error
/// objects are built for passing entities.
pub struct Requirement<E> {
    description: String,
    eval: Eval<E>,
}

enum Eval<E> {
    Simple {
        predicate: Predicate<E>,
        error: Box<dyn Fn(&MetadataIndex, E) -> CheckError>,
    },
    /// Evaluated over a derived collection: the owner passes if *any*
    /// delegate satisfies the inner predicate; otherwise one error is
    /// built for the owner, referencing all the near-misses.
    DelegateAny {
        delegates: Box<dyn Fn(&MetadataIndex, E) -> Vec<EntityRef>>,
        satisfies: Box<dyn Fn(&MetadataIndex, EntityRef) -> bool>,
        error: Box<dyn Fn(&MetadataIndex, E, &[EntityRef]) -> CheckError>,
    },
}

impl<E: Entity> Requirement<E> {
    /// Creates a simple requirement.
    pub fn should_satisfy<P, F>(description: impl Into<String>, predicate: P, error: F) -> Self
    where
        P: Fn(&MetadataIndex, E) -> bool + 'static,
        F: Fn(&MetadataIndex, E) -> CheckError + 'static,
    {
        Self {
            description: description.into(),
            eval: Eval::Simple {
                predicate: Box::new(predicate),
                error: Box::new(error),
            },
        }
    }

    /// Creates a delegated any-of requirement, e.g. "type should have a
    /// constructor satisfying X".
    pub fn delegate_any<D, S, F>(
        description: impl Into<String>,
        delegates: D,
        satisfies: S,
        error: F,
    ) -> Self
    where
        D: Fn(&MetadataIndex, E) -> Vec<EntityRef> + 'static,
        S: Fn(&MetadataIndex, EntityRef) -> bool + 'static,
        F: Fn(&MetadataIndex, E, &[EntityRef]) -> CheckError + 'static,
    {
        Self {
            description: description.into(),
            eval: Eval::DelegateAny {
                delegates: Box::new(delegates),
                satisfies: Box::new(satisfies),
                error: Box::new(error),
            },
        }
    }

    /// Evaluates the requirement for one entity, producing an error on
    /// failure.
    #[must_use]
    pub fn evaluate(&self, index: &MetadataIndex, entity: E) -> Option<CheckError> {
        match &self.eval {
            Eval::Simple { predicate, error } => {
                if predicate(index, entity) {
                    None
                } else {
                    Some(error(index, entity))
                }
            }
            Eval::DelegateAny {
                delegates,
                satisfies,
                error,
            } => {
                let all = delegates(index, entity);
                if all.iter().any(|d| satisfies(index, *d)) {
                    None
                } else {
                    Some(error(index, entity, &all))
                }
            }
        }
    }

    /// The requirement's description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<E> std::fmt::Debug for Requirement<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Requirement")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
