//! Named, composable filters.

use crate::entity::{Entity, MemberEntity};
use crate::metadata::{MetadataIndex, TypeId};

/// A named predicate that narrows a candidate set without producing
/// errors.
///
/// Filters are pure: created at rule-build time, invoked many times
/// during one check, never mutated after creation. Chaining several
/// filters on a rule composes them with logical AND.
pub struct Filter<E> {
    description: String,
    predicate: Box<dyn Fn(&MetadataIndex, E) -> bool>,
}

impl<E: Entity> Filter<E> {
    /// Creates a named filter.
    pub fn new<P>(description: impl Into<String>, predicate: P) -> Self
    where
        P: Fn(&MetadataIndex, E) -> bool + 'static,
    {
        Self {
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Composes alternatives with logical OR under one name.
    ///
    /// Used for attribute clauses: the outer rule chain stays AND-composed
    /// while the alternatives inside the clause are OR-composed.
    #[must_use]
    pub fn any_of(description: impl Into<String>, alternatives: Vec<Filter<E>>) -> Self {
        Self::new(description, move |index, entity| {
            alternatives.iter().any(|f| f.applies(index, entity))
        })
    }

    /// Evaluates the filter for one entity.
    #[must_use]
    pub fn applies(&self, index: &MetadataIndex, entity: E) -> bool {
        (self.predicate)(index, entity)
    }

    /// The human-readable description, used in empty-source reporting.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<E> std::fmt::Debug for Filter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Projects a set of member filters onto the declaring type: the type
/// passes if *any* of its members of kind `M` individually satisfies
/// *all* of the given filters.
///
/// This lets a rule select types by "has a method that is public and
/// named Foo" in one step.
#[must_use]
pub fn any_member_satisfies<M: MemberEntity>(
    description: impl Into<String>,
    filters: Vec<Filter<M>>,
) -> Filter<TypeId> {
    Filter::new(description, move |index, ty| {
        M::of_type(index, ty)
            .into_iter()
            .any(|member| filters.iter().all(|f| f.applies(index, member)))
    })
}
