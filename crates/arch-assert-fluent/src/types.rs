//! The type facade.

use arch_assert_core::metadata::{AccessModifiers, MetadataIndex, TypeId};
use arch_assert_core::{
    relations, Check, CheckError, Entity, EntityRef, Exemption, Filter, Pattern, Requirement,
    Rule, ViolationError,
};

use crate::members::{ConstructorsBuilder, MethodsBuilder};
use crate::predicates;

/// Starts a rule over the types of the checked assemblies.
#[must_use]
pub fn types() -> TypesBuilder {
    TypesBuilder {
        rule: Rule::new(),
    }
}

/// Fluent builder for type rules.
///
/// `that_*` calls narrow the candidate set (AND-composed), `should_*`
/// calls add requirements, `unless`/`allow_empty` add exemptions, and
/// [`check`](Self::check) freezes the chain into a runnable
/// [`Check`].
#[derive(Debug)]
pub struct TypesBuilder {
    rule: Rule<TypeId>,
}

/// Resolves a type by full name per run, then tests the relation.
fn relation_filter(
    description: String,
    target: String,
    relation: impl Fn(&MetadataIndex, TypeId, TypeId) -> bool + 'static,
) -> Filter<TypeId> {
    Filter::new(description, move |index, ty| {
        index
            .find_type(&target)
            .is_some_and(|t| relation(index, ty, t))
    })
}

impl TypesBuilder {
    /// Readability no-op separating the subject from its filters.
    #[must_use]
    pub fn that(self) -> Self {
        self
    }

    /// Keeps only public types.
    #[must_use]
    pub fn that_are_public(self) -> Self {
        self.that_have_access(AccessModifiers::PUBLIC)
    }

    /// Keeps only types whose access is in the given set.
    #[must_use]
    pub fn that_have_access(mut self, set: AccessModifiers) -> Self {
        self.rule = self.rule.which(predicates::access_in(set));
        self
    }

    /// Keeps only types whose simple name matches the pattern.
    #[must_use]
    pub fn that_have_name_matching(mut self, pattern: Pattern, ignore_case: bool) -> Self {
        self.rule = self.rule.which(predicates::name_matching(pattern, ignore_case));
        self
    }

    /// Keeps only types whose namespace matches the pattern. Types
    /// without a namespace never match.
    #[must_use]
    pub fn that_reside_in_namespace(mut self, pattern: Pattern, ignore_case: bool) -> Self {
        self.rule = self.rule.which(Filter::new(
            format!("reside in namespace matching '{pattern}'"),
            move |index: &MetadataIndex, ty: TypeId| {
                pattern.matches(index.type_data(ty).namespace.as_deref(), ignore_case)
            },
        ));
        self
    }

    /// Keeps only interfaces.
    #[must_use]
    pub fn that_are_interfaces(mut self) -> Self {
        self.rule = self.rule.which(Filter::new(
            "are interfaces",
            |index: &MetadataIndex, ty: TypeId| index.type_data(ty).is_interface,
        ));
        self
    }

    /// Keeps only abstract types.
    #[must_use]
    pub fn that_are_abstract(mut self) -> Self {
        self.rule = self.rule.which(Filter::new(
            "are abstract",
            |index: &MetadataIndex, ty: TypeId| index.type_data(ty).is_abstract,
        ));
        self
    }

    /// Keeps only sealed types.
    #[must_use]
    pub fn that_are_sealed(mut self) -> Self {
        self.rule = self.rule.which(Filter::new(
            "are sealed",
            |index: &MetadataIndex, ty: TypeId| index.type_data(ty).is_sealed,
        ));
        self
    }

    /// Keeps only nested types.
    #[must_use]
    pub fn that_are_nested(mut self) -> Self {
        self.rule = self.rule.which(Filter::new(
            "are nested",
            |index: &MetadataIndex, ty: TypeId| index.type_data(ty).is_nested,
        ));
        self
    }

    /// Keeps only generic types (open or closed).
    #[must_use]
    pub fn that_are_generic(mut self) -> Self {
        self.rule = self.rule.which(Filter::new(
            "are generic",
            |index: &MetadataIndex, ty: TypeId| index.type_data(ty).is_generic(),
        ));
        self
    }

    /// Keeps only types implementing the named interface. Open/closed
    /// generic mismatches are tolerated.
    #[must_use]
    pub fn that_implement(mut self, interface: impl Into<String>) -> Self {
        let interface = interface.into();
        self.rule = self.rule.which(relation_filter(
            format!("implement '{interface}'"),
            interface,
            |index, ty, target| relations::implements(index, ty, target, false),
        ));
        self
    }

    /// Keeps only types inheriting (transitively) from the named type.
    #[must_use]
    pub fn that_inherit_from(mut self, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        self.rule = self.rule.which(relation_filter(
            format!("inherit from '{parent}'"),
            parent,
            |index, ty, target| relations::inherits_from(index, ty, target, false),
        ));
        self
    }

    /// Keeps only types assignable to the named type: the type itself or
    /// any of its ancestors/interfaces.
    #[must_use]
    pub fn that_are_assignable_to(mut self, target: impl Into<String>) -> Self {
        let target = target.into();
        self.rule = self.rule.which(relation_filter(
            format!("are assignable to '{target}'"),
            target,
            |index, ty, t| relations::is_or_inherits_from(index, ty, t, false),
        ));
        self
    }

    /// Opens an attribute clause. Alternatives added with
    /// [`or_attribute`](TypeAttributeClause::or_attribute) compose with
    /// OR inside the clause, which as a whole ANDs with the rest of the
    /// chain. Attribute lookup searches the base-type chain.
    #[must_use]
    pub fn with_attribute(self, attribute: impl Into<String>) -> TypeAttributeClause {
        TypeAttributeClause {
            builder: self,
            names: vec![attribute.into()],
        }
    }

    /// Shorthand for an attribute clause over a fixed set of alternatives.
    #[must_use]
    pub fn with_attribute_any_of<I, S>(self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let clause = TypeAttributeClause {
            builder: self,
            names: attributes.into_iter().map(Into::into).collect(),
        };
        if clause.names.is_empty() {
            return clause.builder;
        }
        clause.done()
    }

    /// Appends a custom filter.
    #[must_use]
    pub fn which(mut self, filter: Filter<TypeId>) -> Self {
        self.rule = self.rule.which(filter);
        self
    }

    /// Requires every surviving type to be public.
    #[must_use]
    pub fn should_be_public(self) -> Self {
        self.should_have_access(AccessModifiers::PUBLIC)
    }

    /// Requires every surviving type's access to be in the given set.
    #[must_use]
    pub fn should_have_access(mut self, set: AccessModifiers) -> Self {
        self.rule = self.rule.should(predicates::should_have_access(set));
        self
    }

    /// Requires every surviving type's simple name to match the pattern.
    #[must_use]
    pub fn should_have_name_matching(mut self, pattern: Pattern, ignore_case: bool) -> Self {
        self.rule = self
            .rule
            .should(predicates::should_have_name_matching(pattern, ignore_case));
        self
    }

    /// Requires every surviving type to reside in a namespace matching
    /// the pattern.
    #[must_use]
    pub fn should_reside_in_namespace(mut self, pattern: Pattern, ignore_case: bool) -> Self {
        let matcher = pattern.clone();
        self.rule = self.rule.should(Requirement::should_satisfy(
            format!("should reside in namespace matching '{pattern}'"),
            move |index: &MetadataIndex, ty: TypeId| {
                matcher.matches(index.type_data(ty).namespace.as_deref(), ignore_case)
            },
            move |index, ty: TypeId| {
                CheckError::Violation(ViolationError::new(
                    ty.entity_ref(),
                    ty.full_name(index),
                    format!(
                        "Type '{}' should reside in a namespace matching '{pattern}'",
                        ty.name(index)
                    ),
                ))
            },
        ));
        self
    }

    /// Requires every surviving type to be sealed.
    #[must_use]
    pub fn should_be_sealed(mut self) -> Self {
        self.rule = self.rule.should(Requirement::should_satisfy(
            "should be sealed",
            |index: &MetadataIndex, ty: TypeId| index.type_data(ty).is_sealed,
            |index, ty: TypeId| {
                CheckError::Violation(ViolationError::new(
                    ty.entity_ref(),
                    ty.full_name(index),
                    format!("Type '{}' should be sealed", ty.name(index)),
                ))
            },
        ));
        self
    }

    /// Requires every surviving type to implement the named interface.
    #[must_use]
    pub fn should_implement(mut self, interface: impl Into<String>) -> Self {
        let interface = interface.into();
        let target = interface.clone();
        self.rule = self.rule.should(Requirement::should_satisfy(
            format!("should implement '{interface}'"),
            move |index: &MetadataIndex, ty: TypeId| {
                index
                    .find_type(&target)
                    .is_some_and(|t| relations::implements(index, ty, t, false))
            },
            move |index, ty: TypeId| {
                CheckError::Violation(ViolationError::new(
                    ty.entity_ref(),
                    ty.full_name(index),
                    format!("Type '{}' should implement '{interface}'", ty.name(index)),
                ))
            },
        ));
        self
    }

    /// Requires every surviving type to inherit from the named type.
    #[must_use]
    pub fn should_inherit_from(mut self, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        let target = parent.clone();
        self.rule = self.rule.should(Requirement::should_satisfy(
            format!("should inherit from '{parent}'"),
            move |index: &MetadataIndex, ty: TypeId| {
                index
                    .find_type(&target)
                    .is_some_and(|t| relations::inherits_from(index, ty, t, false))
            },
            move |index, ty: TypeId| {
                CheckError::Violation(ViolationError::new(
                    ty.entity_ref(),
                    ty.full_name(index),
                    format!("Type '{}' should inherit from '{parent}'", ty.name(index)),
                ))
            },
        ));
        self
    }

    /// Requires every surviving type to have at least one representative
    /// method (declared here, public, instance, non-special-name)
    /// satisfying all of the given method filters.
    #[must_use]
    pub fn should_have_method_that(mut self, methods: MethodsBuilder) -> Self {
        let description = methods.filter_description();
        let filters = methods.into_filters();
        let summary = description.clone();
        self.rule = self.rule.should(Requirement::delegate_any(
            format!("should have a method satisfying: {description}"),
            |index: &MetadataIndex, ty: TypeId| {
                index
                    .representative_methods(ty)
                    .iter()
                    .map(|m| m.entity_ref())
                    .collect()
            },
            move |index, delegate| match delegate {
                EntityRef::Method(m) => {
                    filters.iter().all(|f| f.applies(index, m))
                }
                _ => false,
            },
            move |index, ty: TypeId, all| {
                CheckError::Violation(ViolationError::new(
                    ty.entity_ref(),
                    ty.full_name(index),
                    format!(
                        "Type '{}' should have a method satisfying: {summary}, but none of its {} method(s) does",
                        ty.name(index),
                        all.len()
                    ),
                ))
            },
        ));
        self
    }

    /// Requires every surviving type to have at least one constructor
    /// satisfying all of the given constructor filters.
    #[must_use]
    pub fn should_have_constructor_that(mut self, constructors: ConstructorsBuilder) -> Self {
        let description = constructors.filter_description();
        let filters = constructors.into_filters();
        let summary = description.clone();
        self.rule = self.rule.should(Requirement::delegate_any(
            format!("should have a constructor satisfying: {description}"),
            |index: &MetadataIndex, ty: TypeId| {
                index
                    .type_data(ty)
                    .constructors
                    .iter()
                    .map(|c| c.entity_ref())
                    .collect()
            },
            move |index, delegate| match delegate {
                EntityRef::Constructor(c) => {
                    filters.iter().all(|f| f.applies(index, c))
                }
                _ => false,
            },
            move |index, ty: TypeId, all| {
                CheckError::Violation(ViolationError::new(
                    ty.entity_ref(),
                    ty.full_name(index),
                    format!(
                        "Type '{}' should have a constructor satisfying: {summary}, but none of its {} constructor(s) does",
                        ty.name(index),
                        all.len()
                    ),
                ))
            },
        ));
        self
    }

    /// Appends a custom requirement.
    #[must_use]
    pub fn should(mut self, requirement: Requirement<TypeId>) -> Self {
        self.rule = self.rule.should(requirement);
        self
    }

    /// Appends an exemption.
    #[must_use]
    pub fn unless(mut self, exemption: Exemption) -> Self {
        self.rule = self.rule.unless(exemption);
        self
    }

    /// Accepts an empty candidate set instead of reporting it.
    #[must_use]
    pub fn allow_empty(self) -> Self {
        self.unless(Exemption::allow_empty())
    }

    /// Names the rule.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.rule = self.rule.named(name);
        self
    }

    /// Freezes the chain into a runnable check.
    #[must_use]
    pub fn check(self) -> Check<TypeId> {
        self.rule.check()
    }
}

/// An open attribute clause on a type rule.
#[derive(Debug)]
pub struct TypeAttributeClause {
    builder: TypesBuilder,
    names: Vec<String>,
}

impl TypeAttributeClause {
    /// Adds an alternative attribute to the clause.
    #[must_use]
    pub fn or_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.names.push(attribute.into());
        self
    }

    /// Closes the clause and returns to the type chain.
    #[must_use]
    pub fn done(mut self) -> TypesBuilder {
        let filter = self.into_filter();
        self.builder.rule = self.builder.rule.which(filter);
        self.builder
    }

    fn into_filter(&self) -> Filter<TypeId> {
        let alternatives = self
            .names
            .iter()
            .map(|name| {
                let name = name.clone();
                Filter::new(format!("have attribute '{name}'"), move |index: &MetadataIndex, ty: TypeId| {
                    index
                        .find_type(&name)
                        .is_some_and(|attr| index.type_has_attribute(ty, attr, true))
                })
            })
            .collect();
        let description = format!(
            "have attribute {}",
            self.names
                .iter()
                .map(|n| format!("'{n}'"))
                .collect::<Vec<_>>()
                .join(" or ")
        );
        Filter::any_of(description, alternatives)
    }
}
