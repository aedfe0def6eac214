//! The member facades: constructors, events, fields, methods,
//! properties, and parameters.
//!
//! The five member kinds share one builder shape, generated per kind.
//! Parameters get a reduced hand-written builder: they carry neither
//! access levels nor attributes in the model.

use arch_assert_core::metadata::{
    AccessModifiers, ConstructorId, EventId, FieldId, MetadataIndex, MethodId, ParameterId,
    PropertyId, TypeId,
};
use arch_assert_core::{
    any_member_satisfies, Check, Exemption, Filter, Pattern, Requirement, Rule,
};

use crate::predicates;

/// Generates the fluent builder for one member kind.
macro_rules! member_builder {
    (
        $(#[$entry_doc:meta])*
        $entry:ident, $builder:ident, $id:ty
    ) => {
        $(#[$entry_doc])*
        #[must_use]
        pub fn $entry() -> $builder {
            $builder {
                name: None,
                filters: Vec::new(),
                requirements: Vec::new(),
                exemptions: Vec::new(),
            }
        }

        /// Fluent builder for rules over this member kind.
        ///
        /// `that_*` calls narrow (AND-composed), `should_*` calls add
        /// requirements, and [`check`](Self::check) freezes the chain.
        /// [`into_type_filter`](Self::into_type_filter) instead projects
        /// the accumulated filters onto the declaring type.
        #[derive(Debug)]
        pub struct $builder {
            name: Option<String>,
            filters: Vec<Filter<$id>>,
            requirements: Vec<Requirement<$id>>,
            exemptions: Vec<Exemption>,
        }

        impl $builder {
            /// Readability no-op separating the subject from its filters.
            #[must_use]
            pub fn that(self) -> Self {
                self
            }

            /// Keeps only public members.
            #[must_use]
            pub fn that_are_public(self) -> Self {
                self.that_have_access(AccessModifiers::PUBLIC)
            }

            /// Keeps only members whose access is in the given set.
            #[must_use]
            pub fn that_have_access(mut self, set: AccessModifiers) -> Self {
                self.filters.push(predicates::access_in(set));
                self
            }

            /// Keeps only members whose name matches the pattern.
            #[must_use]
            pub fn that_have_name_matching(mut self, pattern: Pattern, ignore_case: bool) -> Self {
                self.filters.push(predicates::name_matching(pattern, ignore_case));
                self
            }

            /// Keeps only members carrying the named attribute.
            #[must_use]
            pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
                self.filters.push(predicates::has_attribute(attribute));
                self
            }

            /// Keeps only members carrying any of the named attributes
            /// (OR inside the clause, AND with the rest of the chain).
            #[must_use]
            pub fn with_attribute_any_of<I, S>(mut self, attributes: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                let names: Vec<String> = attributes.into_iter().map(Into::into).collect();
                if names.is_empty() {
                    return self;
                }
                let description = format!(
                    "have attribute {}",
                    names
                        .iter()
                        .map(|n| format!("'{n}'"))
                        .collect::<Vec<_>>()
                        .join(" or ")
                );
                let alternatives = names.into_iter().map(predicates::has_attribute).collect();
                self.filters.push(Filter::any_of(description, alternatives));
                self
            }

            /// Appends a custom filter.
            #[must_use]
            pub fn which(mut self, filter: Filter<$id>) -> Self {
                self.filters.push(filter);
                self
            }

            /// Requires every surviving member to be public.
            #[must_use]
            pub fn should_be_public(self) -> Self {
                self.should_have_access(AccessModifiers::PUBLIC)
            }

            /// Requires every surviving member's access to be in the set.
            #[must_use]
            pub fn should_have_access(mut self, set: AccessModifiers) -> Self {
                self.requirements.push(predicates::should_have_access(set));
                self
            }

            /// Requires every surviving member's name to match the pattern.
            #[must_use]
            pub fn should_have_name_matching(mut self, pattern: Pattern, ignore_case: bool) -> Self {
                self.requirements
                    .push(predicates::should_have_name_matching(pattern, ignore_case));
                self
            }

            /// Appends a custom requirement.
            #[must_use]
            pub fn should(mut self, requirement: Requirement<$id>) -> Self {
                self.requirements.push(requirement);
                self
            }

            /// Appends an exemption.
            #[must_use]
            pub fn unless(mut self, exemption: Exemption) -> Self {
                self.exemptions.push(exemption);
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
                self.name = Some(name.into());
                self
            }

            /// Freezes the chain into a runnable check.
            #[must_use]
            pub fn check(self) -> Check<$id> {
                let mut rule = Rule::new();
                if let Some(name) = self.name {
                    rule = rule.named(name);
                }
                for filter in self.filters {
                    rule = rule.which(filter);
                }
                for requirement in self.requirements {
                    rule = rule.should(requirement);
                }
                for exemption in self.exemptions {
                    rule = rule.unless(exemption);
                }
                rule.check()
            }

            /// Projects the accumulated filters onto the declaring type:
            /// a type passes if any of its members of this kind satisfies
            /// all of them.
            #[must_use]
            pub fn into_type_filter(self, description: impl Into<String>) -> Filter<TypeId> {
                any_member_satisfies::<$id>(description, self.filters)
            }

            /// Joined description of the accumulated filters, for use in
            /// delegated-requirement messages.
            pub(crate) fn filter_description(&self) -> String {
                if self.filters.is_empty() {
                    "exists".to_string()
                } else {
                    self.filters
                        .iter()
                        .map(|f| f.description().to_string())
                        .collect::<Vec<_>>()
                        .join(" and ")
                }
            }

            pub(crate) fn into_filters(self) -> Vec<Filter<$id>> {
                self.filters
            }
        }
    };
}

member_builder!(
    /// Starts a rule over the constructors of the checked assemblies.
    constructors,
    ConstructorsBuilder,
    ConstructorId
);
member_builder!(
    /// Starts a rule over the events of the checked assemblies.
    events,
    EventsBuilder,
    EventId
);
member_builder!(
    /// Starts a rule over the fields of the checked assemblies.
    fields,
    FieldsBuilder,
    FieldId
);
member_builder!(
    /// Starts a rule over the methods of the checked assemblies.
    methods,
    MethodsBuilder,
    MethodId
);
member_builder!(
    /// Starts a rule over the properties of the checked assemblies.
    properties,
    PropertiesBuilder,
    PropertyId
);

impl MethodsBuilder {
    /// Keeps only static methods.
    #[must_use]
    pub fn that_are_static(mut self) -> Self {
        self.filters.push(Filter::new(
            "are static",
            |index: &MetadataIndex, m: MethodId| index.method(m).is_static,
        ));
        self
    }

    /// Keeps only instance methods.
    #[must_use]
    pub fn that_are_instance(mut self) -> Self {
        self.filters.push(Filter::new(
            "are instance methods",
            |index: &MetadataIndex, m: MethodId| !index.method(m).is_static,
        ));
        self
    }
}

/// Starts a rule over the parameters of the checked assemblies.
#[must_use]
pub fn parameters() -> ParametersBuilder {
    ParametersBuilder { rule: Rule::new() }
}

/// Fluent builder for parameter rules. Parameters only expose naming
/// facts, so the surface is name matching plus custom predicates.
#[derive(Debug)]
pub struct ParametersBuilder {
    rule: Rule<ParameterId>,
}

impl ParametersBuilder {
    /// Readability no-op separating the subject from its filters.
    #[must_use]
    pub fn that(self) -> Self {
        self
    }

    /// Keeps only parameters whose name matches the pattern.
    #[must_use]
    pub fn that_have_name_matching(mut self, pattern: Pattern, ignore_case: bool) -> Self {
        self.rule = self.rule.which(predicates::name_matching(pattern, ignore_case));
        self
    }

    /// Appends a custom filter.
    #[must_use]
    pub fn which(mut self, filter: Filter<ParameterId>) -> Self {
        self.rule = self.rule.which(filter);
        self
    }

    /// Requires every surviving parameter's name to match the pattern.
    #[must_use]
    pub fn should_have_name_matching(mut self, pattern: Pattern, ignore_case: bool) -> Self {
        self.rule = self
            .rule
            .should(predicates::should_have_name_matching(pattern, ignore_case));
        self
    }

    /// Appends a custom requirement.
    #[must_use]
    pub fn should(mut self, requirement: Requirement<ParameterId>) -> Self {
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
    pub fn check(self) -> Check<ParameterId> {
        self.rule.check()
    }
}
