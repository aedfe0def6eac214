//! The assembly facade.

use arch_assert_core::metadata::{AssemblyId, MetadataIndex};
use arch_assert_core::{
    Check, CheckError, DependencyError, Exemption, Filter, Pattern, Requirement, Rule,
};

use crate::predicates;

/// Starts a rule over the checked assemblies themselves.
#[must_use]
pub fn assemblies() -> AssembliesBuilder {
    AssembliesBuilder { rule: Rule::new() }
}

/// Fluent builder for assembly rules.
#[derive(Debug)]
pub struct AssembliesBuilder {
    rule: Rule<AssemblyId>,
}

fn forbidden_references(index: &MetadataIndex, assembly: AssemblyId, pattern: &Pattern) -> Vec<String> {
    index
        .assembly(assembly)
        .referenced_assemblies
        .iter()
        .filter(|r| pattern.matches(Some(r.as_str()), false))
        .cloned()
        .collect()
}

impl AssembliesBuilder {
    /// Readability no-op separating the subject from its filters.
    #[must_use]
    pub fn that(self) -> Self {
        self
    }

    /// Keeps only assemblies whose name matches the pattern.
    #[must_use]
    pub fn that_have_name_matching(mut self, pattern: Pattern, ignore_case: bool) -> Self {
        self.rule = self.rule.which(predicates::name_matching(pattern, ignore_case));
        self
    }

    /// Appends a custom filter.
    #[must_use]
    pub fn which(mut self, filter: Filter<AssemblyId>) -> Self {
        self.rule = self.rule.which(filter);
        self
    }

    /// Requires every surviving assembly's name to match the pattern.
    #[must_use]
    pub fn should_have_name_matching(mut self, pattern: Pattern, ignore_case: bool) -> Self {
        self.rule = self
            .rule
            .should(predicates::should_have_name_matching(pattern, ignore_case));
        self
    }

    /// Forbids references to assemblies matching the pattern. A failing
    /// assembly produces one dependency error listing every offending
    /// reference, which exemptions can narrow.
    #[must_use]
    pub fn should_not_depend_on(mut self, pattern: Pattern) -> Self {
        let probe = pattern.clone();
        self.rule = self.rule.should(Requirement::should_satisfy(
            format!("should not depend on '{pattern}'"),
            move |index: &MetadataIndex, assembly: AssemblyId| {
                forbidden_references(index, assembly, &probe).is_empty()
            },
            move |index, assembly: AssemblyId| {
                CheckError::Dependency(DependencyError::new(
                    assembly,
                    index.assembly(assembly).name.clone(),
                    pattern.as_str(),
                    forbidden_references(index, assembly, &pattern),
                ))
            },
        ));
        self
    }

    /// Exempts references matching the pattern from earlier dependency
    /// requirements. A dependency error is dropped only once every one
    /// of its references is exempted.
    #[must_use]
    pub fn except_dependency_on(mut self, pattern: Pattern) -> Self {
        self.rule = self.rule.unless(Exemption::dependency_on(
            format!("except dependency on '{pattern}'"),
            move |reference| pattern.matches(Some(reference), false),
        ));
        self
    }

    /// Appends a custom requirement.
    #[must_use]
    pub fn should(mut self, requirement: Requirement<AssemblyId>) -> Self {
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
    pub fn check(self) -> Check<AssemblyId> {
        self.rule.check()
    }
}
