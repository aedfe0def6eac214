//! Rule building and check execution.

use tracing::{debug, info};

use crate::config::CheckOptions;
use crate::entity::Entity;
use crate::error::{CheckError, EmptySourceError};
use crate::exemption::{self, Exemption};
use crate::filter::Filter;
use crate::metadata::MetadataSource;
use crate::requirement::Requirement;
use crate::result::TestResult;

/// Builder accumulating the filters, requirements, and exemptions of one
/// architectural rule over one entity kind.
///
/// Building is a fluent chain; [`check`](Self::check) consumes the
/// builder and snapshots the accumulated lists into an immutable
/// [`Check`], so a rule under construction can never alias a check being
/// executed.
///
/// # Example
///
/// ```
/// use arch_assert_core::{Filter, Requirement, Rule, ViolationError, CheckError};
/// use arch_assert_core::metadata::{Access, MetadataIndex, TypeId, TypeSpec};
/// use arch_assert_core::Entity;
///
/// let mut builder = MetadataIndex::builder();
/// let asm = builder.add_assembly("App");
/// builder.add_type(asm, TypeSpec::new("Visible"));
/// builder.add_type(asm, TypeSpec::new("Hidden").with_access(Access::Internal));
/// let index = builder.build();
///
/// let check = Rule::<TypeId>::new()
///     .named("all types are public")
///     .should(Requirement::should_satisfy(
///         "should be public",
///         |idx, t: TypeId| t.access(idx) == Some(Access::Public),
///         |idx, t| CheckError::Violation(ViolationError::new(
///             t.entity_ref(),
///             t.full_name(idx),
///             format!("Type '{}' should be public", t.name(idx)),
///         )),
///     ))
///     .check();
///
/// let result = check.run(&index);
/// assert!(result.is_violated());
/// assert_eq!(result.errors.len(), 1);
/// ```
#[derive(Debug)]
pub struct Rule<E: Entity> {
    name: Option<String>,
    filters: Vec<Filter<E>>,
    requirements: Vec<Requirement<E>>,
    exemptions: Vec<Exemption>,
}

impl<E: Entity> Default for Rule<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Rule<E> {
    /// Creates an empty rule.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            filters: Vec::new(),
            requirements: Vec::new(),
            exemptions: Vec::new(),
        }
    }

    /// Names the rule; the name is carried into results and reports.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a filter. Chained filters compose with logical AND.
    #[must_use]
    pub fn which(mut self, filter: Filter<E>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Appends a requirement. Requirements run in declaration order.
    #[must_use]
    pub fn should(mut self, requirement: Requirement<E>) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Appends an exemption. Exemptions run after the full requirement
    /// pass, never interleaved.
    #[must_use]
    pub fn unless(mut self, exemption: Exemption) -> Self {
        self.exemptions.push(exemption);
        self
    }

    /// Freezes the rule into an executable check.
    #[must_use]
    pub fn check(self) -> Check<E> {
        Check {
            name: self.name,
            filters: self.filters,
            requirements: self.requirements,
            exemptions: self.exemptions,
        }
    }
}

/// An immutable, executable rule pipeline.
///
/// A check can be run any number of times, against different metadata
/// sources; every run re-evaluates the full pipeline and materializes a
/// fresh error list.
#[derive(Debug)]
pub struct Check<E: Entity> {
    name: Option<String>,
    filters: Vec<Filter<E>>,
    requirements: Vec<Requirement<E>>,
    exemptions: Vec<Exemption>,
}

impl<E: Entity> Check<E> {
    /// The rule name, if one was set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Runs the check with default options.
    #[must_use]
    pub fn run(&self, source: &dyn MetadataSource) -> TestResult {
        self.run_with(source, &CheckOptions::default())
    }

    /// Runs the check with explicit options.
    #[must_use]
    pub fn run_with(&self, source: &dyn MetadataSource, options: &CheckOptions) -> TestResult {
        let index = source.index();
        let assemblies = source.assemblies();

        info!(
            rule = self.name.as_deref().unwrap_or("<unnamed>"),
            kind = %E::KIND,
            assemblies = assemblies.len(),
            "running check"
        );

        let mut candidates = E::in_assemblies(index, &assemblies);
        debug!(candidates = candidates.len(), "raw candidate set");

        if options.apply_exclusions {
            candidates.retain(|e| !e.excluded_by(index, &options.exclusions));
            debug!(candidates = candidates.len(), "after exclusion list");
        }

        candidates.retain(|e| self.filters.iter().all(|f| f.applies(index, *e)));
        debug!(candidates = candidates.len(), "after filters");

        let errors = if candidates.is_empty() {
            // An empty filtered set bypasses requirement evaluation
            // entirely: there is nothing to evaluate, and the caller most
            // likely typo'd a filter.
            vec![CheckError::EmptySource(EmptySourceError {
                filters: self
                    .filters
                    .iter()
                    .map(|f| f.description().to_string())
                    .collect(),
            })]
        } else {
            let mut errors = Vec::new();
            for entity in &candidates {
                for requirement in &self.requirements {
                    if let Some(error) = requirement.evaluate(index, *entity) {
                        errors.push(error);
                    }
                }
            }
            errors
        };

        let errors = exemption::apply_all(errors, &self.exemptions);
        debug!(errors = errors.len(), "check complete");

        TestResult {
            errors,
            description: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExclusionList;
    use crate::entity::Entity;
    use crate::error::ViolationError;
    use crate::metadata::{Access, MetadataIndex, TypeId, TypeSpec};

    fn index() -> MetadataIndex {
        let mut b = MetadataIndex::builder();
        let app = b.add_assembly("App");
        b.add_type(app, TypeSpec::new("Foo").in_namespace("App"));
        b.add_type(
            app,
            TypeSpec::new("Bar").in_namespace("App").with_access(Access::Internal),
        );
        let platform = b.add_assembly("System.Runtime");
        b.add_type(
            platform,
            TypeSpec::new("Guid")
                .in_namespace("System")
                .with_access(Access::Internal),
        );
        b.build()
    }

    fn be_public() -> Requirement<TypeId> {
        Requirement::should_satisfy(
            "should be public",
            |idx, t: TypeId| t.access(idx) == Some(Access::Public),
            |idx, t| {
                CheckError::Violation(ViolationError::new(
                    t.entity_ref(),
                    t.full_name(idx),
                    format!("Type '{}' should be public", t.name(idx)),
                ))
            },
        )
    }

    #[test]
    fn violations_are_collected_not_short_circuited() {
        let index = index();
        let check = Rule::<TypeId>::new()
            .should(be_public())
            .should(Requirement::should_satisfy(
                "should be named Foo",
                |idx, t: TypeId| t.name(idx) == "Foo",
                |idx, t| {
                    CheckError::Violation(ViolationError::new(
                        t.entity_ref(),
                        t.full_name(idx),
                        format!("Type '{}' should be named Foo", t.name(idx)),
                    ))
                },
            ))
            .check();

        let result = check.run(&index);
        // Bar fails both requirements; both errors are present.
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn default_exclusions_drop_platform_types() {
        let index = index();
        let check = Rule::<TypeId>::new().should(be_public()).check();

        let with_exclusions = check.run(&index);
        assert_eq!(with_exclusions.errors.len(), 1, "System.Guid is excluded");

        let unfiltered = check.run_with(&index, &CheckOptions::without_exclusions());
        assert_eq!(unfiltered.errors.len(), 2);
    }

    #[test]
    fn explicit_exclusion_list_overrides_default() {
        let index = index();
        let check = Rule::<TypeId>::new().should(be_public()).check();
        let options = CheckOptions {
            apply_exclusions: true,
            exclusions: ExclusionList::new(vec!["App".to_string()]),
        };
        let result = check.run_with(&index, &options);
        // Everything under App is dropped; only System.Guid survives.
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].to_string().contains("'Guid'"));
    }

    #[test]
    fn empty_source_short_circuits_requirements() {
        let index = index();
        let check = Rule::<TypeId>::new()
            .which(Filter::new("are named Quux", |idx: &MetadataIndex, t: TypeId| {
                t.name(idx) == "Quux"
            }))
            .should(Requirement::should_satisfy(
                "always fails",
                |_, _| false,
                |idx, t: TypeId| {
                    CheckError::Violation(ViolationError::new(
                        t.entity_ref(),
                        t.full_name(idx),
                        "unreachable",
                    ))
                },
            ))
            .check();

        let result = check.run(&index);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].is_empty_source());
        assert!(result.errors[0].to_string().contains("are named Quux"));
    }

    #[test]
    fn allow_empty_exempts_the_empty_source_error() {
        let index = index();
        let check = Rule::<TypeId>::new()
            .which(Filter::new("are named Quux", |idx: &MetadataIndex, t: TypeId| {
                t.name(idx) == "Quux"
            }))
            .unless(Exemption::allow_empty())
            .check();

        let result = check.run(&index);
        assert!(!result.is_violated());
    }

    #[test]
    fn check_is_rerunnable_against_different_sources() {
        let index = index();
        let check = Rule::<TypeId>::new().should(be_public()).check();

        let scoped = index.scoped(|a| a.name == "App");
        let first = check.run_with(&scoped, &CheckOptions::without_exclusions());
        let second = check.run_with(&index, &CheckOptions::without_exclusions());

        assert_eq!(first.errors.len(), 1);
        assert_eq!(second.errors.len(), 2);
        // Re-running produces fresh, equal results.
        assert_eq!(first.errors, check
            .run_with(&scoped, &CheckOptions::without_exclusions())
            .errors);
    }

    #[test]
    fn result_carries_the_rule_name() {
        let index = index();
        let check = Rule::<TypeId>::new()
            .named("all types public")
            .should(be_public())
            .check();
        let result = check.run(&index);
        assert_eq!(result.description.as_deref(), Some("all types public"));
    }
}
