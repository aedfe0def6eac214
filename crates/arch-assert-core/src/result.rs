//! Check results, bundles, and report rendering.

use miette::Diagnostic;
use serde::Serialize;
use tracing::info;

use crate::config::CheckOptions;
use crate::entity::Entity;
use crate::error::CheckError;
use crate::metadata::MetadataSource;
use crate::rule::Check;

/// The outcome of one check run: the surviving errors plus the rule
/// description, if any.
#[derive(Debug, Default, Serialize)]
pub struct TestResult {
    /// Errors that survived exemption.
    pub errors: Vec<CheckError>,
    /// The rule name, carried from the check.
    pub description: Option<String>,
}

impl TestResult {
    /// Creates a result from an error list.
    #[must_use]
    pub fn new(errors: Vec<CheckError>) -> Self {
        Self {
            errors,
            description: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the rule is violated (any error survived).
    #[must_use]
    pub fn is_violated(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of surviving errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Appends the errors of another result into this one.
    pub fn extend(&mut self, other: TestResult) {
        self.errors.extend(other.errors);
    }

    /// Renders the result under an explicit rule name.
    ///
    /// A passing result renders as a single line; a failing result lists
    /// every error with multi-line messages indented under their bullet.
    #[must_use]
    pub fn to_report(&self, rule_name: &str) -> String {
        if !self.is_violated() {
            return format!("\"{rule_name}\" is not violated");
        }
        let mut report = format!("\"{rule_name}\" is violated");
        for error in &self.errors {
            let message = error.to_string().replace('\n', "\n   ");
            report.push_str("\n - ");
            report.push_str(&message);
        }
        report
    }

    /// Renders the result under its own description, falling back to a
    /// generic name.
    #[must_use]
    pub fn report(&self) -> String {
        self.to_report(self.description.as_deref().unwrap_or("architecture rule"))
    }
}

/// One check inside a bundle, type-erased over its entity kind.
struct BundleMember {
    name: String,
    run: Box<dyn Fn(&dyn MetadataSource, &CheckOptions) -> TestResult>,
}

impl std::fmt::Debug for BundleMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleMember")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A named collection of checks evaluated together.
///
/// Checks over different entity kinds can live in one bundle; each keeps
/// its own identity in the combined report.
#[derive(Debug)]
pub struct RuleBundle {
    name: String,
    description: Option<String>,
    checks: Vec<BundleMember>,
}

impl RuleBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            checks: Vec::new(),
        }
    }

    /// Attaches a description rendered in the bundle report header.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a check to the bundle. The check's own name is kept; unnamed
    /// checks are numbered by position.
    #[must_use]
    pub fn add<E: Entity + 'static>(mut self, check: Check<E>) -> Self {
        let name = check
            .name()
            .map_or_else(|| format!("rule #{}", self.checks.len() + 1), String::from);
        self.checks.push(BundleMember {
            name,
            run: Box::new(move |source, options| check.run_with(source, options)),
        });
        self
    }

    /// The bundle name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs every check with default options.
    #[must_use]
    pub fn run(&self, source: &dyn MetadataSource) -> BundleResult {
        self.run_with(source, &CheckOptions::default())
    }

    /// Runs every check with explicit options.
    #[must_use]
    pub fn run_with(&self, source: &dyn MetadataSource, options: &CheckOptions) -> BundleResult {
        info!(bundle = %self.name, checks = self.checks.len(), "running bundle");
        let results = self
            .checks
            .iter()
            .map(|member| {
                let mut result = (member.run)(source, options);
                if result.description.is_none() {
                    result.description = Some(member.name.clone());
                }
                result
            })
            .collect();
        BundleResult {
            name: self.name.clone(),
            description: self.description.clone(),
            results,
        }
    }
}

/// The combined outcome of a bundle run.
#[derive(Debug, Serialize)]
pub struct BundleResult {
    /// The bundle name.
    pub name: String,
    /// The bundle description, if one was set.
    pub description: Option<String>,
    /// Per-check results, in bundle order.
    pub results: Vec<TestResult>,
}

impl BundleResult {
    /// Whether any member check is violated.
    #[must_use]
    pub fn is_violated(&self) -> bool {
        self.results.iter().any(TestResult::is_violated)
    }

    /// All errors across the bundle, in bundle order.
    #[must_use]
    pub fn errors(&self) -> Vec<&CheckError> {
        self.results.iter().flat_map(|r| r.errors.iter()).collect()
    }

    /// Renders the bundle report: a header line followed by each member
    /// result's report.
    #[must_use]
    pub fn to_report(&self) -> String {
        let total: usize = self.results.iter().map(TestResult::error_count).sum();
        let summary = self
            .description
            .clone()
            .unwrap_or_else(|| format!("{total} error(s)"));
        let mut report = format!("Bundle \"{}\": {summary}", self.name);
        for result in &self.results {
            report.push('\n');
            report.push_str(&result.report());
        }
        report
    }
}

/// Adapts a violated result into a rich diagnostic for terminal display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationReport {
    message: String,
    #[help]
    help: Option<String>,
}

impl From<&TestResult> for ViolationReport {
    fn from(result: &TestResult) -> Self {
        Self {
            message: result.report(),
            help: result
                .is_violated()
                .then(|| format!("{} architecture error(s) found", result.error_count())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityRef};
    use crate::error::ViolationError;
    use crate::filter::Filter;
    use crate::metadata::{Access, MetadataIndex, TypeId, TypeSpec};
    use crate::requirement::Requirement;
    use crate::rule::Rule;

    fn violation(name: &str) -> CheckError {
        CheckError::Violation(ViolationError::new(
            EntityRef::Type(TypeId(0)),
            name,
            format!("Type '{name}' should be public"),
        ))
    }

    #[test]
    fn passing_result_renders_single_line() {
        let result = TestResult::new(vec![]);
        insta::assert_snapshot!(
            result.to_report("all types public"),
            @r#""all types public" is not violated"#
        );
    }

    #[test]
    fn failing_result_lists_every_error() {
        let result = TestResult::new(vec![violation("Bar"), violation("Baz")]);
        insta::assert_snapshot!(result.to_report("all types public"), @r#"
        "all types public" is violated
         - Type 'Bar' should be public
         - Type 'Baz' should be public
        "#);
    }

    #[test]
    fn multi_line_messages_indent_under_their_bullet() {
        let result = TestResult::new(vec![CheckError::Violation(ViolationError::new(
            EntityRef::Type(TypeId(0)),
            "Bar",
            "Type 'Bar' should be public\ndeclared in assembly 'App'",
        ))]);
        insta::assert_snapshot!(result.to_report("visibility"), @r#"
        "visibility" is violated
         - Type 'Bar' should be public
           declared in assembly 'App'
        "#);
    }

    #[test]
    fn report_falls_back_to_generic_name() {
        let result = TestResult::new(vec![]);
        assert_eq!(result.report(), "\"architecture rule\" is not violated");
    }

    fn index() -> MetadataIndex {
        let mut b = MetadataIndex::builder();
        let asm = b.add_assembly("App");
        b.add_type(asm, TypeSpec::new("Foo"));
        b.add_type(asm, TypeSpec::new("Bar").with_access(Access::Internal));
        b.build()
    }

    fn be_public_check(name: &str) -> crate::rule::Check<TypeId> {
        Rule::<TypeId>::new()
            .named(name)
            .should(Requirement::should_satisfy(
                "should be public",
                |idx, t: TypeId| t.access(idx) == Some(Access::Public),
                |idx, t: TypeId| {
                    CheckError::Violation(ViolationError::new(
                        t.entity_ref(),
                        t.full_name(idx),
                        format!("Type '{}' should be public", t.name(idx)),
                    ))
                },
            ))
            .check()
    }

    #[test]
    fn bundle_keeps_member_identity() {
        let index = index();
        let bundle = RuleBundle::new("conventions")
            .add(be_public_check("types are public"))
            .add(
                Rule::<TypeId>::new()
                    .named("no type named Quux")
                    .which(Filter::new("are named Quux", |idx: &MetadataIndex, t: TypeId| {
                        t.name(idx) == "Quux"
                    }))
                    .unless(crate::exemption::Exemption::allow_empty())
                    .check(),
            );

        let result = bundle.run(&index);
        assert!(result.is_violated());
        assert_eq!(result.results.len(), 2);
        assert_eq!(result.errors().len(), 1);
        insta::assert_snapshot!(result.to_report(), @r#"
        Bundle "conventions": 1 error(s)
        "types are public" is violated
         - Type 'Bar' should be public
        "no type named Quux" is not violated
        "#);
    }

    #[test]
    fn unnamed_bundle_members_are_numbered() {
        let index = index();
        let unnamed = Rule::<TypeId>::new()
            .should(Requirement::should_satisfy(
                "trivially passes",
                |_, _| true,
                |idx, t: TypeId| {
                    CheckError::Violation(ViolationError::new(t.entity_ref(), t.full_name(idx), "x"))
                },
            ))
            .check();
        let result = RuleBundle::new("misc").add(unnamed).run(&index);
        assert_eq!(result.results[0].description.as_deref(), Some("rule #1"));
    }

    #[test]
    fn violation_report_carries_error_count_help() {
        let result = TestResult::new(vec![violation("Bar")]).with_description("visibility");
        let report = ViolationReport::from(&result);
        assert!(report.to_string().contains("is violated"));
        assert!(format!("{report:?}").contains("1 architecture error(s) found"));

        let passing = ViolationReport::from(&TestResult::new(vec![]));
        assert!(passing.help.is_none());
    }
}
