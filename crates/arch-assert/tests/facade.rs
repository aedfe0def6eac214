//! Integration tests for the facade crate: fluent rules, bundles, and
//! JSON output through the re-exported surface.

use arch_assert::fluent::{assemblies, types};
use arch_assert::metadata::{Access, MetadataIndex, TypeSpec};
use arch_assert::{AssertNotViolated, Config, Pattern, RuleBundle};

fn index() -> MetadataIndex {
    let mut b = MetadataIndex::builder();
    let domain = b.add_assembly("Shop.Domain");
    b.add_type(domain, TypeSpec::new("Order").in_namespace("Shop.Domain"));
    b.add_type(
        domain,
        TypeSpec::new("OrderState")
            .in_namespace("Shop.Domain")
            .with_access(Access::Internal),
    );
    let web = b.add_assembly("Shop.Web");
    b.add_assembly_reference(web, "Shop.Domain");
    b.add_assembly_reference(web, "Legacy.Auth");
    b.build()
}

#[test]
fn bundle_of_fluent_rules_through_the_facade() {
    let index = index();
    let bundle = RuleBundle::new("shop conventions")
        .with_description("visibility and dependency hygiene")
        .add(
            types()
                .that()
                .should_be_public()
                .named("domain types are public")
                .check(),
        )
        .add(
            assemblies()
                .should_not_depend_on(Pattern::new("Legacy.*").expect("pattern"))
                .named("no legacy dependencies")
                .check(),
        );

    let result = bundle.run_with(&index, &Config::default().check_options());
    assert!(result.is_violated());
    assert_eq!(result.errors().len(), 2);

    let report = result.to_report();
    assert!(report.contains("Bundle \"shop conventions\""));
    assert!(report.contains("visibility and dependency hygiene"));
    assert!(report.contains("'OrderState'"));
    assert!(report.contains("'Legacy.Auth'"));
}

#[test]
fn results_serialize_to_tagged_json() {
    let index = index();
    let result = assemblies()
        .should_not_depend_on(Pattern::new("Legacy.*").expect("pattern"))
        .check()
        .run(&index);

    let json = serde_json::to_value(&result).expect("result should serialize");
    assert_eq!(json["errors"][0]["kind"], "dependency");
    assert_eq!(json["errors"][0]["forbidden"][0], "Legacy.Auth");
}

#[test]
#[should_panic(expected = "no legacy dependencies")]
fn assert_bridge_fails_the_test_with_the_rule_name() {
    let index = index();
    assemblies()
        .should_not_depend_on(Pattern::new("Legacy.*").expect("pattern"))
        .named("no legacy dependencies")
        .check()
        .run(&index)
        .assert_not_violated();
}
