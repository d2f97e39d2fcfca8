//! Integration tests for dependency resolution
//!
//! Resolves parsed components and checks the plan.

use std::path::Path;

use bindery_analysis::{Resolution, ResolutionPlan, analyze_file, resolve};
use bindery_foundation::{Error, ErrorCategory, ErrorKind, TypeRef};
use bindery_syntax::parse_source;

fn plan_for(source: &str) -> Result<ResolutionPlan, Error> {
    let path = Path::new("App.swift");
    let tree = parse_source(source, path)?;
    let file = analyze_file(&tree, path)?;
    resolve(&file.components, "AppContainer")
}

fn resolutions(plan: &ResolutionPlan, builder: &str) -> Vec<Resolution> {
    plan.builders
        .iter()
        .find(|b| b.name == builder)
        .expect("builder")
        .arguments
        .iter()
        .map(|a| a.resolution.clone())
        .collect()
}

#[test]
fn singleton_shared_by_reusable() {
    let plan = plan_for(
        r"
        @Singleton final class Logger { @Inject init() {} }
        @Reusable struct Service { @Inject init(logger: Logger) {} }
        ",
    )
    .expect("plan");
    assert!(plan.externals.is_empty());
    assert_eq!(plan.singletons.len(), 1);
    assert_eq!(plan.singletons[0].name, "logger");
    assert_eq!(
        resolutions(&plan, "buildService"),
        vec![Resolution::Singleton {
            field: "logger".into()
        }]
    );
}

#[test]
fn unknown_type_becomes_external() {
    let plan = plan_for("@Reusable struct Repository { @Inject init(database: Database) {} }")
        .expect("plan");
    assert_eq!(plan.externals.len(), 1);
    assert_eq!(plan.externals[0].name, "database");
    assert_eq!(plan.externals[0].type_ref, TypeRef::parse("Database"));
    assert_eq!(
        resolutions(&plan, "buildRepository"),
        vec![Resolution::External {
            field: "database".into()
        }]
    );
}

#[test]
fn exposed_component_gets_opaque_return_and_forwarded_parameter() {
    let plan = plan_for(
        r"
        @Reusable(exposeAs: CoordinatorProtocol.self)
        final class Coordinator: CoordinatorProtocol {
            @Inject init(@DependencyIgnored title: String) {}
        }
        ",
    )
    .expect("plan");
    let builder = &plan.builders[0];
    assert_eq!(builder.return_type.as_str(), "some CoordinatorProtocol");
    assert_eq!(builder.parameters[0].name, "title");
    assert_eq!(
        resolutions(&plan, "buildCoordinator"),
        vec![Resolution::Parameter {
            name: "title".into()
        }]
    );
}

#[test]
fn unresolvable_dependency_fails() {
    let err = plan_for("@Reusable struct Repository { @Inject init(store: some Store) {} }")
        .expect_err("should fail");
    assert_eq!(err.category(), ErrorCategory::Resolution);
    assert!(err.to_string().contains(
        "cannot resolve dependency of type 'some Store' required by 'Repository'"
    ));
}

#[test]
fn protocol_dependency_resolves_to_exposing_component() {
    let plan = plan_for(
        r"
        @Reusable(exposeAs: Store.self) struct DiskStore: Store { @Inject init() {} }
        @Reusable struct Repository { @Inject init(store: Store) {} }
        ",
    )
    .expect("plan");
    assert!(plan.externals.is_empty());
    assert_eq!(
        resolutions(&plan, "buildRepository"),
        vec![Resolution::Build {
            builder: "buildDiskStore".into()
        }]
    );
}

#[test]
fn type_equality_ignores_whitespace() {
    let plan = plan_for(
        r"
        @Reusable(exposeAs: Cache<String,Int>.self)
        final class MemoryCache: Cache<String, Int> { @Inject init() {} }
        @Reusable struct Feed { @Inject init(cache: Cache< String , Int >) {} }
        ",
    )
    .expect("plan");
    assert!(plan.externals.is_empty());
    assert_eq!(
        resolutions(&plan, "buildFeed"),
        vec![Resolution::Build {
            builder: "buildMemoryCache".into()
        }]
    );
}

#[test]
fn container_can_inject_itself() {
    let plan = plan_for("@Reusable struct Router { @Inject init(container: AppContainer) {} }")
        .expect("plan");
    assert!(plan.externals.is_empty());
    assert_eq!(resolutions(&plan, "buildRouter"), vec![Resolution::SelfReference]);
}

#[test]
fn reusable_cycle_fails_fast() {
    let err = plan_for(
        r"
        @Reusable final class Parent { @Inject init(child: Child) {} }
        @Reusable final class Child { @Inject init(parent: Parent) {} }
        ",
    )
    .expect_err("should fail");
    assert!(matches!(
        err.kind,
        ErrorKind::DependencyCycle { ref path } if path == &["Parent", "Child", "Parent"]
    ));
    assert!(err.suggestion.is_some());
}

#[test]
fn externals_are_shared_by_type() {
    let plan = plan_for(
        r"
        @Reusable struct A { @Inject init(client: HTTPClient, analytics: Analytics) {} }
        @Reusable struct B { @Inject init(http: HTTPClient) {} }
        ",
    )
    .expect("plan");
    let names: Vec<&str> = plan.externals.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["analytics", "hTTPClient"]);
    assert_eq!(
        resolutions(&plan, "buildB"),
        vec![Resolution::External {
            field: "hTTPClient".into()
        }]
    );
}
