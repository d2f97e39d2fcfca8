//! Integration tests for the analysis pipeline
//!
//! Parses several files and checks the aggregated component model.

use std::path::{Path, PathBuf};

use bindery_analysis::{Analysis, ArgumentKind, Lifecycle, Scope, analyze};
use bindery_foundation::{ErrorCategory, ErrorKind, Result, TypeRef};
use bindery_syntax::{SyntaxTree, parse_source};

fn analyze_sources(files: &[(&str, &str)]) -> Result<Analysis> {
    let trees: Vec<(PathBuf, SyntaxTree)> = files
        .iter()
        .map(|(name, source)| {
            let path = PathBuf::from(name);
            parse_source(source, &path).map(|tree| (path, tree))
        })
        .collect::<Result<_>>()?;
    analyze(trees.iter().map(|(path, tree)| (path.as_path(), tree)))
}

const APP: &[(&str, &str)] = &[
    (
        "Logging/Logger.swift",
        r"
        import os

        @Singleton
        public final class Logger {
            @Inject init() {}
        }
        ",
    ),
    (
        "Feed/FeedLoader.swift",
        r#"
        import Foundation
        import Combine

        protocol FeedLoading {}

        @Reusable(exposeAs: FeedLoading.self, scope: .public)
        final class FeedLoader: FeedLoading {
            @Inject init(
                logger: Logger,
                session: URLSession,
                @DependencyIgnored pageSize: Int = 20
            ) {}
        }
        "#,
    ),
    (
        "Helpers.swift",
        "import UIKit\nstruct Helper {}\nextension String { var trimmed: String { self } }",
    ),
];

#[test]
fn components_follow_file_then_source_order() {
    let analysis = analyze_sources(APP).expect("analysis");
    let names: Vec<&str> = analysis.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Logger", "FeedLoader"]);
}

#[test]
fn imports_come_only_from_files_with_components() {
    let analysis = analyze_sources(APP).expect("analysis");
    assert_eq!(analysis.imports, vec!["Combine", "Foundation", "os"]);
}

#[test]
fn component_model_is_complete() {
    let analysis = analyze_sources(APP).expect("analysis");
    let loader = &analysis.components[1];
    assert_eq!(loader.lifecycle, Lifecycle::Reusable);
    assert_eq!(loader.scope, Scope::Public);
    assert_eq!(loader.exposed_as, TypeRef::parse("FeedLoading"));
    assert_eq!(loader.type_ref, TypeRef::parse("FeedLoader"));
    assert_eq!(loader.location.file, Path::new("Feed/FeedLoader.swift"));

    let kinds: Vec<ArgumentKind> = loader.arguments.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ArgumentKind::Dependency,
            ArgumentKind::Dependency,
            ArgumentKind::Parameter
        ]
    );
    assert_eq!(loader.arguments[2].declaration.default_value.as_deref(), Some("20"));
}

#[test]
fn first_declaration_error_stops_analysis() {
    let err = analyze_sources(&[
        ("Good.swift", "@Reusable struct Good { @Inject init() {} }"),
        ("Cache.swift", "@Singleton struct Cache { @Inject init() {} }"),
        ("Enum.swift", "@Reusable enum Mode {}"),
    ])
    .expect_err("should fail");
    assert_eq!(err.category(), ErrorCategory::Declaration);
    assert!(matches!(err.kind, ErrorKind::ValueTypeSingleton { .. }));
    assert_eq!(err.location.as_ref().and_then(|l| l.line), Some(1));
    assert_eq!(
        err.to_string(),
        "Cache.swift:1:1: error: '@Singleton' cannot be applied to value type 'Cache' \
         (fix: convert 'Cache' to a class or mark it '~Copyable')"
    );
}

#[test]
fn non_copyable_struct_may_be_a_singleton() {
    let analysis = analyze_sources(&[(
        "Token.swift",
        "@Singleton struct Token: ~Copyable { @Inject init() {} }",
    )])
    .expect("analysis");
    assert!(analysis.components[0].is_singleton());
}

#[test]
fn exposure_must_be_declared() {
    let err = analyze_sources(&[(
        "Coordinator.swift",
        "@Reusable(exposeAs: CoordinatorProtocol.self) class Coordinator { @Inject init() {} }",
    )])
    .expect_err("should fail");
    assert_eq!(
        err.suggestion.as_deref(),
        Some("add ': CoordinatorProtocol' to the declaration of 'Coordinator'")
    );
}

#[test]
fn structural_errors_surface_before_analysis() {
    let err = analyze_sources(&[("Broken.swift", "@Reusable struct A { @Inject init(")])
        .expect_err("should fail");
    assert_eq!(err.category(), ErrorCategory::Structural);
}
