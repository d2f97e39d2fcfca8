//! End-to-end generation scenarios
//!
//! Source text in, container text out.

use std::path::{Path, PathBuf};

use bindery_analysis::{Analysis, analyze};
use bindery_codegen::{GeneratorConfig, HEADER, generate, generate_with_config};
use bindery_foundation::{ErrorCategory, ErrorKind, Result};
use bindery_syntax::{SyntaxTree, parse_source};

fn analysis_of(files: &[(&str, &str)]) -> Result<Analysis> {
    let trees: Vec<(PathBuf, SyntaxTree)> = files
        .iter()
        .map(|(name, source)| {
            let path = PathBuf::from(name);
            parse_source(source, &path).map(|tree| (path, tree))
        })
        .collect::<Result<_>>()?;
    analyze(trees.iter().map(|(p, t)| (p.as_path(), t)))
}

fn generate_files(files: &[(&str, &str)]) -> Result<String> {
    generate(&analysis_of(files)?, "AppContainer")
}

#[test]
fn header_and_container_shape() {
    let text = generate_files(&[("A.swift", "@Reusable struct A { @Inject init() {} }")])
        .expect("generate");
    assert!(text.starts_with(HEADER));
    assert!(text.contains("public final class AppContainer {"));
    assert!(text.ends_with("}\n"));
    assert!(!text.contains("\n\n\n"));
}

#[test]
fn singleton_builder_is_called_once() {
    let text = generate_files(&[
        ("Logger.swift", "@Singleton final class Logger { @Inject init() {} }"),
        (
            "Users.swift",
            r"
            @Reusable struct Profile { @Inject init(logger: Logger) {} }
            @Reusable struct Settings { @Inject init(logger: Logger, profile: Profile) {} }
            ",
        ),
    ])
    .expect("generate");
    assert_eq!(text.matches("buildLogger()").count(), 2);
    assert!(text.contains("Settings(logger: logger, profile: buildProfile())"));
}

#[test]
fn external_dependencies_form_the_initializer() {
    let text = generate_files(&[(
        "Repo.swift",
        r"
        @Reusable struct Repository { @Inject init(database: Database, session: URLSession) {} }
        @Reusable struct Sync { @Inject init(db: Database) {} }
        ",
    )])
    .expect("generate");
    assert!(text.contains("    public init(database: Database, uRLSession: URLSession) {\n"));
    assert!(text.contains("Repository(database: database, session: uRLSession)"));
    assert!(text.contains("Sync(db: database)"));
}

#[test]
fn public_builder_with_abstract_return() {
    let text = generate_files(&[(
        "Coordinator.swift",
        r#"
        @Reusable(exposeAs: CoordinatorProtocol.self, scope: .public)
        final class Coordinator: CoordinatorProtocol {
            @Inject init(logger: Logger, @DependencyIgnored title: String = "Home") {}
        }
        "#,
    )])
    .expect("generate");
    assert!(text.contains(
        "    public func buildCoordinator(title: String = \"Home\") -> some CoordinatorProtocol {\n\
         \x20       Coordinator(logger: logger, title: title)\n\
         \x20   }\n"
    ));
}

#[test]
fn nothing_is_generated_on_failure() {
    let err = generate_files(&[
        ("Good.swift", "@Reusable struct Good { @Inject init() {} }"),
        ("Bad.swift", "@Reusable struct Bad { @Inject init(value: Self) {} }"),
    ])
    .expect_err("should fail");
    assert_eq!(err.category(), ErrorCategory::Resolution);
    assert!(matches!(err.kind, ErrorKind::UnresolvedDependency { .. }));
    assert!(err.location.as_ref().is_some_and(|l| l.file == Path::new("Bad.swift")));
}

#[test]
fn lazy_storage_has_no_foundation_import() {
    let analysis = analysis_of(&[(
        "Logger.swift",
        "@Singleton final class Logger { @Inject init() {} }",
    )])
    .expect("analysis");
    let locked = generate(&analysis, "AppContainer").expect("generate");
    let lazy = generate_with_config(&analysis, "AppContainer", &GeneratorConfig::unsynchronized())
        .expect("generate");
    assert!(locked.contains("import Foundation\n"));
    assert!(locked.contains("private let lock = NSRecursiveLock()"));
    assert!(!lazy.contains("import Foundation"));
    assert!(lazy.contains("private lazy var logger: Logger = buildLogger()"));
}

#[test]
fn namespaced_component_uses_qualified_constructor() {
    let text = generate_files(&[(
        "Features.swift",
        "enum Features { @Reusable struct Search { @Inject init() {} } }",
    )])
    .expect("generate");
    assert!(text.contains("func buildSearch() -> Features.Search {\n        Features.Search()\n"));
}
