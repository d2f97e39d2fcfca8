//! End-to-end tests for the generate command

use std::fs;
use std::path::PathBuf;

use bindery_cli::{Cli, Outcome, run};
use bindery_foundation::{ErrorCategory, ErrorKind};
use clap::Parser;
use tempfile::TempDir;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    fn file(&self, name: &str, source: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dir");
        }
        fs::write(&path, source).expect("write source");
        path
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join("Generated/AppContainer.swift")
    }

    fn cli(&self, files: &[PathBuf], extra: &[&str]) -> Cli {
        let mut args: Vec<String> = vec![
            "bindery".into(),
            "generate".into(),
            "--target-name".into(),
            "App".into(),
            "--output".into(),
            self.output().display().to_string(),
            "--source-files".into(),
        ];
        args.extend(files.iter().map(|f| f.display().to_string()));
        args.extend(extra.iter().map(|s| (*s).to_string()));
        Cli::try_parse_from(args).expect("arguments should parse")
    }
}

#[test]
fn generates_container_file() {
    let project = Project::new();
    let logger = project.file(
        "Sources/Logger.swift",
        "import os\n@Singleton final class Logger { @Inject init() {} }",
    );
    let service = project.file(
        "Sources/Service.swift",
        "@Reusable struct Service { @Inject init(logger: Logger, api: APIClient) {} }",
    );

    let outcome = run(&project.cli(&[logger, service], &[])).expect("run");
    assert_eq!(outcome, Outcome::Written);

    let text = fs::read_to_string(project.output()).expect("output");
    assert!(text.contains("import Foundation\nimport os\n"));
    assert!(text.contains("public final class AppContainer {"));
    assert!(text.contains("public init(aPIClient: APIClient) {"));
    assert!(text.contains("Service(logger: logger, api: aPIClient)"));
}

#[test]
fn unsynchronized_flag_changes_storage() {
    let project = Project::new();
    let logger = project.file("Logger.swift", "@Singleton final class Logger { @Inject init() {} }");

    run(&project.cli(&[logger], &["--unsynchronized-singletons"])).expect("run");
    let text = fs::read_to_string(project.output()).expect("output");
    assert!(text.contains("private lazy var logger: Logger = buildLogger()"));
    assert!(!text.contains("NSRecursiveLock"));
}

#[test]
fn failure_leaves_previous_output_untouched() {
    let project = Project::new();
    let good = project.file("Good.swift", "@Reusable struct Good { @Inject init() {} }");
    run(&project.cli(&[good.clone()], &[])).expect("first run");
    let before = fs::read_to_string(project.output()).expect("output");

    let bad = project.file("Bad.swift", "@Reusable struct Bad { @Inject init(store: some Store) {} }");
    let err = run(&project.cli(&[good, bad], &[])).expect_err("should fail");
    assert_eq!(err.category(), ErrorCategory::Resolution);
    assert_eq!(fs::read_to_string(project.output()).expect("output"), before);
}

#[test]
fn failure_writes_nothing() {
    let project = Project::new();
    let bad = project.file("Bad.swift", "@Singleton struct Cache { @Inject init() {} }");
    let err = run(&project.cli(&[bad], &[])).expect_err("should fail");
    assert!(matches!(err.kind, ErrorKind::ValueTypeSingleton { .. }));
    assert!(!project.output().exists());
}

#[test]
fn unreadable_source_is_reported_with_path() {
    let project = Project::new();
    let missing = project.dir.path().join("Missing.swift");
    let err = run(&project.cli(&[missing], &[])).expect_err("should fail");
    assert!(matches!(err.kind, ErrorKind::FileUnreadable { .. }));
    assert!(err.to_string().contains("Missing.swift"));
    assert!(!err.to_string().contains('\n'));
}

#[test]
fn rerun_with_same_input_leaves_file_alone() {
    let project = Project::new();
    let a = project.file("A.swift", "@Reusable struct A { @Inject init() {} }");
    assert_eq!(run(&project.cli(&[a.clone()], &[])).expect("run"), Outcome::Written);
    assert_eq!(run(&project.cli(&[a], &[])).expect("run"), Outcome::Unchanged);
}
