//! Integration tests for the parser
//!
//! Parses realistic Swift files and inspects the resulting trees.

use std::path::Path;

use bindery_foundation::{ErrorCategory, ErrorKind};
use bindery_syntax::{Failability, NodeKind, SyntaxTree, TypeKeyword, parse_source};

const FEED: &str = r#"
import Foundation
import Combine

/// Loads the feed.
@Reusable(exposeAs: FeedLoading.self, scope: .public)
public final class FeedLoader: FeedLoading, @unchecked Sendable {
    private let client: HTTPClient
    private(set) var items: [Item] = []
    static let shared = "unused"

    #if DEBUG
    var debugName: String { "loader" }
    #endif

    init(client: HTTPClient) {
        self.client = client
    }

    @Inject
    public convenience init(
        client: HTTPClient,
        cache: [String: [Item]],
        @DependencyIgnored pageSize: Int = 20,
        onUpdate: @escaping ([Item]) -> Void = { _ in }
    ) {
        self.init(client: client)
    }

    func load() async throws -> [Item] {
        let text = "} not a brace { \(items.count)"
        return items.filter { $0.id > 0 }
    }
}

enum Features {
    @Reusable struct Search {
        @Inject init?(index: SearchIndex) {}
    }
}
"#;

fn parse(source: &str) -> SyntaxTree {
    parse_source(source, Path::new("Feed.swift")).expect("parse failed")
}

fn type_names(tree: &SyntaxTree) -> Vec<(TypeKeyword, String)> {
    tree.iter()
        .filter_map(|(_, node)| match &node.kind {
            NodeKind::TypeDecl(decl) => Some((decl.keyword, decl.name.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn realistic_file_structure() {
    let tree = parse(FEED);
    assert!(tree.validate().is_ok());
    assert_eq!(
        type_names(&tree),
        vec![
            (TypeKeyword::Class, "FeedLoader".to_string()),
            (TypeKeyword::Enum, "Features".to_string()),
            (TypeKeyword::Struct, "Search".to_string()),
        ]
    );

    let imports: Vec<String> = tree
        .iter()
        .filter_map(|(_, node)| match &node.kind {
            NodeKind::Import(import) => Some(import.text()),
            _ => None,
        })
        .collect();
    assert_eq!(imports, vec!["Foundation", "Combine"]);
}

#[test]
fn class_header_and_attributes() {
    let tree = parse(FEED);
    let (id, decl) = tree
        .iter()
        .find_map(|(id, node)| match &node.kind {
            NodeKind::TypeDecl(decl) if decl.name == "FeedLoader" => Some((id, decl)),
            _ => None,
        })
        .expect("FeedLoader");
    assert!(decl.modifiers.contains(&"final".to_string()));
    assert_eq!(decl.inheritance[0], "FeedLoading");

    let attributes: Vec<_> = tree.attributes(id).map(|(_, a)| a).collect();
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0].name, "Reusable");
    assert_eq!(attributes[0].arguments.len(), 2);
    assert_eq!(attributes[0].arguments[0].label.as_deref(), Some("exposeAs"));
}

#[test]
fn initializers_and_parameters() {
    let tree = parse(FEED);
    let initializers: Vec<_> = tree
        .iter()
        .filter_map(|(id, node)| match &node.kind {
            NodeKind::Initializer(init) => Some((id, init)),
            _ => None,
        })
        .collect();
    assert_eq!(initializers.len(), 3);

    let (inject_id, inject) = initializers[1];
    assert!(tree.attributes(inject_id).any(|(_, a)| a.name == "Inject"));
    assert_eq!(inject.parameters.len(), 4);
    assert_eq!(inject.parameters[1].type_text, "[String: [Item]]");
    assert!(inject.parameters[2].has_attribute("DependencyIgnored"));
    assert_eq!(inject.parameters[2].default_value.as_deref(), Some("20"));
    assert_eq!(inject.parameters[3].type_text, "@escaping ([Item]) -> Void");
    assert_eq!(inject.parameters[3].default_value.as_deref(), Some("{ _ in }"));
    assert_eq!(inject.selector(), "init(client:cache:pageSize:onUpdate:)");

    let (_, search_init) = initializers[2];
    assert_eq!(search_init.failability, Failability::Optional);
}

#[test]
fn unbalanced_braces_are_structural_errors() {
    let err = parse_source("struct A {\n  init() {\n}", Path::new("Broken.swift"))
        .expect_err("should fail");
    assert_eq!(err.category(), ErrorCategory::Structural);
    assert!(matches!(err.kind, ErrorKind::Parse { .. }));
    let location = err.location.expect("location");
    assert_eq!(location.file, Path::new("Broken.swift"));
    assert_eq!(location.line, Some(1));
}

#[test]
fn unterminated_string_is_reported_at_its_start() {
    let err = parse_source("struct A {}\nlet s = \"open", Path::new("S.swift"))
        .expect_err("should fail");
    assert!(err.to_string().starts_with("S.swift:2:9: error:"), "{err}");
}
