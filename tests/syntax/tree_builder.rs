//! Integration tests for hand-built trees
//!
//! Any producer can hand the analysis a tree built with `TreeBuilder`;
//! these tests build one without the parser and run it through analysis.

use std::path::Path;

use bindery_analysis::{Lifecycle, analyze_file};
use bindery_foundation::{ErrorKind, Span};
use bindery_syntax::{
    Attribute, AttributeArgument, Failability, InitializerDecl, NodeId, NodeKind, Parameter,
    SyntaxTree, TreeBuilder, TypeDecl, TypeKeyword,
};

fn span(line: u32) -> Span {
    Span::new(0, 0, line, 1)
}

fn attribute(name: &str, arguments: Vec<AttributeArgument>) -> NodeKind {
    NodeKind::Attribute(Attribute {
        name: name.into(),
        arguments,
    })
}

fn type_decl(keyword: TypeKeyword, name: &str) -> NodeKind {
    NodeKind::TypeDecl(TypeDecl {
        keyword,
        name: name.into(),
        modifiers: vec![],
        generic_parameters: vec![],
        inheritance: vec![],
        where_requirements: vec![],
    })
}

fn parameter(label: &str, type_text: &str, attributes: &[&str]) -> Parameter {
    Parameter {
        label: label.into(),
        name: None,
        type_text: type_text.into(),
        default_value: None,
        attributes: attributes.iter().map(|a| (*a).to_string()).collect(),
        span: Span::default(),
    }
}

fn initializer(parameters: Vec<Parameter>) -> NodeKind {
    NodeKind::Initializer(InitializerDecl {
        modifiers: vec![],
        failability: Failability::None,
        is_async: false,
        is_throwing: false,
        parameters,
    })
}

/// `@Singleton class Logger { @Inject init() }` and
/// `@Reusable struct Service { @Inject init(logger: Logger, @DependencyIgnored id: Int) }`
fn service_tree() -> SyntaxTree {
    let mut builder = TreeBuilder::new();

    let logger = builder.push(NodeId::ROOT, type_decl(TypeKeyword::Class, "Logger"), span(1));
    builder.push(logger, attribute("Singleton", vec![]), span(1));
    let init = builder.push(logger, initializer(vec![]), span(2));
    builder.push(init, attribute("Inject", vec![]), span(2));

    let service = builder.push(NodeId::ROOT, type_decl(TypeKeyword::Struct, "Service"), span(4));
    builder.push(
        service,
        attribute(
            "Reusable",
            vec![AttributeArgument {
                label: Some("scope".into()),
                value: ".public".into(),
            }],
        ),
        span(4),
    );
    let init = builder.push(
        service,
        initializer(vec![
            parameter("logger", "Logger", &[]),
            parameter("id", "Int", &["DependencyIgnored"]),
        ]),
        span(5),
    );
    builder.push(init, attribute("Inject", vec![]), span(5));

    builder.finish()
}

#[test]
fn built_tree_is_valid() {
    let tree = service_tree();
    assert!(tree.validate().is_ok());
    assert_eq!(tree.children(tree.root()).count(), 2);
}

#[test]
fn built_tree_analyzes_like_parsed_source() {
    let tree = service_tree();
    let file = analyze_file(&tree, Path::new("Built.swift")).expect("analysis");
    assert_eq!(file.components.len(), 2);

    let logger = &file.components[0];
    assert_eq!(logger.lifecycle, Lifecycle::Singleton);

    let service = &file.components[1];
    assert!(service.is_public());
    assert_eq!(service.dependencies().count(), 1);
    assert_eq!(service.parameters().count(), 1);
    assert_eq!(service.location.line, Some(4));
}

#[test]
fn attribute_after_other_children_is_not_an_annotation() {
    let mut builder = TreeBuilder::new();
    let decl = builder.push(NodeId::ROOT, type_decl(TypeKeyword::Struct, "Late"), span(1));
    let init = builder.push(decl, initializer(vec![]), span(2));
    builder.push(init, attribute("Inject", vec![]), span(2));
    builder.push(decl, attribute("Reusable", vec![]), span(3));
    let tree = builder.finish();

    let file = analyze_file(&tree, Path::new("Late.swift")).expect("analysis");
    assert!(file.components.is_empty());
}

#[test]
fn annotated_protocol_is_rejected() {
    let mut builder = TreeBuilder::new();
    let decl = builder.push(NodeId::ROOT, type_decl(TypeKeyword::Protocol, "Store"), span(1));
    builder.push(decl, attribute("Singleton", vec![]), span(1));
    let tree = builder.finish();

    let err = analyze_file(&tree, Path::new("Store.swift")).expect_err("should fail");
    assert!(matches!(
        err.kind,
        ErrorKind::DisallowedDeclarationKind { ref kind, .. } if kind == "protocol"
    ));
}
