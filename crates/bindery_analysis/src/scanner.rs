//! Declaration scanner.
//!
//! Walks a syntax tree depth-first and collects the data-structure
//! declarations (structs, classes, actors) that carry a lifecycle
//! annotation, together with the metadata written in that annotation.
//! Data-structure declarations are not entered: types nested in them are
//! not components. Namespaces formed by enums and extensions are entered
//! and qualify the names found inside them.

use std::path::Path;

use bindery_foundation::{Error, ErrorKind, Result, SourceLocation, TypeRef};
use bindery_syntax::{Attribute, ImportDecl, NodeId, NodeKind, SyntaxTree, TypeDecl};
use tracing::debug;

use crate::model::{Lifecycle, Scope};

/// Annotation argument naming the exposure type.
const EXPOSE_AS: &str = "exposeAs";
/// Annotation argument naming the builder scope.
const SCOPE: &str = "scope";

/// Metadata extracted from a lifecycle annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationMetadata {
    /// `Reusable` or `Singleton`.
    pub lifecycle: Lifecycle,
    /// The `exposeAs:` type, if given.
    pub exposed_as: Option<TypeRef>,
    /// The `scope:` value, `Internal` when omitted.
    pub scope: Scope,
    /// Location of the annotated declaration.
    pub location: SourceLocation,
}

/// An annotated declaration found by [`scan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedDeclaration {
    /// What the annotation says.
    pub metadata: AnnotationMetadata,
    /// The `TypeDecl` node.
    pub node: NodeId,
    /// Declared name qualified by enclosing namespaces.
    pub qualified_name: String,
}

/// Finds every annotated data-structure declaration in `tree`, in source order.
///
/// # Errors
/// Returns a declaration error for a lifecycle annotation on an enum,
/// protocol or extension, for more than one lifecycle annotation on a
/// declaration, and for unrecognised annotation arguments.
pub fn scan(tree: &SyntaxTree, path: &Path) -> Result<Vec<ScannedDeclaration>> {
    let mut found = Vec::new();
    visit(tree, tree.root(), path, &mut Vec::new(), &mut found)?;
    debug!(file = %path.display(), count = found.len(), "scanned annotated declarations");
    Ok(found)
}

fn visit(
    tree: &SyntaxTree,
    node: NodeId,
    path: &Path,
    namespace: &mut Vec<String>,
    found: &mut Vec<ScannedDeclaration>,
) -> Result<()> {
    let NodeKind::TypeDecl(decl) = tree.kind(node) else {
        for child in tree.children(node) {
            visit(tree, child, path, namespace, found)?;
        }
        return Ok(());
    };

    let location = tree.node(node).span.located_in(path);
    let metadata = annotation_metadata(tree, node, decl, location)?;

    if decl.keyword.is_data_structure() {
        if let Some(metadata) = metadata {
            let qualified_name = qualify(namespace, &decl.name);
            debug!(
                name = %qualified_name,
                lifecycle = metadata.lifecycle.annotation(),
                "found annotated declaration"
            );
            found.push(ScannedDeclaration {
                metadata,
                node,
                qualified_name,
            });
        }
        return Ok(());
    }

    if let Some(metadata) = metadata {
        let kind = decl.keyword.as_str();
        return Err(Error::new(ErrorKind::DisallowedDeclarationKind {
            annotation: metadata.lifecycle.annotation().to_string(),
            kind: kind.to_string(),
            type_name: decl.name.clone(),
        })
        .at(metadata.location)
        .with_suggestion(format!(
            "change '{kind} {}' to a class, struct or actor",
            decl.name
        )));
    }

    namespace.push(decl.name.clone());
    let result = tree
        .children(node)
        .try_for_each(|child| visit(tree, child, path, namespace, found));
    namespace.pop();
    result
}

fn qualify(namespace: &[String], name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{name}", namespace.join("."))
    }
}

/// Reads the lifecycle annotation of a declaration, if it has one.
fn annotation_metadata(
    tree: &SyntaxTree,
    node: NodeId,
    decl: &TypeDecl,
    location: SourceLocation,
) -> Result<Option<AnnotationMetadata>> {
    let mut annotations = tree
        .attributes(node)
        .filter_map(|(_, attribute)| {
            Lifecycle::from_annotation(&attribute.name).map(|lifecycle| (lifecycle, attribute))
        });

    let Some((lifecycle, attribute)) = annotations.next() else {
        return Ok(None);
    };
    if annotations.next().is_some() {
        return Err(Error::new(ErrorKind::MultipleLifecycleAnnotations {
            type_name: decl.name.clone(),
        })
        .at(location));
    }

    let (exposed_as, scope) = annotation_arguments(attribute).map_err(|e| e.at(location.clone()))?;
    Ok(Some(AnnotationMetadata {
        lifecycle,
        exposed_as,
        scope,
        location,
    }))
}

/// Parses `exposeAs:` and `scope:`; anything else is rejected.
fn annotation_arguments(attribute: &Attribute) -> Result<(Option<TypeRef>, Scope)> {
    let invalid = |message: String| {
        Error::new(ErrorKind::InvalidAnnotationArgument {
            annotation: attribute.name.clone(),
            message,
        })
    };

    let mut exposed_as = None;
    let mut scope = None;
    for argument in &attribute.arguments {
        match argument.label.as_deref() {
            Some(EXPOSE_AS) => {
                if exposed_as.is_some() {
                    return Err(invalid(format!("'{EXPOSE_AS}' given more than once")));
                }
                let text = argument.value.trim();
                let text = text.strip_suffix(".self").unwrap_or(text).trim();
                if text.is_empty() {
                    return Err(invalid(format!("'{EXPOSE_AS}' needs a type")));
                }
                exposed_as = Some(TypeRef::parse(text));
            }
            Some(SCOPE) => {
                if scope.is_some() {
                    return Err(invalid(format!("'{SCOPE}' given more than once")));
                }
                scope = Some(match argument.value.trim().trim_start_matches('.') {
                    "public" => Scope::Public,
                    "internal" => Scope::Internal,
                    other => {
                        return Err(invalid(format!(
                            "'{SCOPE}' must be 'public' or 'internal', not '{other}'"
                        )));
                    }
                });
            }
            Some(other) => {
                return Err(invalid(format!(
                    "unknown argument '{other}'; expected '{EXPOSE_AS}' or '{SCOPE}'"
                )));
            }
            None => {
                return Err(invalid(format!(
                    "unlabeled argument '{}'; expected '{EXPOSE_AS}' or '{SCOPE}'",
                    argument.value
                )));
            }
        }
    }
    Ok((exposed_as, scope.unwrap_or_default()))
}

/// Returns the import paths of a file, deduplicated case-insensitively in
/// source order.
#[must_use]
pub fn scan_imports(tree: &SyntaxTree) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tree.iter()
        .filter_map(|(_, node)| match &node.kind {
            NodeKind::Import(import) => Some(ImportDecl::text(import)),
            _ => None,
        })
        .filter(|text| seen.insert(text.to_lowercase()))
        .collect()
}
