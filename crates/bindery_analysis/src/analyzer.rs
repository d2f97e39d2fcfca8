//! Turns scanned declarations into components and aggregates them across
//! files into one [`Analysis`].

use std::path::Path;

use bindery_foundation::{Error, ErrorKind, Result, SourceLocation, TypeRef};
use bindery_syntax::{Failability, NodeKind, SyntaxTree, TypeDecl};
use tracing::debug;

use crate::classifier::{classify, injectable_initializer};
use crate::model::{Analysis, Component, Lifecycle, TypeParameter};
use crate::scanner::{ScannedDeclaration, scan, scan_imports};

/// Marker that opts a value type out of copy semantics.
const NON_COPYABLE: &str = "~Copyable";

/// Components and imports of one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileAnalysis {
    /// Components in source order.
    pub components: Vec<Component>,
    /// Imports of the file; empty when it declares no component.
    pub imports: Vec<String>,
}

/// Analyzes every file and aggregates the result.
///
/// Components keep file order, then source order within a file.
///
/// # Errors
/// Returns the first structural or declaration error encountered.
pub fn analyze<'a, I>(files: I) -> Result<Analysis>
where
    I: IntoIterator<Item = (&'a Path, &'a SyntaxTree)>,
{
    let mut components = Vec::new();
    let mut imports = Vec::new();
    for (path, tree) in files {
        let file = analyze_file(tree, path)?;
        components.extend(file.components);
        imports.extend(file.imports);
    }
    let analysis = Analysis::new(components, imports);
    debug!(
        components = analysis.components.len(),
        imports = analysis.imports.len(),
        "aggregated analysis"
    );
    Ok(analysis)
}

/// Analyzes one file.
///
/// # Errors
/// Returns `MalformedTree` for an inconsistent tree and declaration errors
/// for invalid annotated declarations.
pub fn analyze_file(tree: &SyntaxTree, path: &Path) -> Result<FileAnalysis> {
    tree.validate().map_err(|message| {
        Error::new(ErrorKind::MalformedTree { message }).at(SourceLocation::file(path))
    })?;

    let components = scan(tree, path)?
        .iter()
        .map(|scanned| build_component(tree, scanned))
        .collect::<Result<Vec<_>>>()?;

    let imports = if components.is_empty() {
        Vec::new()
    } else {
        scan_imports(tree)
    };

    debug!(
        file = %path.display(),
        components = components.len(),
        imports = imports.len(),
        "analyzed file"
    );
    Ok(FileAnalysis {
        components,
        imports,
    })
}

/// Validates an annotated declaration and assembles its component.
fn build_component(tree: &SyntaxTree, scanned: &ScannedDeclaration) -> Result<Component> {
    let metadata = &scanned.metadata;
    let location = &metadata.location;
    let NodeKind::TypeDecl(decl) = tree.kind(scanned.node) else {
        return Err(Error::new(ErrorKind::MalformedTree {
            message: "annotated node is not a type declaration".into(),
        })
        .at(location.clone()));
    };
    let is_singleton = metadata.lifecycle == Lifecycle::Singleton;

    if is_singleton && decl.keyword.is_value_type() && !inherits(decl, &TypeRef::parse(NON_COPYABLE)) {
        return Err(Error::new(ErrorKind::ValueTypeSingleton {
            type_name: decl.name.clone(),
        })
        .at(location.clone())
        .with_suggestion(format!(
            "convert '{}' to a class or mark it '{NON_COPYABLE}'",
            decl.name
        )));
    }

    if is_singleton && !decl.generic_parameters.is_empty() {
        return Err(Error::new(ErrorKind::GenericSingleton {
            type_name: decl.name.clone(),
        })
        .at(location.clone()));
    }

    if let Some(exposed) = &metadata.exposed_as {
        if *exposed != TypeRef::parse(&decl.name) && !inherits(decl, exposed) {
            return Err(Error::new(ErrorKind::NonConformingExposure {
                type_name: decl.name.clone(),
                exposed_as: exposed.to_string(),
            })
            .at(location.clone())
            .with_suggestion(format!(
                "add ': {exposed}' to the declaration of '{}'",
                decl.name
            )));
        }
    }

    let (_, initializer) = injectable_initializer(tree, scanned.node, &decl.name, location)?;
    let unsupported = |reason: &str| {
        Error::new(ErrorKind::UnsupportedInitializer {
            type_name: decl.name.clone(),
            reason: reason.to_string(),
        })
        .at(location.clone())
    };
    if initializer.is_async {
        return Err(unsupported("asynchronous initializers cannot be called from a builder"));
    }
    if initializer.is_throwing {
        return Err(unsupported("throwing initializers cannot be called from a builder"));
    }

    let arguments = classify(initializer);
    if is_singleton {
        let required = arguments
            .iter()
            .find(|a| !a.is_dependency() && a.declaration.default_value.is_none());
        if let Some(parameter) = required {
            return Err(Error::new(ErrorKind::SingletonWithParameters {
                type_name: decl.name.clone(),
                parameter: parameter.declaration.name.clone(),
            })
            .at(location.clone()));
        }
    }

    // `init?` and `init!` both produce an `Optional`.
    let failable = initializer.failability != Failability::None;
    let mut type_ref = concrete_type(&scanned.qualified_name, decl);
    if failable {
        type_ref = type_ref.optional();
    }
    let exposed_as = match &metadata.exposed_as {
        Some(exposed) if failable => exposed.optional(),
        Some(exposed) => exposed.clone(),
        None => type_ref.clone(),
    };

    let component = Component {
        name: scanned.qualified_name.clone(),
        type_ref,
        exposed_as,
        arguments,
        scope: metadata.scope,
        lifecycle: metadata.lifecycle,
        generic_parameters: decl
            .generic_parameters
            .iter()
            .map(|p| TypeParameter {
                name: p.name.clone(),
                constraint: p.constraint.clone(),
            })
            .collect(),
        where_requirements: decl.where_requirements.clone(),
        location: location.clone(),
    };

    debug!(
        component = %component.name,
        exposed_as = %component.exposed_as,
        arguments = component.arguments.len(),
        singleton = is_singleton,
        "built component"
    );
    Ok(component)
}

/// Returns true if the declaration lists `target` in its inheritance clause.
fn inherits(decl: &TypeDecl, target: &TypeRef) -> bool {
    decl.inheritance.iter().any(|t| TypeRef::parse(t) == *target)
}

/// The produced type: the qualified name applied to its generic placeholders.
fn concrete_type(qualified_name: &str, decl: &TypeDecl) -> TypeRef {
    if decl.generic_parameters.is_empty() {
        return TypeRef::parse(qualified_name);
    }
    let placeholders: Vec<&str> = decl
        .generic_parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    TypeRef::parse(&format!("{qualified_name}<{}>", placeholders.join(", ")))
}
