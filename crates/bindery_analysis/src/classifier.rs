//! Argument classifier.
//!
//! Locates the initializer marked `@Inject` inside an annotated
//! declaration and splits its parameters into container-resolved
//! dependencies and caller-supplied parameters.

use bindery_foundation::{Error, ErrorKind, Result, SourceLocation, TypeRef};
use bindery_syntax::{InitializerDecl, NodeId, NodeKind, Parameter, SyntaxTree};

use crate::model::{Argument, ArgumentKind, Declaration};

/// Attribute marking the injectable initializer.
pub const INJECT: &str = "Inject";
/// Attribute marking a parameter the container must not resolve.
pub const DEPENDENCY_IGNORED: &str = "DependencyIgnored";

/// Returns the single initializer of `node` marked `@Inject`.
///
/// # Errors
/// Returns `MissingInjectableInitializer` or `MultipleInjectableInitializers`
/// when there is not exactly one, located at the declaration.
pub fn injectable_initializer<'t>(
    tree: &'t SyntaxTree,
    node: NodeId,
    type_name: &str,
    location: &SourceLocation,
) -> Result<(NodeId, &'t InitializerDecl)> {
    let initializers: Vec<(NodeId, &InitializerDecl)> = tree
        .children(node)
        .filter_map(|child| match tree.kind(child) {
            NodeKind::Initializer(init) => Some((child, init)),
            _ => None,
        })
        .collect();

    let mut marked = initializers
        .iter()
        .filter(|(id, _)| tree.attributes(*id).any(|(_, a)| a.name == INJECT));

    match (marked.next(), marked.next()) {
        (Some(&found), None) => Ok(found),
        (Some(_), Some(_)) => Err(Error::new(ErrorKind::MultipleInjectableInitializers {
            type_name: type_name.to_string(),
        })
        .at(location.clone())),
        (None, _) => {
            let error = Error::new(ErrorKind::MissingInjectableInitializer {
                type_name: type_name.to_string(),
            })
            .at(location.clone());
            Err(match initializers.as_slice() {
                [(_, only)] => error.with_suggestion(format!("mark '{}' with '@{INJECT}'", only.selector())),
                [] => error.with_suggestion(format!("add an initializer marked '@{INJECT}'")),
                _ => error,
            })
        }
    }
}

/// Classifies the parameters of an injectable initializer, in order.
///
/// A parameter marked `@DependencyIgnored` is a [`ArgumentKind::Parameter`];
/// every other parameter is a [`ArgumentKind::Dependency`]. The result only
/// depends on the initializer, so classifying twice gives the same list.
#[must_use]
pub fn classify(initializer: &InitializerDecl) -> Vec<Argument> {
    initializer.parameters.iter().map(classify_parameter).collect()
}

fn classify_parameter(parameter: &Parameter) -> Argument {
    let kind = if parameter.has_attribute(DEPENDENCY_IGNORED) {
        ArgumentKind::Parameter
    } else {
        ArgumentKind::Dependency
    };
    let label = parameter.argument_label().map(str::to_string);
    let name = label
        .clone()
        .unwrap_or_else(|| parameter.local_name().to_string());
    Argument {
        declaration: Declaration {
            name,
            type_ref: TypeRef::parse(&parameter.type_text),
            default_value: parameter.default_value.clone(),
        },
        kind,
        label,
    }
}
