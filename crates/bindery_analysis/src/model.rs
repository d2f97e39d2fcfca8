//! The data model shared by the analysis stages and the generator.

use bindery_foundation::{SourceLocation, TypeRef, lowercasing_first};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Declarations and arguments
// =============================================================================

/// A named, typed slot: one initializer parameter or one external field.
///
/// Equality covers name, type and default value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declaration {
    /// Variable name.
    pub name: String,
    /// Variable type.
    pub type_ref: TypeRef,
    /// Default value expression, carried as opaque text.
    pub default_value: Option<String>,
}

impl Declaration {
    /// Creates a declaration without a default value.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            default_value: None,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// How an initializer argument is supplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ArgumentKind {
    /// Supplied by the caller at every construction site.
    Parameter,
    /// Resolved by the container.
    Dependency,
}

/// One argument of an injectable initializer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Argument {
    /// Name, type and default value.
    pub declaration: Declaration,
    /// Parameter or dependency.
    pub kind: ArgumentKind,
    /// Call-site label; `None` when the argument is passed positionally.
    pub label: Option<String>,
}

impl Argument {
    /// Returns true for container-resolved arguments.
    #[must_use]
    pub fn is_dependency(&self) -> bool {
        self.kind == ArgumentKind::Dependency
    }
}

// =============================================================================
// Components
// =============================================================================

/// Lifecycle of a component's instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Lifecycle {
    /// Built fresh on every request.
    Reusable,
    /// Built once and shared for the container's lifetime.
    Singleton,
}

impl Lifecycle {
    /// Returns the lifecycle for an annotation name.
    #[must_use]
    pub fn from_annotation(name: &str) -> Option<Self> {
        match name {
            "Reusable" => Some(Self::Reusable),
            "Singleton" => Some(Self::Singleton),
            _ => None,
        }
    }

    /// Returns the annotation name.
    #[must_use]
    pub const fn annotation(self) -> &'static str {
        match self {
            Self::Reusable => "Reusable",
            Self::Singleton => "Singleton",
        }
    }
}

/// Visibility of a component's builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Scope {
    /// Visible inside the module only.
    #[default]
    Internal,
    /// Visible to other modules.
    Public,
}

/// A generic parameter of a component, passed through to its builder.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeParameter {
    /// Placeholder name.
    pub name: String,
    /// Inline constraint, if any.
    pub constraint: Option<String>,
}

/// A type opted into dependency injection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Component {
    /// Declared name, qualified by enclosing types (`Outer.Inner`).
    pub name: String,
    /// Concrete produced type; `Optional` when the initializer is failable.
    /// An `init!` initializer also yields `T?`, so builders never return an
    /// implicitly unwrapped value.
    pub type_ref: TypeRef,
    /// Type callers see; equals `type_ref` unless abstracted.
    pub exposed_as: TypeRef,
    /// Initializer arguments in declaration order.
    pub arguments: Vec<Argument>,
    /// Builder visibility.
    pub scope: Scope,
    /// Instance lifecycle.
    pub lifecycle: Lifecycle,
    /// Generic parameters of the declaration.
    pub generic_parameters: Vec<TypeParameter>,
    /// `where` clause requirements of the declaration.
    pub where_requirements: Vec<String>,
    /// Location of the annotated declaration.
    pub location: SourceLocation,
}

impl Component {
    /// Returns true if the builder is externally visible.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.scope == Scope::Public
    }

    /// Returns true for singletons.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.lifecycle == Lifecycle::Singleton
    }

    /// Returns true if callers see an abstraction rather than the concrete type.
    #[must_use]
    pub fn is_abstracted(&self) -> bool {
        self.exposed_as != self.type_ref
    }

    /// Returns true if construction may fail.
    #[must_use]
    pub fn is_failable(&self) -> bool {
        self.type_ref.is_optional()
    }

    /// Returns the simple name of the concrete type.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.type_ref.simple_name()
    }

    /// Returns the builder function name, `build<SimpleName>`.
    #[must_use]
    pub fn builder_name(&self) -> String {
        format!("build{}", self.simple_name())
    }

    /// Returns the name of the container field that caches a singleton.
    #[must_use]
    pub fn field_name(&self) -> String {
        lowercasing_first(self.simple_name())
    }

    /// Returns container-resolved arguments in order.
    pub fn dependencies(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|a| a.is_dependency())
    }

    /// Returns caller-supplied arguments in order.
    pub fn parameters(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|a| !a.is_dependency())
    }

    /// Returns the first caller-supplied argument without a default value.
    #[must_use]
    pub fn required_parameter(&self) -> Option<&Argument> {
        self.parameters()
            .find(|a| a.declaration.default_value.is_none())
    }

    /// Returns the names of the generic placeholders.
    #[must_use]
    pub fn placeholders(&self) -> Vec<String> {
        self.generic_parameters.iter().map(|p| p.name.clone()).collect()
    }
}

// =============================================================================
// Analysis
// =============================================================================

/// Everything the generator needs: components in scan order and the imports
/// of the files declaring them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Analysis {
    /// Components in scan order.
    pub components: Vec<Component>,
    /// Deduplicated, sorted import paths.
    pub imports: Vec<String>,
}

impl Analysis {
    /// Creates an analysis, normalising the import list.
    #[must_use]
    pub fn new(components: Vec<Component>, imports: impl IntoIterator<Item = String>) -> Self {
        Self {
            components,
            imports: normalize_imports(imports),
        }
    }

    /// Returns the number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if no component was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Sorts imports and drops case-insensitive duplicates, keeping the first
/// spelling in sorted order.
#[must_use]
pub fn normalize_imports(imports: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut imports: Vec<String> = imports.into_iter().collect();
    imports.sort();
    let mut seen = std::collections::HashSet::new();
    imports.retain(|import| seen.insert(import.to_lowercase()));
    imports
}
