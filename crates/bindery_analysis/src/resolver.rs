//! Dependency graph resolver.
//!
//! Decides how every dependency slot of every component is filled. The
//! providers of each exposed type are collected once into an immutable
//! registry, which is then only read:
//!
//! 1. the container's own type resolves to the container itself;
//! 2. a type a singleton exposes resolves to that singleton's field;
//! 3. a type no component provides becomes an external dependency, supplied
//!    to the container's initializer;
//! 4. any other provided type is built by calling its builder.
//!
//! A type that is neither provided nor suppliable from outside (an opaque
//! `some P`, `Self`, or a generic placeholder) cannot be resolved. Because
//! externals are exactly the unprovided types, steps 2 and 3 never compete.

use bindery_foundation::{Error, ErrorKind, Result, TypeRef, lowercasing_first};
use tracing::debug;

use crate::model::{Argument, Component, Declaration, TypeParameter};

// =============================================================================
// Plan
// =============================================================================

/// How one initializer argument is supplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The container passes itself.
    SelfReference,
    /// A cached singleton field.
    Singleton {
        /// Field name.
        field: String,
    },
    /// A field holding an external dependency.
    External {
        /// Field name.
        field: String,
    },
    /// A fresh instance from another builder.
    Build {
        /// Builder function name.
        builder: String,
    },
    /// A builder parameter forwarded from the caller.
    Parameter {
        /// Parameter name.
        name: String,
    },
}

/// One argument of a constructor call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallArgument {
    /// Call-site label; `None` for positional arguments.
    pub label: Option<String>,
    /// Where the value comes from.
    pub resolution: Resolution,
}

/// A lazily initialised singleton field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingletonField {
    /// Field name.
    pub name: String,
    /// Field type: the exposed type of the singleton.
    pub type_ref: TypeRef,
    /// Builder that produces the instance.
    pub builder: String,
}

/// The builder function of one component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuilderPlan {
    /// Function name.
    pub name: String,
    /// Whether the function is `public`.
    pub is_public: bool,
    /// Generic parameters passed through from the declaration.
    pub generic_parameters: Vec<TypeParameter>,
    /// `where` requirements passed through from the declaration.
    pub where_requirements: Vec<String>,
    /// Caller-supplied parameters in initializer order.
    pub parameters: Vec<Declaration>,
    /// Declared return type.
    pub return_type: TypeRef,
    /// Name of the type whose initializer is called.
    pub constructor: String,
    /// Constructor arguments in initializer order.
    pub arguments: Vec<CallArgument>,
}

/// Everything the generator needs to emit a container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionPlan {
    /// Container type name.
    pub container: String,
    /// External dependencies, sorted by lowercase name.
    pub externals: Vec<Declaration>,
    /// Singletons in scan order.
    pub singletons: Vec<SingletonField>,
    /// Builders in scan order.
    pub builders: Vec<BuilderPlan>,
}

// =============================================================================
// Registry
// =============================================================================

/// Exposed types and builder names mapped to component indices.
#[derive(Clone, Debug, Default)]
struct Registry {
    providers: im::HashMap<TypeRef, usize>,
    builders: im::HashMap<String, usize>,
}

impl Registry {
    /// Builds the registry in one pass over the components.
    fn build(components: &[Component]) -> Result<Self> {
        components
            .iter()
            .enumerate()
            .try_fold(Self::default(), |registry, (index, component)| {
                let builder = component.builder_name();
                if registry.builders.contains_key(&builder) {
                    return Err(Error::new(ErrorKind::DuplicateBuilder { name: builder })
                        .at(component.location.clone()));
                }
                if let Some(&first) = registry.providers.get(&component.exposed_as) {
                    return Err(Error::new(ErrorKind::AmbiguousProvider {
                        type_name: component.exposed_as.to_string(),
                        providers: vec![components[first].name.clone(), component.name.clone()],
                    })
                    .at(component.location.clone()));
                }
                Ok(Self {
                    providers: registry.providers.update(component.exposed_as.clone(), index),
                    builders: registry.builders.update(builder, index),
                })
            })
    }

    fn provider(&self, type_ref: &TypeRef) -> Option<usize> {
        self.providers.get(type_ref).copied()
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolves every dependency of `components` for a container named
/// `container`.
///
/// # Errors
/// Returns a resolution error for duplicate builders, ambiguous providers,
/// unresolvable dependencies, dependencies that need caller input,
/// colliding member names and dependency cycles.
pub fn resolve(components: &[Component], container: &str) -> Result<ResolutionPlan> {
    let registry = Registry::build(components)?;
    let container_type = TypeRef::parse(container);

    let mut externals: Vec<Declaration> = Vec::new();
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); components.len()];
    let mut calls: Vec<Vec<CallArgument>> = Vec::with_capacity(components.len());

    for (index, component) in components.iter().enumerate() {
        let placeholders = component.placeholders();
        let mut arguments = Vec::with_capacity(component.arguments.len());
        for argument in &component.arguments {
            let resolution = if argument.is_dependency() {
                resolve_dependency(
                    component,
                    argument,
                    &registry,
                    components,
                    &container_type,
                    &placeholders,
                    &mut externals,
                    &mut edges[index],
                )?
            } else {
                Resolution::Parameter {
                    name: argument.declaration.name.clone(),
                }
            };
            arguments.push(CallArgument {
                label: argument.label.clone(),
                resolution,
            });
        }
        calls.push(arguments);
    }

    externals.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.type_ref.cmp(&b.type_ref))
    });

    let singletons: Vec<SingletonField> = components
        .iter()
        .filter(|c| c.is_singleton())
        .map(|c| SingletonField {
            name: c.field_name(),
            type_ref: c.exposed_as.clone(),
            builder: c.builder_name(),
        })
        .collect();

    check_member_names(components, &externals, &singletons)?;
    CycleDetector::new(components, &edges).run()?;

    let builders = components
        .iter()
        .zip(calls)
        .map(|(component, arguments)| BuilderPlan {
            name: component.builder_name(),
            is_public: component.is_public(),
            generic_parameters: component.generic_parameters.clone(),
            where_requirements: component.where_requirements.clone(),
            parameters: component.parameters().map(|a| a.declaration.clone()).collect(),
            return_type: return_type(component),
            constructor: component.name.clone(),
            arguments,
        })
        .collect();

    debug!(
        container,
        externals = externals.len(),
        singletons = singletons.len(),
        "resolved dependency graph"
    );
    Ok(ResolutionPlan {
        container: container.to_string(),
        externals,
        singletons,
        builders,
    })
}

/// Applies the priority chain to one dependency argument.
#[allow(clippy::too_many_arguments)]
fn resolve_dependency(
    component: &Component,
    argument: &Argument,
    registry: &Registry,
    components: &[Component],
    container_type: &TypeRef,
    placeholders: &[String],
    externals: &mut Vec<Declaration>,
    edges: &mut Vec<usize>,
) -> Result<Resolution> {
    let type_ref = &argument.declaration.type_ref;

    if type_ref == container_type {
        return Ok(Resolution::SelfReference);
    }

    if let Some(provider) = registry.provider(type_ref) {
        let dependency = &components[provider];
        edges.push(provider);
        if dependency.is_singleton() {
            return Ok(Resolution::Singleton {
                field: dependency.field_name(),
            });
        }
        if let Some(parameter) = dependency.required_parameter() {
            return Err(Error::new(ErrorKind::ParameterizedDependency {
                component: component.name.clone(),
                dependency: dependency.name.clone(),
                parameter: parameter.declaration.name.clone(),
            })
            .at(component.location.clone()));
        }
        return Ok(Resolution::Build {
            builder: dependency.builder_name(),
        });
    }

    if !type_ref.is_injectable_from_outside(placeholders) {
        return Err(
            Error::unresolved(component.name.clone(), type_ref.to_string())
                .at(component.location.clone()),
        );
    }

    let field = lowercasing_first(type_ref.simple_name());
    if !externals.iter().any(|e| e.type_ref == *type_ref) {
        debug!(component = %component.name, %type_ref, %field, "external dependency");
        externals.push(Declaration::new(field.clone(), type_ref.clone()));
    }
    Ok(Resolution::External { field })
}

/// The builder's declared return type.
///
/// An abstracted component returns an opaque `some P`; when construction
/// may fail, the opaque type wraps the unwrapped exposure and the optional
/// is reapplied outside it.
fn return_type(component: &Component) -> TypeRef {
    if !component.is_abstracted() {
        return component.type_ref.clone();
    }
    let failable = component.is_failable();
    let inner = if failable {
        component.exposed_as.unwrapped()
    } else {
        component.exposed_as.clone()
    };
    let opaque = if inner.is_opaque() || inner.as_str().starts_with("any ") {
        inner
    } else {
        TypeRef::parse(&format!("some {inner}"))
    };
    if failable { opaque.optional() } else { opaque }
}

/// Rejects two container members with the same name.
fn check_member_names(
    components: &[Component],
    externals: &[Declaration],
    singletons: &[SingletonField],
) -> Result<()> {
    let members = externals
        .iter()
        .map(|e| (e.name.clone(), e.type_ref.to_string()))
        .chain(singletons.iter().map(|s| (s.name.clone(), s.type_ref.to_string())))
        .chain(components.iter().map(|c| (c.builder_name(), c.name.clone())));

    let mut seen: im::HashMap<String, String> = im::HashMap::new();
    for (name, owner) in members {
        if let Some(first) = seen.get(&name) {
            return Err(Error::new(ErrorKind::NameCollision {
                name,
                first: first.clone(),
                second: owner,
            }));
        }
        seen.insert(name, owner);
    }
    Ok(())
}

// =============================================================================
// Cycle detection
// =============================================================================

/// Depth-first search over construction edges with an explicit stack of
/// components under construction.
struct CycleDetector<'a> {
    components: &'a [Component],
    edges: &'a [Vec<usize>],
    constructing: Vec<usize>,
    finished: Vec<bool>,
}

impl<'a> CycleDetector<'a> {
    fn new(components: &'a [Component], edges: &'a [Vec<usize>]) -> Self {
        Self {
            components,
            edges,
            constructing: Vec::new(),
            finished: vec![false; components.len()],
        }
    }

    fn run(mut self) -> Result<()> {
        (0..self.components.len()).try_for_each(|index| self.visit(index))
    }

    fn visit(&mut self, index: usize) -> Result<()> {
        if self.finished[index] {
            return Ok(());
        }
        self.begin(index)?;
        for &next in &self.edges[index] {
            self.visit(next)?;
        }
        self.finish(index);
        Ok(())
    }

    /// Pushes a component; errors if it is already under construction.
    fn begin(&mut self, index: usize) -> Result<()> {
        if let Some(position) = self.constructing.iter().position(|&i| i == index) {
            let path: Vec<String> = self.constructing[position..]
                .iter()
                .chain(std::iter::once(&index))
                .map(|&i| self.components[i].name.clone())
                .collect();
            return Err(Error::new(ErrorKind::DependencyCycle { path })
                .at(self.components[index].location.clone())
                .with_suggestion("make one of the components on the cycle a '@Singleton' that does not depend on the others"));
        }
        self.constructing.push(index);
        Ok(())
    }

    fn finish(&mut self, index: usize) {
        self.constructing.pop();
        self.finished[index] = true;
    }
}
