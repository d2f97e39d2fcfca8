//! Error types for bindery.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every error renders as a single diagnostic line so the command-line
//! host can stream them to standard error unchanged.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::span::SourceLocation;

/// Result type alias using bindery's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for bindery operations.
#[derive(Debug, Error)]
#[error("{}error: {kind}{}", location_prefix(.location.as_ref()), fix_suffix(.suggestion.as_deref()))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Where the error occurred, when known.
    pub location: Option<SourceLocation>,
    /// The exact textual fix, when one can be suggested.
    pub suggestion: Option<String>,
}

fn location_prefix(location: Option<&SourceLocation>) -> String {
    location.map(|l| format!("{l}: ")).unwrap_or_default()
}

fn fix_suffix(suggestion: Option<&str>) -> String {
    suggestion.map(|s| format!(" (fix: {s})")).unwrap_or_default()
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: None,
            suggestion: None,
        }
    }

    /// Attaches a source location to this error.
    #[must_use]
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Attaches a fix suggestion to this error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Returns which stage family the error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Creates a file unreadable error.
    #[must_use]
    pub fn file_unreadable(path: &Path, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileUnreadable {
            path: path.to_path_buf(),
            reason: reason.into(),
        })
        .at(SourceLocation::file(path))
    }

    /// Creates an output unwritable error.
    #[must_use]
    pub fn output_unwritable(path: &Path, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::OutputUnwritable {
            path: path.to_path_buf(),
            reason: reason.into(),
        })
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ErrorKind::Parse {
            message: message.into(),
        })
        .at(location)
    }

    /// Creates an unresolved dependency error.
    #[must_use]
    pub fn unresolved(component: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedDependency {
            component: component.into(),
            type_name: type_name.into(),
        })
    }
}

/// The three failure families of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input could not be read or parsed.
    Structural,
    /// An annotated declaration is invalid on its own.
    Declaration,
    /// The component graph cannot be wired.
    Resolution,
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A source file could not be read or decoded.
    #[error("could not read '{}': {reason}", .path.display())]
    FileUnreadable {
        /// The file path.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// The generated container could not be written.
    #[error("could not write '{}': {reason}", .path.display())]
    OutputUnwritable {
        /// The output path.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// The source text could not be parsed.
    #[error("parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },

    /// A syntax tree did not have the expected shape.
    #[error("malformed syntax tree: {message}")]
    MalformedTree {
        /// What was wrong.
        message: String,
    },

    /// A lifecycle annotation on something other than a class, struct or actor.
    #[error("'@{annotation}' may only be applied to classes, structs or actors, not to {kind} '{type_name}'")]
    DisallowedDeclarationKind {
        /// The annotation name.
        annotation: String,
        /// The declaration keyword that was annotated.
        kind: String,
        /// The declared name.
        type_name: String,
    },

    /// Both lifecycle annotations on one declaration.
    #[error("'@Reusable' and '@Singleton' cannot both be applied to '{type_name}'")]
    MultipleLifecycleAnnotations {
        /// The declared name.
        type_name: String,
    },

    /// A singleton declared as a copyable value type.
    #[error("'@Singleton' cannot be applied to value type '{type_name}'")]
    ValueTypeSingleton {
        /// The declared name.
        type_name: String,
    },

    /// The exposure type is not conformed to at the declaration site.
    #[error("'{type_name}' does not conform to '{exposed_as}' at its declaration site")]
    NonConformingExposure {
        /// The declared name.
        type_name: String,
        /// The requested exposure type.
        exposed_as: String,
    },

    /// No initializer is marked `@Inject`.
    #[error("'{type_name}' has no initializer marked '@Inject'")]
    MissingInjectableInitializer {
        /// The declared name.
        type_name: String,
    },

    /// More than one initializer is marked `@Inject`.
    #[error("'{type_name}' has more than one initializer marked '@Inject'")]
    MultipleInjectableInitializers {
        /// The declared name.
        type_name: String,
    },

    /// The injectable initializer has effects the container cannot express.
    #[error("injectable initializer of '{type_name}' is not supported: {reason}")]
    UnsupportedInitializer {
        /// The declared name.
        type_name: String,
        /// Why it is unsupported.
        reason: String,
    },

    /// An annotation argument outside `exposeAs` / `scope`, or a bad value.
    #[error("invalid argument to '@{annotation}': {message}")]
    InvalidAnnotationArgument {
        /// The annotation name.
        annotation: String,
        /// What was wrong.
        message: String,
    },

    /// A singleton with open generic parameters.
    #[error("'@Singleton' cannot be applied to generic type '{type_name}'")]
    GenericSingleton {
        /// The declared name.
        type_name: String,
    },

    /// A singleton whose initializer needs a caller-supplied value.
    #[error("singleton '{type_name}' cannot take parameter '{parameter}' without a default value")]
    SingletonWithParameters {
        /// The declared name.
        type_name: String,
        /// The offending parameter.
        parameter: String,
    },

    /// No provider exists for a dependency.
    #[error("cannot resolve dependency of type '{type_name}' required by '{component}'")]
    UnresolvedDependency {
        /// The component requiring the dependency.
        component: String,
        /// The dependency type.
        type_name: String,
    },

    /// Several components expose the same type.
    #[error("type '{type_name}' is provided by more than one component: {}", .providers.join(", "))]
    AmbiguousProvider {
        /// The exposed type.
        type_name: String,
        /// The providing components, in scan order.
        providers: Vec<String>,
    },

    /// Two components would get the same builder function.
    #[error("more than one component would generate builder '{name}'")]
    DuplicateBuilder {
        /// The builder function name.
        name: String,
    },

    /// Two container members would get the same name.
    #[error("container member '{name}' would be declared for both '{first}' and '{second}'")]
    NameCollision {
        /// The member name.
        name: String,
        /// Type of the first claimant.
        first: String,
        /// Type of the second claimant.
        second: String,
    },

    /// A dependency would be built implicitly but needs caller input.
    #[error("'{component}' depends on '{dependency}', which cannot be built implicitly because it requires parameter '{parameter}'")]
    ParameterizedDependency {
        /// The requiring component.
        component: String,
        /// The dependency component.
        dependency: String,
        /// The parameter without a default.
        parameter: String,
    },

    /// Construction would recurse forever.
    #[error("dependency cycle: {}", .path.join(" -> "))]
    DependencyCycle {
        /// Components on the cycle, first repeated at the end.
        path: Vec<String>,
    },
}

impl ErrorKind {
    /// Returns which stage family this kind belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileUnreadable { .. }
            | Self::OutputUnwritable { .. }
            | Self::Parse { .. }
            | Self::MalformedTree { .. } => ErrorCategory::Structural,
            Self::DisallowedDeclarationKind { .. }
            | Self::MultipleLifecycleAnnotations { .. }
            | Self::ValueTypeSingleton { .. }
            | Self::NonConformingExposure { .. }
            | Self::MissingInjectableInitializer { .. }
            | Self::MultipleInjectableInitializers { .. }
            | Self::UnsupportedInitializer { .. }
            | Self::InvalidAnnotationArgument { .. }
            | Self::GenericSingleton { .. }
            | Self::SingletonWithParameters { .. } => ErrorCategory::Declaration,
            Self::UnresolvedDependency { .. }
            | Self::AmbiguousProvider { .. }
            | Self::DuplicateBuilder { .. }
            | Self::NameCollision { .. }
            | Self::ParameterizedDependency { .. }
            | Self::DependencyCycle { .. } => ErrorCategory::Resolution,
        }
    }
}
