//! Semantic analysis for bindery.
//!
//! Turns parsed syntax trees into a validated component model and then into
//! a resolution plan the generator can print:
//!
//! ```text
//! SyntaxTree ──► scanner ──► classifier ──► analyzer ──► Analysis
//!                                                           │
//!                                           resolver ◄──────┘
//!                                              │
//!                                              ▼
//!                                        ResolutionPlan
//! ```
//!
//! - [`scanner`] - Finds annotated declarations and reads annotation metadata
//! - [`classifier`] - Splits injectable initializer parameters
//! - [`analyzer`] - Validates declarations and builds [`Component`]s
//! - [`resolver`] - Wires dependencies and checks the graph

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analyzer;
pub mod classifier;
pub mod model;
pub mod resolver;
pub mod scanner;

pub use analyzer::{FileAnalysis, analyze, analyze_file};
pub use classifier::{classify, injectable_initializer};
pub use model::{
    Analysis, Argument, ArgumentKind, Component, Declaration, Lifecycle, Scope, TypeParameter,
    normalize_imports,
};
pub use resolver::{
    BuilderPlan, CallArgument, Resolution, ResolutionPlan, SingletonField, resolve,
};
pub use scanner::{AnnotationMetadata, ScannedDeclaration, scan, scan_imports};
