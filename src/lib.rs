//! bindery - Compile-time dependency injection container generator
//!
//! This crate re-exports all layers of the bindery pipeline for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: bindery_cli         `generate` command, logging, file loading
//! Layer 3: bindery_codegen     Container source generation
//! Layer 2: bindery_analysis    Scanning, classification, dependency resolution
//! Layer 1: bindery_syntax      Arena syntax trees, Swift-subset lexer and parser
//! Layer 0: bindery_foundation  Core types (TypeRef, SourceLocation, Error)
//! ```

pub use bindery_analysis as analysis;
pub use bindery_cli as cli;
pub use bindery_codegen as codegen;
pub use bindery_foundation as foundation;
pub use bindery_syntax as syntax;
