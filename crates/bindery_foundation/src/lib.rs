//! Core types, source locations, and errors for bindery.
//!
//! This crate provides:
//! - [`Span`] and [`SourceLocation`] - Where things are in the input
//! - [`TypeRef`] - Structurally comparable type references
//! - [`Error`] - Categorised diagnostics with optional fix suggestions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod span;
pub mod types;

pub use error::{Error, ErrorCategory, ErrorKind, Result};
pub use span::{SourceLocation, Span};
pub use types::{TypeRef, lowercasing_first};
