//! Arena syntax trees and a Swift-subset front-end for bindery.
//!
//! The analysis pipeline consumes [`SyntaxTree`] values: a flat arena of
//! [`Node`]s addressed by [`NodeId`], where each node carries a closed
//! [`NodeKind`] and its children. Any producer can build one with
//! [`TreeBuilder`]; this crate also ships a tolerant [`Parser`] for the
//! subset of Swift the pipeline needs.
//!
//! ```text
//! source text ──► Lexer ──► tokens ──► Parser ──► SyntaxTree
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod lexer;
pub mod parser;
pub mod token;
pub mod tree;


pub use bindery_foundation::Span;
pub use lexer::Lexer;
pub use parser::{Parser, parse_source};
pub use token::{Token, TokenKind};
pub use tree::{
    Attribute, AttributeArgument, Failability, GenericParameter, ImportDecl, InitializerDecl,
    Node, NodeId, NodeKind, Parameter, SyntaxTree, TreeBuilder, TypeDecl, TypeKeyword,
};
