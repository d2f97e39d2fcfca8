//! Integration tests for Layer 1: Syntax
//!
//! Tests for the lexer, the parser and hand-built trees.

mod lexer;
mod parser;
mod tree_builder;
