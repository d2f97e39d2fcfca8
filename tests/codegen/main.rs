//! Integration tests for Layer 3: Codegen
//!
//! Tests for generated container text.

mod determinism;
mod scenarios;
