//! Integration tests for Layer 4: CLI
//!
//! Drives `bindery generate` through its library entry point on real files.

mod generate;
