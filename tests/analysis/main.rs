//! Integration tests for Layer 2: Analysis
//!
//! Tests for scanning, classification and resolution across files.

mod pipeline;
mod resolution;
