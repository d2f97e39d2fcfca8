//! Command-line host for bindery.
//!
//! Parses arguments with `clap`, sets up `tracing` output and drives the
//! pipeline:
//!
//! ```text
//! files ──(rayon)──► parse ──► analyze ──► generate ──► output file
//! ```
//!
//! Loading and parsing run in parallel per file; analysis and generation
//! need every file and run once all are loaded.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod args;
pub mod logging;
pub mod pipeline;

pub use args::{Cli, Command, GenerateArgs};
pub use logging::init_logging;
pub use pipeline::{Outcome, generate_files, load_sources, run, run_generate};
