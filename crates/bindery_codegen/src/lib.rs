//! Container source generation for bindery.
//!
//! Resolves an [`Analysis`](bindery_analysis::Analysis) and prints the
//! resulting plan as a Swift container class. Printing is configured by a
//! [`GeneratorConfig`].
//!
//! ```text
//! Analysis ──► resolve ──► ResolutionPlan ──► render ──► Swift source
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod generator;
pub mod identifier;

pub use config::{GeneratorConfig, SingletonStorage};
pub use generator::{HEADER, generate, generate_with_config, render};
