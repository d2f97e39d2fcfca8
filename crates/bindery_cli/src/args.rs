//! Command-line arguments.

use std::path::PathBuf;

use bindery_codegen::{GeneratorConfig, SingletonStorage};
use clap::{ArgAction, Args, Parser, Subcommand};

/// Compile-time dependency injection container generator.
#[derive(Debug, Parser)]
#[command(name = "bindery", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log output (-v info, -vv debug). `BINDERY_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the container for one compilation target.
    Generate(GenerateArgs),
}

/// Arguments of `bindery generate`.
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Name of the compilation target; the container is `<name>Container`.
    #[arg(long)]
    pub target_name: String,

    /// Path of the generated Swift file.
    #[arg(long)]
    pub output: PathBuf,

    /// Swift files to scan for components.
    #[arg(long, num_args = 1.., required = true)]
    pub source_files: Vec<PathBuf>,

    /// Store singletons in plain `lazy var`s instead of lock-guarded fields.
    #[arg(long)]
    pub unsynchronized_singletons: bool,
}

impl GenerateArgs {
    /// Returns the name of the generated container type.
    #[must_use]
    pub fn container_name(&self) -> String {
        format!("{}Container", self.target_name)
    }

    /// Returns the generator configuration these arguments select.
    #[must_use]
    pub fn config(&self) -> GeneratorConfig {
        let storage = if self.unsynchronized_singletons {
            SingletonStorage::Lazy
        } else {
            SingletonStorage::Locked
        };
        GeneratorConfig::default().with_singleton_storage(storage)
    }
}
