//! The `generate` pipeline: load, analyse, generate, write.

use std::fs;
use std::path::{Path, PathBuf};

use bindery_analysis::analyze;
use bindery_codegen::{GeneratorConfig, generate_with_config};
use bindery_foundation::{Error, Result};
use bindery_syntax::{SyntaxTree, parse_source};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::args::{Cli, Command, GenerateArgs};

/// What a successful `generate` run did to the output file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The file was created or its content changed.
    Written,
    /// The file already held the generated text and was left untouched.
    Unchanged,
}

/// Runs the parsed command line.
///
/// # Errors
/// Returns the first pipeline error.
pub fn run(cli: &Cli) -> Result<Outcome> {
    match &cli.command {
        Command::Generate(args) => run_generate(args),
    }
}

/// Generates the container and writes it to `args.output`.
///
/// Nothing is written unless every stage succeeds. An output file whose
/// content already matches is not rewritten, so its modification time only
/// changes when the container does.
///
/// # Errors
/// Returns the first pipeline error, or `OutputUnwritable`.
pub fn run_generate(args: &GenerateArgs) -> Result<Outcome> {
    let container = args.container_name();
    let text = generate_files(&args.source_files, &container, &args.config())?;

    if fs::read_to_string(&args.output).is_ok_and(|existing| existing == text) {
        info!(output = %args.output.display(), "container is up to date");
        return Ok(Outcome::Unchanged);
    }
    write_output(&args.output, &text)?;
    info!(output = %args.output.display(), %container, "wrote container");
    Ok(Outcome::Written)
}

/// Reads, parses and analyses `paths`, then generates `container`.
///
/// # Errors
/// Returns the first error in file order.
pub fn generate_files(paths: &[PathBuf], container: &str, config: &GeneratorConfig) -> Result<String> {
    let trees = load_sources(paths)?;
    let analysis = analyze(trees.iter().map(|(path, tree)| (path.as_path(), tree)))?;
    info!(
        files = trees.len(),
        components = analysis.len(),
        "analysis complete"
    );
    generate_with_config(&analysis, container, config)
}

/// Reads and parses every file in parallel, keeping input order.
///
/// # Errors
/// Returns the error of the first failing file in input order.
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<(PathBuf, SyntaxTree)>> {
    let loaded: Vec<Result<(PathBuf, SyntaxTree)>> = paths
        .par_iter()
        .map(|path| load_source(path).map(|tree| (path.clone(), tree)))
        .collect();
    loaded.into_iter().collect()
}

fn load_source(path: &Path) -> Result<SyntaxTree> {
    let source = fs::read_to_string(path).map_err(|e| Error::file_unreadable(path, e.to_string()))?;
    debug!(file = %path.display(), bytes = source.len(), "read source file");
    parse_source(&source, path)
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::output_unwritable(path, e.to_string()))?;
    }
    fs::write(path, text).map_err(|e| Error::output_unwritable(path, e.to_string()))
}
