//! Container generator.
//!
//! Prints a [`ResolutionPlan`] as one Swift source unit: imports, the
//! container class, its fields and initializer, and one builder function
//! per component. Output depends only on the plan, the imports and the
//! configuration, so identical input always yields byte-identical text.

use bindery_analysis::{
    Analysis, BuilderPlan, CallArgument, Declaration, Resolution, ResolutionPlan, SingletonField,
    normalize_imports, resolve,
};
use bindery_foundation::{Error, ErrorKind, Result};
use tracing::debug;

use crate::config::{GeneratorConfig, SingletonStorage};
use crate::identifier::escape;

/// First line of every generated file when the header is enabled.
pub const HEADER: &str = "// Generated by bindery. Do not edit.";

const LOCK_FIELD: &str = "lock";
const LOCK_TYPE: &str = "NSRecursiveLock";
const FOUNDATION: &str = "Foundation";

/// Generates the container `container` for `analysis` with the default
/// configuration.
///
/// # Errors
/// Returns the first resolution error; no text is produced on failure.
pub fn generate(analysis: &Analysis, container: &str) -> Result<String> {
    generate_with_config(analysis, container, &GeneratorConfig::default())
}

/// Generates the container `container` for `analysis`.
///
/// # Errors
/// Returns the first resolution error; no text is produced on failure.
pub fn generate_with_config(
    analysis: &Analysis,
    container: &str,
    config: &GeneratorConfig,
) -> Result<String> {
    let plan = resolve(&analysis.components, container)?;
    render(&plan, &analysis.imports, config)
}

/// Prints an already resolved plan.
///
/// # Errors
/// Returns `NameCollision` when the lock-based singleton storage would
/// clash with a member of the plan.
pub fn render(plan: &ResolutionPlan, imports: &[String], config: &GeneratorConfig) -> Result<String> {
    check_storage_names(plan, config)?;
    let imports = container_imports(plan, imports, config);

    let mut writer = ContainerWriter::new(config);
    writer.write_container(plan, &imports);

    debug!(
        container = %plan.container,
        builders = plan.builders.len(),
        bytes = writer.output.len(),
        "generated container"
    );
    Ok(writer.output)
}

fn uses_lock(plan: &ResolutionPlan, config: &GeneratorConfig) -> bool {
    config.singleton_storage == SingletonStorage::Locked && !plan.singletons.is_empty()
}

fn container_imports(plan: &ResolutionPlan, imports: &[String], config: &GeneratorConfig) -> Vec<String> {
    let foundation = uses_lock(plan, config).then(|| FOUNDATION.to_string());
    normalize_imports(imports.iter().cloned().chain(foundation))
}

fn storage_name(field: &str) -> String {
    format!("_{field}")
}

fn check_storage_names(plan: &ResolutionPlan, config: &GeneratorConfig) -> Result<()> {
    if !uses_lock(plan, config) {
        return Ok(());
    }
    let members: Vec<(&str, String)> = plan
        .externals
        .iter()
        .map(|e| (e.name.as_str(), e.type_ref.to_string()))
        .chain(plan.singletons.iter().map(|s| (s.name.as_str(), s.type_ref.to_string())))
        .chain(plan.builders.iter().map(|b| (b.name.as_str(), b.constructor.clone())))
        .collect();

    let storage = std::iter::once((LOCK_FIELD.to_string(), LOCK_TYPE.to_string())).chain(
        plan.singletons
            .iter()
            .map(|s| (storage_name(&s.name), s.type_ref.to_string())),
    );
    for (name, owner) in storage {
        if let Some((_, first)) = members.iter().find(|(member, _)| *member == name) {
            return Err(Error::new(ErrorKind::NameCollision {
                name,
                first: first.clone(),
                second: owner,
            }));
        }
    }
    Ok(())
}

// =============================================================================
// Writer
// =============================================================================

/// Line-oriented writer state.
struct ContainerWriter<'c> {
    config: &'c GeneratorConfig,
    indent: String,
    output: String,
    level: usize,
    members: usize,
}

impl<'c> ContainerWriter<'c> {
    fn new(config: &'c GeneratorConfig) -> Self {
        Self {
            config,
            indent: config.indent_unit(),
            output: String::new(),
            level: 0,
            members: 0,
        }
    }

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.level {
                self.output.push_str(&self.indent);
            }
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    fn open(&mut self, text: &str) {
        self.line(&format!("{text} {{"));
        self.level += 1;
    }

    fn close(&mut self) {
        self.level = self.level.saturating_sub(1);
        self.line("}");
    }

    /// Separates class members with one blank line.
    fn member(&mut self) {
        if self.members > 0 {
            self.line("");
        }
        self.members += 1;
    }

    fn write_container(&mut self, plan: &ResolutionPlan, imports: &[String]) {
        if self.config.header {
            self.line(HEADER);
            self.line("");
        }
        if !imports.is_empty() {
            for import in imports {
                self.line(&format!("import {import}"));
            }
            self.line("");
        }

        self.open(&format!("public final class {}", plan.container));
        self.write_externals(&plan.externals);
        self.write_singletons(&plan.singletons);
        self.write_initializer(&plan.externals);
        for builder in &plan.builders {
            self.write_builder(builder);
        }
        self.close();
    }

    fn write_externals(&mut self, externals: &[Declaration]) {
        if externals.is_empty() {
            return;
        }
        self.member();
        for external in externals {
            self.line(&format!("private let {}: {}", escape(&external.name), external.type_ref));
        }
    }

    fn write_singletons(&mut self, singletons: &[SingletonField]) {
        if singletons.is_empty() {
            return;
        }
        match self.config.singleton_storage {
            SingletonStorage::Lazy => {
                self.member();
                for singleton in singletons {
                    self.line(&format!(
                        "private lazy var {}: {} = {}()",
                        escape(&singleton.name),
                        singleton.type_ref,
                        singleton.builder
                    ));
                }
            }
            SingletonStorage::Locked => {
                self.member();
                self.line(&format!("private let {LOCK_FIELD} = {LOCK_TYPE}()"));
                for singleton in singletons {
                    self.line(&format!(
                        "private var {}: {}",
                        storage_name(&singleton.name),
                        singleton.type_ref.optional()
                    ));
                }
                for singleton in singletons {
                    self.write_locked_accessor(singleton);
                }
            }
        }
    }

    fn write_locked_accessor(&mut self, singleton: &SingletonField) {
        let storage = storage_name(&singleton.name);
        self.member();
        self.open(&format!(
            "private var {}: {}",
            escape(&singleton.name),
            singleton.type_ref
        ));
        self.line(&format!("{LOCK_FIELD}.lock()"));
        self.line(&format!("defer {{ {LOCK_FIELD}.unlock() }}"));
        self.open(&format!("if let instance = {storage}"));
        self.line("return instance");
        self.close();
        self.line(&format!("let instance = {}()", singleton.builder));
        self.line(&format!("{storage} = instance"));
        self.line("return instance");
        self.close();
    }

    fn write_initializer(&mut self, externals: &[Declaration]) {
        self.member();
        if externals.is_empty() {
            self.line("public init() {}");
            return;
        }
        let parameters = externals
            .iter()
            .map(|e| format!("{}: {}", escape(&e.name), e.type_ref))
            .collect::<Vec<_>>()
            .join(", ");
        self.open(&format!("public init({parameters})"));
        for external in externals {
            let name = escape(&external.name);
            self.line(&format!("self.{name} = {name}"));
        }
        self.close();
    }

    fn write_builder(&mut self, builder: &BuilderPlan) {
        self.member();
        let visibility = if builder.is_public { "public " } else { "" };
        self.open(&format!(
            "{visibility}func {}{}({}) -> {}{}",
            builder.name,
            generic_clause(builder),
            parameter_clause(&builder.parameters),
            builder.return_type,
            where_clause(builder)
        ));
        let arguments = builder
            .arguments
            .iter()
            .map(|argument| call_argument(argument, &builder.parameters))
            .collect::<Vec<_>>()
            .join(", ");
        self.line(&format!("{}({arguments})", builder.constructor));
        self.close();
    }
}

fn generic_clause(builder: &BuilderPlan) -> String {
    if builder.generic_parameters.is_empty() {
        return String::new();
    }
    let parameters = builder
        .generic_parameters
        .iter()
        .map(|p| match &p.constraint {
            Some(constraint) => format!("{}: {constraint}", p.name),
            None => p.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("<{parameters}>")
}

fn where_clause(builder: &BuilderPlan) -> String {
    if builder.where_requirements.is_empty() {
        String::new()
    } else {
        format!(" where {}", builder.where_requirements.join(", "))
    }
}

fn parameter_clause(parameters: &[Declaration]) -> String {
    parameters
        .iter()
        .map(|p| {
            let default = p
                .default_value
                .as_ref()
                .map(|d| format!(" = {d}"))
                .unwrap_or_default();
            format!("{}: {}{default}", escape(&p.name), p.type_ref)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Container members named like a builder parameter are reached through
/// `self.` so the parameter cannot shadow them.
fn call_argument(argument: &CallArgument, parameters: &[Declaration]) -> String {
    let member = |name: &str| {
        if parameters.iter().any(|p| p.name == name) {
            format!("self.{}", escape(name))
        } else {
            escape(name)
        }
    };
    let value = match &argument.resolution {
        Resolution::SelfReference => "self".to_string(),
        Resolution::Singleton { field } | Resolution::External { field } => member(field),
        Resolution::Build { builder } => format!("{}()", member(builder)),
        Resolution::Parameter { name } => escape(name),
    };
    match &argument.label {
        Some(label) => format!("{}: {value}", escape(label)),
        None => value,
    }
}
