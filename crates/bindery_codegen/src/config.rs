//! Configuration for the container generator.

/// How singleton fields are stored in the generated container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SingletonStorage {
    /// An optional backing field guarded by a recursive lock. First access
    /// from any thread builds the instance; later accesses observe it.
    #[default]
    Locked,
    /// A plain `lazy var`. Not safe to touch from several threads.
    Lazy,
}

impl SingletonStorage {
    /// Returns true if first access may happen concurrently.
    #[must_use]
    pub const fn is_thread_safe(self) -> bool {
        matches!(self, Self::Locked)
    }
}

/// Configuration for container generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Number of spaces for each indentation level.
    pub indent_width: usize,

    /// Storage strategy for singleton fields.
    pub singleton_storage: SingletonStorage,

    /// Whether to start the output with a "do not edit" comment.
    pub header: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            singleton_storage: SingletonStorage::Locked,
            header: true,
        }
    }
}

impl GeneratorConfig {
    /// Creates a configuration whose singletons use plain `lazy var`s.
    #[must_use]
    pub fn unsynchronized() -> Self {
        Self {
            singleton_storage: SingletonStorage::Lazy,
            ..Self::default()
        }
    }

    /// Builder method to set the indentation width.
    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Builder method to set the singleton storage strategy.
    #[must_use]
    pub fn with_singleton_storage(mut self, storage: SingletonStorage) -> Self {
        self.singleton_storage = storage;
        self
    }

    /// Builder method to toggle the header comment.
    #[must_use]
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Returns one level of indentation.
    #[must_use]
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }
}
