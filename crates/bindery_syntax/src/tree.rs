//! Arena-allocated syntax tree.
//!
//! Nodes live in one flat vector and refer to their parent and children by
//! [`NodeId`]. Node kinds form a closed enum, so consumers pattern-match on
//! the kind instead of downcasting.

use bindery_foundation::Span;

// =============================================================================
// Node identity
// =============================================================================

/// Index of a node inside its [`SyntaxTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node of every tree.
    pub const ROOT: Self = Self(0);

    /// Returns the position of the node in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// What the node is.
    pub kind: NodeKind,
    /// Source range covered by the node, attributes included.
    pub span: Span,
    /// Enclosing node; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Child nodes in source order.
    pub children: Vec<NodeId>,
}

// =============================================================================
// Node kinds
// =============================================================================

/// The closed set of node kinds the analysis understands.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// The root of a file.
    SourceFile,
    /// `import Module.Submodule`
    Import(ImportDecl),
    /// A nominal type declaration or extension.
    TypeDecl(TypeDecl),
    /// An `init` declaration.
    Initializer(InitializerDecl),
    /// An `@Name(label: value, ...)` attribute.
    Attribute(Attribute),
    /// Any declaration or statement the analysis does not look inside.
    Other,
}

/// An import statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    /// Import kind keyword such as `struct` in `import struct Foo.Bar`.
    pub kind: Option<String>,
    /// Path segments.
    pub path: Vec<String>,
}

impl ImportDecl {
    /// Returns the text following `import`.
    #[must_use]
    pub fn text(&self) -> String {
        let path = self.path.join(".");
        match &self.kind {
            Some(kind) => format!("{kind} {path}"),
            None => path,
        }
    }
}

/// Keyword that introduced a type declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeKeyword {
    /// `struct`
    Struct,
    /// `class`
    Class,
    /// `actor`
    Actor,
    /// `enum`
    Enum,
    /// `protocol`
    Protocol,
    /// `extension`
    Extension,
}

impl TypeKeyword {
    /// Parses a declaration keyword.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "struct" => Some(Self::Struct),
            "class" => Some(Self::Class),
            "actor" => Some(Self::Actor),
            "enum" => Some(Self::Enum),
            "protocol" => Some(Self::Protocol),
            "extension" => Some(Self::Extension),
            _ => None,
        }
    }

    /// Returns the keyword as written.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Class => "class",
            Self::Actor => "actor",
            Self::Enum => "enum",
            Self::Protocol => "protocol",
            Self::Extension => "extension",
        }
    }

    /// Returns true for declarations that can be constructed and injected:
    /// structs, classes and actors.
    #[must_use]
    pub const fn is_data_structure(self) -> bool {
        matches!(self, Self::Struct | Self::Class | Self::Actor)
    }

    /// Returns true for value types.
    #[must_use]
    pub const fn is_value_type(self) -> bool {
        matches!(self, Self::Struct | Self::Enum)
    }
}

/// A type declaration header.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDecl {
    /// Introducing keyword.
    pub keyword: TypeKeyword,
    /// Declared name (for extensions, the extended type).
    pub name: String,
    /// Modifiers such as `public` or `final`.
    pub modifiers: Vec<String>,
    /// Generic parameter clause.
    pub generic_parameters: Vec<GenericParameter>,
    /// Inherited types and conformances, including suppressions like `~Copyable`.
    pub inheritance: Vec<String>,
    /// Requirements of a trailing `where` clause, as written.
    pub where_requirements: Vec<String>,
}

/// One generic parameter such as `T: Codable`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericParameter {
    /// Placeholder name.
    pub name: String,
    /// Inline constraint, if any.
    pub constraint: Option<String>,
}

/// Whether an initializer can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Failability {
    /// `init`
    #[default]
    None,
    /// `init?`
    Optional,
    /// `init!`
    ImplicitlyUnwrapped,
}

/// An initializer declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct InitializerDecl {
    /// Modifiers such as `public` or `convenience`.
    pub modifiers: Vec<String>,
    /// `init`, `init?` or `init!`.
    pub failability: Failability,
    /// Declared `async`.
    pub is_async: bool,
    /// Declared `throws` or `rethrows`.
    pub is_throwing: bool,
    /// Parameter clause.
    pub parameters: Vec<Parameter>,
}

impl InitializerDecl {
    /// Returns the signature in selector form, e.g. `init(logger:title:)`.
    #[must_use]
    pub fn selector(&self) -> String {
        let labels: String = self
            .parameters
            .iter()
            .map(|p| format!("{}:", p.label))
            .collect();
        format!("init({labels})")
    }
}

/// One parameter of an initializer.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    /// First name (argument label); `_` when unlabeled.
    pub label: String,
    /// Second name, when different from the label.
    pub name: Option<String>,
    /// Type as written.
    pub type_text: String,
    /// Default value expression as written.
    pub default_value: Option<String>,
    /// Names of attributes written before the parameter.
    pub attributes: Vec<String>,
    /// Source range of the parameter.
    pub span: Span,
}

impl Parameter {
    /// Returns the name used inside the initializer body.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.label)
    }

    /// Returns the label used at call sites, `None` for `_`.
    #[must_use]
    pub fn argument_label(&self) -> Option<&str> {
        (self.label != "_").then_some(self.label.as_str())
    }

    /// Returns true if the parameter carries the attribute `name`.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}

/// An attribute with its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name without `@`.
    pub name: String,
    /// Arguments in source order.
    pub arguments: Vec<AttributeArgument>,
}

/// One attribute argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeArgument {
    /// Argument label, if any.
    pub label: Option<String>,
    /// Value expression as written.
    pub value: String,
}

// =============================================================================
// Tree
// =============================================================================

/// A parsed file.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    /// Returns the root node id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    /// Panics if `id` belongs to a different tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns the node with the given id, if it exists.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the children of a node in source order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().copied()
    }

    /// Returns the attributes attached to a declaration node.
    pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Attribute)> + '_ {
        self.children(id).map_while(|child| match self.kind(child) {
            NodeKind::Attribute(attribute) => Some((child, attribute)),
            _ => None,
        })
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds only its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterates over all nodes in creation (pre-)order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, node)| {
            #[allow(clippy::cast_possible_truncation)]
            let id = NodeId(i as u32);
            (id, node)
        })
    }

    /// Checks that parent and child links agree and the root is a file.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self.nodes.first() {
            Some(Node {
                kind: NodeKind::SourceFile,
                parent: None,
                ..
            }) => {}
            _ => return Err("root node is not a source file".into()),
        }
        for (id, node) in self.iter() {
            for &child in &node.children {
                let Some(child_node) = self.get(child) else {
                    return Err(format!("node {} has missing child {}", id.0, child.0));
                };
                if child_node.parent != Some(id) {
                    return Err(format!(
                        "node {} is listed under {} but names another parent",
                        child.0, id.0
                    ));
                }
            }
            if id != NodeId::ROOT && node.parent.is_none() {
                return Err(format!("node {} is detached", id.0));
            }
        }
        Ok(())
    }
}

/// Incremental constructor for a [`SyntaxTree`].
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Creates a builder holding only a `SourceFile` root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::SourceFile,
                span: Span::at_start(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Appends a node under `parent` and returns its id.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind, span: Span) -> NodeId {
        #[allow(clippy::cast_possible_truncation)]
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Replaces the span of a node once its extent is known.
    pub fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id.index()].span = span;
    }

    /// Replaces the kind of a node once its header is parsed.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.index()].kind = kind;
    }

    /// Finishes the tree.
    #[must_use]
    pub fn finish(self) -> SyntaxTree {
        SyntaxTree { nodes: self.nodes }
    }
}
