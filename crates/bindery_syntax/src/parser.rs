//! Parser for the Swift subset.
//!
//! The parser builds a [`SyntaxTree`] holding imports, type declarations,
//! initializers and attributes. Everything else (functions, properties,
//! statements) is skimmed by bracket balancing and recorded as an
//! [`NodeKind::Other`] node, so the analysis sees the nesting structure of
//! a file without this crate having to understand all of Swift.
//!
//! A declaration the parser does not model ends at the first token, outside
//! any brackets, that starts a new line and can begin a declaration.

use std::path::Path;

use bindery_foundation::{Error, Result, Span};
use tracing::debug;

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::tree::{
    Attribute, AttributeArgument, Failability, GenericParameter, ImportDecl, InitializerDecl,
    NodeId, NodeKind, Parameter, SyntaxTree, TreeBuilder, TypeDecl, TypeKeyword,
};

/// Keywords that introduce a declaration.
const DECLARATION_KEYWORDS: &[&str] = &[
    "import",
    "struct",
    "class",
    "actor",
    "enum",
    "protocol",
    "extension",
    "init",
    "deinit",
    "func",
    "var",
    "let",
    "subscript",
    "typealias",
    "associatedtype",
    "case",
    "operator",
    "precedencegroup",
    "macro",
];

/// Declaration modifiers.
const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "fileprivate",
    "internal",
    "open",
    "package",
    "final",
    "static",
    "override",
    "convenience",
    "required",
    "lazy",
    "weak",
    "unowned",
    "mutating",
    "nonmutating",
    "dynamic",
    "optional",
    "indirect",
    "nonisolated",
    "distributed",
    "prefix",
    "postfix",
    "infix",
];

/// Kinds that may follow `import` before the path.
const IMPORT_KINDS: &[&str] = &[
    "typealias", "struct", "class", "enum", "protocol", "let", "var", "func",
];

/// Conditional compilation directives, skipped to the end of their line.
const CONDITIONAL_DIRECTIVES: &[&str] = &["#if", "#elseif", "#else", "#endif"];

/// Parser for Swift source code.
pub struct Parser<'src> {
    /// Source text (for slicing types and default values).
    source: &'src str,
    /// File the source came from (for error locations).
    file: &'src Path,
    /// Tokens without trivia; always ends with `Eof`.
    tokens: Vec<Token>,
    /// Index of the current token.
    pos: usize,
    /// Tree under construction.
    builder: TreeBuilder,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str, file: &'src Path) -> Self {
        let tokens = Lexer::tokenize_all(source)
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        Self {
            source,
            file,
            tokens,
            pos: 0,
            builder: TreeBuilder::new(),
        }
    }

    /// Parses the whole file.
    ///
    /// # Errors
    /// Returns an error for lexical errors and unbalanced brackets.
    pub fn parse(mut self) -> Result<SyntaxTree> {
        if let Some(token) = self
            .tokens
            .iter()
            .find(|t| matches!(t.kind, TokenKind::Error(_)))
        {
            let message = match &token.kind {
                TokenKind::Error(message) => message.clone(),
                _ => String::new(),
            };
            return Err(self.error_at(token.span, &message));
        }

        self.parse_members(NodeId::ROOT, None)?;
        self.builder
            .set_span(NodeId::ROOT, Span::new(0, self.source.len(), 1, 1));
        Ok(self.builder.finish())
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Parses declarations until end of input, or until the `}` matching
    /// `open` when parsing a body.
    fn parse_members(&mut self, parent: NodeId, open: Option<Span>) -> Result<()> {
        loop {
            match &self.current().kind {
                TokenKind::Eof => {
                    return match open {
                        Some(span) => Err(self.error_at(span, "unterminated '{'")),
                        None => Ok(()),
                    };
                }
                TokenKind::RBrace => {
                    if open.is_none() {
                        return Err(self.error("unexpected '}'"));
                    }
                    self.advance();
                    return Ok(());
                }
                TokenKind::Semicolon => self.advance(),
                TokenKind::Directive(name) if CONDITIONAL_DIRECTIVES.contains(&name.as_str()) => {
                    self.skip_line()?;
                }
                _ => self.parse_declaration(parent)?,
            }
        }
    }

    /// Parses one declaration with its attributes and modifiers.
    fn parse_declaration(&mut self, parent: NodeId) -> Result<()> {
        let start = self.current().span;
        let node = self.builder.push(parent, NodeKind::Other, start);

        self.parse_attributes(node)?;
        let modifiers = self.parse_modifiers();

        let keyword = match &self.current().kind {
            TokenKind::Identifier(word) => Some(word.clone()),
            _ => None,
        };
        let kind = match keyword.as_deref() {
            Some("import") => self.parse_import()?,
            Some("init") => self.parse_initializer(modifiers)?,
            Some(word) => match TypeKeyword::from_word(word) {
                Some(keyword) => self.parse_type_decl(node, keyword, modifiers)?,
                None => {
                    self.skip_other()?;
                    NodeKind::Other
                }
            },
            None => {
                self.skip_other()?;
                NodeKind::Other
            }
        };

        self.builder.set_kind(node, kind);
        self.builder.set_span(node, start.to(self.previous().span));
        Ok(())
    }

    /// Parses attributes, attaching each as a child of `node`.
    fn parse_attributes(&mut self, node: NodeId) -> Result<()> {
        while self.current().kind == TokenKind::At {
            let (attribute, span) = self.parse_attribute()?;
            self.builder.push(node, NodeKind::Attribute(attribute), span);
        }
        Ok(())
    }

    /// Parses one `@Name` or `@Name(arguments)` attribute.
    fn parse_attribute(&mut self) -> Result<(Attribute, Span)> {
        let start = self.current().span;
        self.advance(); // consume '@'

        let mut name = self.expect_identifier("attribute name after '@'")?;
        while self.current().kind == TokenKind::Dot
            && matches!(self.peek(1).kind, TokenKind::Identifier(_))
        {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_identifier("attribute name")?);
        }

        let mut arguments = Vec::new();
        if self.current().kind == TokenKind::LParen
            && self.current().span.start == self.previous().span.end
        {
            arguments = self.parse_attribute_arguments()?;
        }

        Ok((Attribute { name, arguments }, start.to(self.previous().span)))
    }

    /// Parses `(label: value, value, ...)` after an attribute name.
    fn parse_attribute_arguments(&mut self) -> Result<Vec<AttributeArgument>> {
        let open = self.current().span;
        self.advance(); // consume '('

        let mut arguments = Vec::new();
        loop {
            if self.current().kind == TokenKind::RParen {
                self.advance();
                return Ok(arguments);
            }

            let label = match (&self.current().kind, &self.peek(1).kind) {
                (TokenKind::Identifier(label), TokenKind::Colon) => Some(label.clone()),
                _ => None,
            };
            if label.is_some() {
                self.advance();
                self.advance();
            }

            // Generic arguments may contain commas: `exposeAs: Cache<K, V>.self`.
            let value = self.take_balanced(true, |t| t.kind == TokenKind::Comma)?;
            arguments.push(AttributeArgument { label, value });

            match self.current().kind {
                TokenKind::Comma => self.advance(),
                TokenKind::RParen => {}
                _ => return Err(self.error_at(open, "unterminated attribute arguments")),
            }
        }
    }

    /// Parses declaration modifiers such as `public`, `final` or `private(set)`.
    fn parse_modifiers(&mut self) -> Vec<String> {
        let mut modifiers = Vec::new();
        loop {
            let TokenKind::Identifier(word) = &self.current().kind else {
                break;
            };
            let next = &self.peek(1).kind;
            let is_modifier = if word == "class" {
                matches!(next, TokenKind::Identifier(n)
                    if DECLARATION_KEYWORDS.contains(&n.as_str()) || MODIFIERS.contains(&n.as_str()))
            } else {
                MODIFIERS.contains(&word.as_str())
                    && matches!(next, TokenKind::Identifier(_) | TokenKind::LParen)
            };
            if !is_modifier {
                break;
            }

            let mut modifier = word.clone();
            self.advance();
            if self.current().kind == TokenKind::LParen
                && self.current().span.start == self.previous().span.end
            {
                let start = self.current().span.start;
                if self.skip_group().is_err() {
                    break;
                }
                modifier.push_str(&self.source[start..self.previous().span.end]);
            }
            modifiers.push(modifier);
        }
        modifiers
    }

    /// Parses `import [kind] A.B.C`.
    fn parse_import(&mut self) -> Result<NodeKind> {
        self.advance(); // consume 'import'

        let kind = match (&self.current().kind, &self.peek(1).kind) {
            (TokenKind::Identifier(kind), TokenKind::Identifier(_))
                if IMPORT_KINDS.contains(&kind.as_str()) =>
            {
                Some(kind.clone())
            }
            _ => None,
        };
        if kind.is_some() {
            self.advance();
        }

        let mut path = vec![self.expect_identifier("module name after 'import'")?];
        while self.current().kind == TokenKind::Dot {
            self.advance();
            path.push(self.expect_identifier("module name")?);
        }

        Ok(NodeKind::Import(ImportDecl { kind, path }))
    }

    /// Parses a type declaration header and body; members become children
    /// of `node`.
    fn parse_type_decl(
        &mut self,
        node: NodeId,
        keyword: TypeKeyword,
        modifiers: Vec<String>,
    ) -> Result<NodeKind> {
        self.advance(); // consume keyword

        let mut name = self.expect_identifier("type name")?;
        while self.current().kind == TokenKind::Dot {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_identifier("type name")?);
        }

        let generic_parameters = if self.current().kind == TokenKind::Lt {
            self.parse_generic_parameters()?
        } else {
            Vec::new()
        };

        let mut inheritance = Vec::new();
        if self.current().kind == TokenKind::Colon {
            self.advance();
            inheritance = self.parse_list(|t| t.kind == TokenKind::LBrace || t.is_word("where"))?;
        }

        let mut where_requirements = Vec::new();
        if self.current().is_word("where") {
            self.advance();
            where_requirements = self.parse_list(|t| t.kind == TokenKind::LBrace)?;
        }

        if self.current().kind != TokenKind::LBrace {
            return Err(self.error(&format!(
                "expected '{{' to begin the body of '{name}', found {}",
                self.current().kind.name()
            )));
        }
        let open = self.current().span;
        self.advance();
        self.parse_members(node, Some(open))?;

        Ok(NodeKind::TypeDecl(TypeDecl {
            keyword,
            name,
            modifiers,
            generic_parameters,
            inheritance,
            where_requirements,
        }))
    }

    /// Parses `<T, U: P>`.
    fn parse_generic_parameters(&mut self) -> Result<Vec<GenericParameter>> {
        let open = self.current().span;
        self.advance(); // consume '<'

        let mut parameters = Vec::new();
        loop {
            if self.current().kind == TokenKind::Gt {
                self.advance();
                return Ok(parameters);
            }
            if self.current().is_word("each") {
                self.advance();
            }
            let name = self.expect_identifier("generic parameter name")?;
            let constraint = if self.current().kind == TokenKind::Colon {
                self.advance();
                Some(self.take_balanced(true, |t| {
                    matches!(t.kind, TokenKind::Comma | TokenKind::Gt)
                })?)
            } else {
                None
            };
            parameters.push(GenericParameter { name, constraint });

            match self.current().kind {
                TokenKind::Comma => self.advance(),
                TokenKind::Gt => {}
                _ => return Err(self.error_at(open, "unterminated generic parameter clause")),
            }
        }
    }

    /// Parses a comma-separated list of types or requirements ending before
    /// a token accepted by `end`.
    fn parse_list(&mut self, end: impl Fn(&Token) -> bool) -> Result<Vec<String>> {
        let mut items = Vec::new();
        loop {
            let item = self.take_balanced(true, |t| t.kind == TokenKind::Comma || end(t))?;
            if item.is_empty() {
                return Err(self.error("expected a type"));
            }
            items.push(item);
            if self.current().kind != TokenKind::Comma {
                return Ok(items);
            }
            self.advance();
        }
    }

    /// Parses an initializer: signature, effects and (optional) body.
    fn parse_initializer(&mut self, modifiers: Vec<String>) -> Result<NodeKind> {
        self.advance(); // consume 'init'

        let failability = match self.current().kind {
            TokenKind::Question => {
                self.advance();
                Failability::Optional
            }
            TokenKind::Bang => {
                self.advance();
                Failability::ImplicitlyUnwrapped
            }
            _ => Failability::None,
        };

        if self.current().kind == TokenKind::Lt {
            self.parse_generic_parameters()?;
        }

        if self.current().kind != TokenKind::LParen {
            return Err(self.error(&format!(
                "expected '(' after 'init', found {}",
                self.current().kind.name()
            )));
        }
        let parameters = self.parse_parameters()?;

        let mut is_async = false;
        let mut is_throwing = false;
        loop {
            let token = self.current();
            if token.is_word("async") || token.is_word("reasync") {
                is_async = true;
                self.advance();
            } else if token.is_word("throws") || token.is_word("rethrows") {
                is_throwing = true;
                self.advance();
                if self.current().kind == TokenKind::LParen {
                    self.skip_group()?;
                }
            } else {
                break;
            }
        }

        if self.current().is_word("where") {
            self.advance();
            self.parse_list(|t| t.kind == TokenKind::LBrace)?;
        }

        if self.current().kind == TokenKind::LBrace {
            self.skip_group()?;
        }

        Ok(NodeKind::Initializer(InitializerDecl {
            modifiers,
            failability,
            is_async,
            is_throwing,
            parameters,
        }))
    }

    /// Parses a parenthesised parameter clause.
    fn parse_parameters(&mut self) -> Result<Vec<Parameter>> {
        let open = self.current().span;
        self.advance(); // consume '('

        let mut parameters = Vec::new();
        loop {
            if self.current().kind == TokenKind::RParen {
                self.advance();
                return Ok(parameters);
            }

            let start = self.current().span;
            let mut attributes = Vec::new();
            while self.current().kind == TokenKind::At {
                let (attribute, _) = self.parse_attribute()?;
                attributes.push(attribute.name);
            }

            let label = self.expect_identifier("parameter name")?;
            let name = match &self.current().kind {
                TokenKind::Identifier(second) => {
                    let second = second.clone();
                    self.advance();
                    Some(second)
                }
                _ => None,
            };

            if self.current().kind != TokenKind::Colon {
                return Err(self.error(&format!(
                    "expected ':' after parameter '{label}', found {}",
                    self.current().kind.name()
                )));
            }
            self.advance();

            let type_text =
                self.take_balanced(true, |t| matches!(t.kind, TokenKind::Comma | TokenKind::Equals))?;
            if type_text.is_empty() {
                return Err(self.error(&format!("expected a type for parameter '{label}'")));
            }

            let default_value = if self.current().kind == TokenKind::Equals {
                self.advance();
                let value = self.take_balanced(false, |t| t.kind == TokenKind::Comma)?;
                if value.is_empty() {
                    return Err(self.error(&format!("expected a default value for '{label}'")));
                }
                Some(value)
            } else {
                None
            };

            parameters.push(Parameter {
                label,
                name,
                type_text,
                default_value,
                attributes,
                span: start.to(self.previous().span),
            });

            match self.current().kind {
                TokenKind::Comma => self.advance(),
                TokenKind::RParen => {}
                _ => return Err(self.error_at(open, "unterminated parameter clause")),
            }
        }
    }

    // =========================================================================
    // Skimming
    // =========================================================================

    /// Skips a declaration or statement the tree does not model.
    fn skip_other(&mut self) -> Result<()> {
        let mut stack = Vec::new();
        let mut consumed = false;
        loop {
            let token = self.current().clone();
            if stack.is_empty() {
                match token.kind {
                    TokenKind::Eof | TokenKind::RBrace => return Ok(()),
                    TokenKind::Semicolon => {
                        self.advance();
                        return Ok(());
                    }
                    _ if consumed && token.newline_before && starts_declaration(&token) => {
                        return Ok(());
                    }
                    _ => {}
                }
            }
            self.step(&mut stack, &token)?;
            consumed = true;
        }
    }

    /// Skips from an opening delimiter through its matching closer.
    fn skip_group(&mut self) -> Result<()> {
        let mut stack = Vec::new();
        loop {
            let token = self.current().clone();
            self.step(&mut stack, &token)?;
            if stack.is_empty() {
                return Ok(());
            }
        }
    }

    /// Skips a conditional compilation directive and the rest of its line.
    fn skip_line(&mut self) -> Result<()> {
        self.advance();
        while !self.current().newline_before && self.current().kind != TokenKind::Eof {
            if self.current().is_open_delimiter() {
                self.skip_group()?;
            } else {
                self.advance();
            }
        }
        Ok(())
    }

    /// Consumes a balanced run of tokens up to (not including) a token at
    /// nesting depth zero accepted by `stop`, or an unmatched closer, and
    /// returns the source text covered.
    ///
    /// With `angles`, `<` and `>` also nest, as they do inside types.
    fn take_balanced(&mut self, angles: bool, stop: impl Fn(&Token) -> bool) -> Result<String> {
        let first = self.pos;
        let mut stack = Vec::new();
        let mut angle_depth = 0usize;
        loop {
            let token = self.current().clone();
            if stack.is_empty() && angle_depth == 0 {
                if token.kind == TokenKind::Eof || token.is_close_delimiter() || stop(&token) {
                    break;
                }
            }
            if angles && stack.is_empty() {
                match token.kind {
                    TokenKind::Lt => angle_depth += 1,
                    TokenKind::Gt => angle_depth = angle_depth.saturating_sub(1),
                    _ => {}
                }
            }
            self.step(&mut stack, &token)?;
        }
        Ok(self.text_between(first, self.pos))
    }

    /// Consumes `token`, tracking open delimiters on `stack`.
    fn step(&mut self, stack: &mut Vec<Token>, token: &Token) -> Result<()> {
        if token.is_open_delimiter() {
            stack.push(token.clone());
        } else if token.is_close_delimiter() {
            let Some(open) = stack.pop() else {
                return Err(self.error(&format!("unexpected {}", token.kind.name())));
            };
            if !closes(&open.kind, &token.kind) {
                return Err(self.error(&format!(
                    "mismatched delimiter: {} at {}:{} closed by {}",
                    open.kind.name(),
                    open.span.line,
                    open.span.column,
                    token.kind.name()
                )));
            }
        } else if token.kind == TokenKind::Eof {
            let open = stack.last().map_or(token.span, |t| t.span);
            let name = stack.last().map_or("input", |t| t.kind.name());
            return Err(self.error_at(open, &format!("unterminated {name}")));
        }
        self.advance();
        Ok(())
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Returns the current token.
    fn current(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the token `n` positions ahead, or `Eof`.
    fn peek(&self, n: usize) -> &Token {
        let index = (self.pos + n).min(self.tokens.len().saturating_sub(1));
        &self.tokens[index]
    }

    /// Returns the most recently consumed token.
    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Advances to the next token, stopping at `Eof`.
    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Consumes an identifier and returns its text.
    fn expect_identifier(&mut self, what: &str) -> Result<String> {
        match &self.current().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(self.error(&format!("expected {what}, found {}", other.name()))),
        }
    }

    /// Returns the source text of tokens `first..end`, trimmed.
    fn text_between(&self, first: usize, end: usize) -> String {
        if end <= first {
            return String::new();
        }
        let start = self.tokens[first].span.start;
        let stop = self.tokens[end - 1].span.end;
        self.source[start..stop].trim().to_string()
    }

    /// Creates a parse error at the current position.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.current().span, message)
    }

    /// Creates a parse error at a specific span.
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::parse(message, span.located_in(self.file))
    }
}

/// Returns true if `token` can begin a declaration.
fn starts_declaration(token: &Token) -> bool {
    match &token.kind {
        TokenKind::At | TokenKind::Directive(_) => true,
        TokenKind::Identifier(word) => {
            DECLARATION_KEYWORDS.contains(&word.as_str()) || MODIFIERS.contains(&word.as_str())
        }
        _ => false,
    }
}

/// Returns true if `close` is the closing delimiter for `open`.
fn closes(open: &TokenKind, close: &TokenKind) -> bool {
    matches!(
        (open, close),
        (TokenKind::LParen, TokenKind::RParen)
            | (TokenKind::LBracket, TokenKind::RBracket)
            | (TokenKind::LBrace, TokenKind::RBrace)
    )
}

/// Parses a Swift source file into a syntax tree.
///
/// # Errors
/// Returns a structural error naming `file` if the source cannot be parsed.
pub fn parse_source(source: &str, file: &Path) -> Result<SyntaxTree> {
    let tree = Parser::new(source, file).parse()?;
    debug!(file = %file.display(), nodes = tree.len(), "parsed source file");
    Ok(tree)
}
