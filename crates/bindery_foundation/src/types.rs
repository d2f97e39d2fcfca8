//! Structurally comparable type references.
//!
//! Types are never resolved semantically. A [`TypeRef`] keeps the text of a
//! type as written in source, canonicalised so that two spellings which only
//! differ in whitespace compare equal:
//!
//! ```
//! use bindery_foundation::TypeRef;
//!
//! assert_eq!(TypeRef::parse("[ String :Int ]"), TypeRef::parse("[String: Int]"));
//! assert_eq!(TypeRef::parse("Logger ?").as_str(), "Logger?");
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Words that qualify a type without naming it.
const QUALIFIERS: &[&str] = &["some", "any", "inout", "borrowing", "consuming", "isolated"];

/// A type reference in canonical textual form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeRef(String);

/// One lexical piece of a type.
#[derive(Debug, Clone, PartialEq)]
enum Piece<'a> {
    Word(&'a str),
    Arrow,
    Punct(char),
}

impl Piece<'_> {
    fn is_word(&self) -> bool {
        matches!(self, Piece::Word(_))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '`' | '@')
}

fn pieces(text: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if is_word_char(c) {
            let mut end = start + c.len_utf8();
            while let Some(&(i, next)) = chars.peek() {
                if is_word_char(next) && next != '@' {
                    end = i + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            out.push(Piece::Word(&text[start..end]));
        } else if c == '-' && chars.peek().is_some_and(|&(_, n)| n == '>') {
            chars.next();
            out.push(Piece::Arrow);
        } else {
            out.push(Piece::Punct(c));
        }
    }
    out
}

fn separator(prev: &Piece<'_>, next: &Piece<'_>) -> &'static str {
    match (prev, next) {
        (Piece::Arrow, _) | (_, Piece::Arrow) => " ",
        (Piece::Punct('&'), _) | (_, Piece::Punct('&')) => " ",
        (Piece::Punct(',' | ':'), _) => " ",
        (Piece::Word(w), Piece::Punct('(')) if w.starts_with('@') => " ",
        (a, b) if a.is_word() && b.is_word() => " ",
        _ => "",
    }
}

fn canonicalize(text: &str) -> String {
    let pieces = pieces(text);
    let mut out = String::with_capacity(text.len());
    for (i, piece) in pieces.iter().enumerate() {
        if i > 0 {
            out.push_str(separator(&pieces[i - 1], piece));
        }
        match piece {
            Piece::Word(w) => out.push_str(w),
            Piece::Arrow => out.push_str("->"),
            Piece::Punct(c) => out.push(*c),
        }
    }
    out
}

impl TypeRef {
    /// Parses a type as written in source.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self(canonicalize(text))
    }

    /// Returns the canonical text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the underlying simple identifier.
    ///
    /// Qualifiers, brackets and optionality are skipped, generic arguments
    /// are ignored and module paths are reduced to their last segment:
    /// `Foo?`, `[Foo]`, `some Foo` and `Mod.Foo<T>` all yield `Foo`.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        let pieces = pieces(&self.0);
        let mut iter = pieces.iter().peekable();
        let mut name = "";
        while let Some(piece) = iter.next() {
            match piece {
                Piece::Word(w) if w.starts_with('@') || QUALIFIERS.contains(w) => {}
                Piece::Word(w) => {
                    name = *w;
                    while iter.peek() == Some(&&Piece::Punct('.')) {
                        iter.next();
                        match iter.next() {
                            Some(Piece::Word(next)) => name = *next,
                            _ => break,
                        }
                    }
                    break;
                }
                _ => {}
            }
        }
        name.trim_matches('`')
    }

    /// Returns true for `T?`, `T!` and `Optional<T>`.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.0.ends_with('?') || self.0.ends_with('!') || self.0.starts_with("Optional<")
    }

    /// Returns true for opaque `some P` types.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.0.starts_with("some ")
    }

    /// Returns true when the type contains a space outside brackets, so it
    /// must be parenthesised before a postfix `?` can be applied.
    fn is_compound(&self) -> bool {
        let mut depth = 0i32;
        for c in self.0.chars() {
            match c {
                '(' | '[' | '<' => depth += 1,
                ')' | ']' | '>' => depth -= 1,
                ' ' if depth == 0 => return true,
                _ => {}
            }
        }
        false
    }

    /// Wraps this type in `Optional` once.
    #[must_use]
    pub fn optional(&self) -> Self {
        if self.is_compound() {
            Self(format!("({})?", self.0))
        } else {
            Self(format!("{}?", self.0))
        }
    }

    /// Removes one level of `Optional`, if present.
    #[must_use]
    pub fn unwrapped(&self) -> Self {
        if let Some(inner) = self.0.strip_prefix("Optional<").and_then(|s| s.strip_suffix('>')) {
            return Self(inner.to_string());
        }
        match self.0.strip_suffix('?').or_else(|| self.0.strip_suffix('!')) {
            Some(inner) => {
                let inner = strip_enclosing_parens(inner);
                Self(inner.to_string())
            }
            None => self.clone(),
        }
    }

    /// Returns true if a value of this type can be handed to the container
    /// from outside and stored in a field.
    ///
    /// Opaque types and `Self` cannot be named by a caller; names listed in
    /// `placeholders` are open generic parameters of the requiring type.
    #[must_use]
    pub fn is_injectable_from_outside(&self, placeholders: &[String]) -> bool {
        if self.is_opaque() || self.0 == "Self" || self.0.is_empty() {
            return false;
        }
        !placeholders.iter().any(|p| p == &self.0)
    }
}

/// Removes one pair of parentheses if they enclose the whole text.
fn strip_enclosing_parens(text: &str) -> &str {
    let Some(inner) = text.strip_prefix('(').and_then(|s| s.strip_suffix(')')) else {
        return text;
    };
    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return text;
                }
            }
            // A tuple is not a grouping.
            ',' if depth == 0 => return text,
            _ => {}
        }
    }
    inner
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

/// Lowercases the first character only: `Logger` becomes `logger`.
#[must_use]
pub fn lowercasing_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
