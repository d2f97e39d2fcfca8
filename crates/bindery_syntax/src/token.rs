//! Token types for the Swift subset.
//!
//! Tokens are the output of the lexer and input to the parser.

use bindery_foundation::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
    /// True if a line break separates this token from the previous one.
    pub newline_before: bool,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span, newline_before: bool) -> Self {
        Self {
            kind,
            span,
            newline_before,
        }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    /// Returns true if this token is the identifier or keyword `word`.
    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Identifier(name) if name == word)
    }

    /// Returns true if this token is a delimiter (opening paren, bracket, brace).
    #[must_use]
    pub const fn is_open_delimiter(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
        )
    }

    /// Returns true if this token is a closing delimiter.
    #[must_use]
    pub const fn is_close_delimiter(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        )
    }
}

/// Token types for the Swift subset.
///
/// Keywords are lexed as identifiers; the parser gives them meaning by
/// position, the way Swift's contextual keywords work.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `<`
    Lt,
    /// `>`
    Gt,

    // Punctuation
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `.`
    Dot,
    /// `@`
    At,
    /// `?`
    Question,
    /// `!`
    Bang,
    /// `=`
    Equals,
    /// `->`
    Arrow,
    /// Any other operator character, such as `+`, `&` or `~`
    Operator(char),

    // Words and literals
    /// Identifier or keyword, backticks removed
    Identifier(String),
    /// Compiler directive like `#if` or `#selector`
    Directive(String),
    /// String literal (contents are not interpreted)
    StringLiteral,
    /// Numeric literal
    Number,

    // Meta
    /// Comment text
    Comment(String),
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns true if this token kind should be ignored during parsing.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Lt => "'<'",
            Self::Gt => "'>'",
            Self::Comma => "','",
            Self::Colon => "':'",
            Self::Semicolon => "';'",
            Self::Dot => "'.'",
            Self::At => "'@'",
            Self::Question => "'?'",
            Self::Bang => "'!'",
            Self::Equals => "'='",
            Self::Arrow => "'->'",
            Self::Operator(_) => "operator",
            Self::Identifier(_) => "identifier",
            Self::Directive(_) => "directive",
            Self::StringLiteral => "string",
            Self::Number => "number",
            Self::Comment(_) => "comment",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }
}
