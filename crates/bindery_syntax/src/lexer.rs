//! Lexer for the Swift subset.
//!
//! The lexer converts source text into a stream of tokens. It understands
//! enough of Swift's lexical grammar (nested block comments, multi-line,
//! raw and interpolated strings, backticked identifiers) that the parser
//! never mistakes the contents of a literal or comment for structure.

use bindery_foundation::Span;

use crate::token::{Token, TokenKind};

/// Lexer for Swift source code.
pub struct Lexer<'src> {
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
    /// A line break was crossed since the last non-trivia token.
    newline_pending: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            position: 0,
            line: 1,
            column: 1,
            newline_pending: false,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;
        let newline_before = self.newline_pending;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, start_line, start_column),
                newline_before,
            );
        };

        let kind = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '<' => self.single(TokenKind::Lt),
            '>' => self.single(TokenKind::Gt),
            ',' => self.single(TokenKind::Comma),
            ':' => self.single(TokenKind::Colon),
            ';' => self.single(TokenKind::Semicolon),
            '.' => self.single(TokenKind::Dot),
            '@' => self.single(TokenKind::At),
            '?' => self.single(TokenKind::Question),
            '!' => self.single(TokenKind::Bang),
            '=' => self.single(TokenKind::Equals),
            '/' if self.peek_char_n(1) == Some('/') => self.scan_line_comment(),
            '/' if self.peek_char_n(1) == Some('*') => self.scan_block_comment(),
            '-' if self.peek_char_n(1) == Some('>') => {
                self.advance();
                self.single(TokenKind::Arrow)
            }
            '"' => self.scan_string(0),
            '#' => self.scan_hash(),
            '`' => self.scan_backticked(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            c if is_operator_char(c) => self.single(TokenKind::Operator(c)),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        };

        if !kind.is_trivia() {
            self.newline_pending = false;
        }

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column),
            newline_before,
        )
    }

    /// Tokenizes all source and returns a vector of tokens.
    ///
    /// Comments are included in the output.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks at the character `n` positions ahead.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
                self.newline_pending = true;
            } else {
                self.column += 1;
            }
        }
    }

    /// Advances past `n` characters.
    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Consumes one character and yields `kind`.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Scans a comment starting with `//`.
    fn scan_line_comment(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        TokenKind::Comment(text)
    }

    /// Scans a comment starting with `/*`. Block comments nest.
    fn scan_block_comment(&mut self) -> TokenKind {
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            if self.rest.starts_with("/*") {
                depth += 1;
                text.push_str("/*");
                self.advance_n(2);
            } else if self.rest.starts_with("*/") {
                depth -= 1;
                text.push_str("*/");
                self.advance_n(2);
                if depth == 0 {
                    return TokenKind::Comment(text);
                }
            } else if let Some(c) = self.peek_char() {
                text.push(c);
                self.advance();
            } else {
                return TokenKind::Error("unterminated block comment".into());
            }
        }
    }

    /// Scans a string literal whose opening quote is the next character.
    ///
    /// `hashes` is the number of `#` characters that opened a raw string;
    /// they have already been consumed.
    fn scan_string(&mut self, hashes: usize) -> TokenKind {
        let multiline = self.rest.starts_with("\"\"\"");
        let quotes = if multiline { 3 } else { 1 };
        self.advance_n(quotes);
        let closing = format!("{}{}", "\"".repeat(quotes), "#".repeat(hashes));
        let escape_hashes = "#".repeat(hashes);

        loop {
            match self.peek_char() {
                None => return TokenKind::Error("unterminated string literal".into()),
                Some('\n') if !multiline => {
                    return TokenKind::Error("unterminated string literal".into());
                }
                Some('\\') => {
                    self.advance();
                    if !self.rest.starts_with(escape_hashes.as_str()) {
                        continue;
                    }
                    self.advance_n(hashes);
                    match self.peek_char() {
                        Some('(') => {
                            self.advance();
                            if let Err(message) = self.scan_interpolation() {
                                return TokenKind::Error(message);
                            }
                        }
                        Some(_) => self.advance(),
                        None => {
                            return TokenKind::Error(
                                "unexpected end of input in string escape".into(),
                            );
                        }
                    }
                }
                Some('"') if self.rest.starts_with(closing.as_str()) => {
                    self.advance_n(closing.len());
                    return TokenKind::StringLiteral;
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// Scans the body of `\( ... )` up to and including its closing paren.
    fn scan_interpolation(&mut self) -> Result<(), String> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek_char() {
                None => return Err("unterminated string interpolation".into()),
                Some('(') => {
                    depth += 1;
                    self.advance();
                }
                Some(')') => {
                    depth -= 1;
                    self.advance();
                }
                Some('"') => {
                    if let TokenKind::Error(message) = self.scan_string(0) {
                        return Err(message);
                    }
                }
                Some(_) => self.advance(),
            }
        }
        Ok(())
    }

    /// Scans tokens starting with `#`: raw strings and directives.
    fn scan_hash(&mut self) -> TokenKind {
        let hashes = self.rest.chars().take_while(|&c| c == '#').count();
        if self.peek_char_n(hashes) == Some('"') {
            self.advance_n(hashes);
            return self.scan_string(hashes);
        }
        self.advance();
        match self.peek_char() {
            Some(c) if is_identifier_start(c) => {
                let name = self.scan_identifier_text();
                TokenKind::Directive(format!("#{name}"))
            }
            _ => TokenKind::Operator('#'),
        }
    }

    /// Scans an identifier wrapped in backticks.
    fn scan_backticked(&mut self) -> TokenKind {
        self.advance(); // consume opening '`'
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('`') => {
                    self.advance();
                    return TokenKind::Identifier(text);
                }
                Some('\n') | None => {
                    return TokenKind::Error("unterminated backticked identifier".into());
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }
    }

    /// Scans a numeric literal, including `_` separators and fractions.
    fn scan_number(&mut self) -> TokenKind {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else if c == '.' && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Number
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> TokenKind {
        TokenKind::Identifier(self.scan_identifier_text())
    }

    /// Scans identifier text.
    fn scan_identifier_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if is_identifier_continue(c) {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        text
    }
}

/// Returns true if the character can start an identifier.
fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Returns true if the character can continue an identifier.
fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Returns true for operator characters without a dedicated token.
fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '~' | '\\')
}
