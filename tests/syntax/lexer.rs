//! Integration tests for the lexer
//!
//! Tests tokenization of Swift source code.

use bindery_syntax::{Lexer, TokenKind};

fn significant(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize_all(source)
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_trivia())
        .collect()
}

#[test]
fn annotated_declaration() {
    let kinds = significant("@Singleton final class Logger {}");
    assert_eq!(kinds.len(), 7); // 6 tokens + eof
    assert_eq!(kinds[0], TokenKind::At);
    assert_eq!(kinds[1], TokenKind::Identifier("Singleton".into()));
    assert_eq!(kinds[6], TokenKind::Eof);
}

#[test]
fn comments_are_kept_as_trivia() {
    let tokens = Lexer::tokenize_all("// header\nstruct A {}");
    assert!(matches!(tokens[0].kind, TokenKind::Comment(_)));
    assert!(tokens[0].kind.is_trivia());
    assert!(tokens[1].newline_before);
}

#[test]
fn interpolation_does_not_leak_tokens() {
    let kinds = significant(r#"let s = "\(a + "}")" ; struct"#);
    assert!(kinds.contains(&TokenKind::StringLiteral));
    assert!(!kinds.contains(&TokenKind::RBrace));
    assert!(kinds.contains(&TokenKind::Identifier("struct".into())));
}

#[test]
fn default_value_tokens() {
    let kinds = significant("title: String = \"Home\", count: Int = -1");
    assert!(kinds.contains(&TokenKind::Equals));
    assert!(kinds.contains(&TokenKind::Number));
    assert!(kinds.contains(&TokenKind::Operator('-')));
}
