use crate::language::span::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Lower- or mixed-case name: `x`, `printString`.
    Identifier(String),
    /// Keyword part including its colon: `at:`.
    Keyword(String),
    /// All upper-case name: `SELF`, `PUBLIC`.
    ReifierIdentifier(String),
    /// All upper-case keyword part: `VARIABLE:`.
    ReifierKeyword(String),
    Operator(String),
    Integer(i64),
    Float(f64),
    String(String),
    Character(char),

    True,
    False,
    Null,
    Super,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semi,

    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier(name) => format!("identifier `{name}`"),
            TokenKind::Keyword(part) => format!("keyword `{part}`"),
            TokenKind::ReifierIdentifier(name) => format!("reifier `{name}`"),
            TokenKind::ReifierKeyword(part) => format!("reifier keyword `{part}`"),
            TokenKind::Operator(symbol) => format!("operator `{symbol}`"),
            TokenKind::Integer(value) => format!("integer `{value}`"),
            TokenKind::Float(value) => format!("float `{value}`"),
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::Character(_) => "character literal".to_string(),
            TokenKind::True => "`true`".to_string(),
            TokenKind::False => "`false`".to_string(),
            TokenKind::Null => "`null`".to_string(),
            TokenKind::Super => "`SUPER`".to_string(),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBrace => "`{`".to_string(),
            TokenKind::RBrace => "`}`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Semi => "`;`".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A name is a reifier name when it has at least one letter and no lower-case
/// letters.
pub fn is_reifier_name(name: &str) -> bool {
    name.chars().any(|ch| ch.is_ascii_alphabetic())
        && !name.chars().any(|ch| ch.is_ascii_lowercase())
}
