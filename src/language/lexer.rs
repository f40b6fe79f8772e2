use crate::language::{
    span::Span,
    token::{is_reifier_name, Token, TokenKind},
};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit1, one_of},
    combinator::{opt, recognize},
    multi::{many0_count, many1_count},
    sequence::{pair, tuple},
    IResult, Parser as NomParser,
};

const OPERATOR_CHARS: &str = "+-*/%<>=~&|!?@\\^";

#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

pub fn lex(source: &str) -> Result<Vec<Token>, Vec<LexError>> {
    let lexer = Lexer::new(source);
    lexer.run()
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        digit1,
        opt(pair(char('.'), digit1)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))
    .parse(input)
}

fn operator(input: &str) -> IResult<&str, &str> {
    recognize(many1_count(one_of(OPERATOR_CHARS))).parse(input)
}

struct Lexer<'a> {
    src: &'a str,
    offset: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            offset: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, Vec<LexError>> {
        while let Some(ch) = self.current() {
            match ch {
                '/' if self.peek() == Some('/') => self.eat_line_comment(),
                '/' if self.peek() == Some('*') => self.eat_block_comment(),
                ch if ch.is_whitespace() => {
                    self.bump();
                }
                ch if ch.is_ascii_alphabetic() || ch == '_' => self.lex_word(),
                ch if ch.is_ascii_digit() => self.lex_number(),
                '"' => self.lex_string(),
                '\'' => self.lex_character(),
                ch if OPERATOR_CHARS.contains(ch) => self.lex_operator(),
                _ => self.lex_punctuation(),
            }
        }
        self.push_token(TokenKind::Eof, self.offset, self.offset);

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.offset..]
    }

    fn current(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.current()?;
        self.offset += ch.len_utf8();
        Some(ch)
    }

    fn push_token(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            span: Span::new(start, end),
        });
    }

    fn error(&mut self, start: usize, end: usize, message: impl Into<String>) {
        self.errors.push(LexError {
            message: message.into(),
            span: Span::new(start, end),
        });
    }

    fn eat_line_comment(&mut self) {
        while let Some(ch) = self.current() {
            if ch == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn eat_block_comment(&mut self) {
        let start = self.offset;
        self.bump();
        self.bump();
        while let Some(ch) = self.current() {
            if ch == '*' && self.peek() == Some('/') {
                self.bump();
                self.bump();
                return;
            }
            self.bump();
        }
        self.error(start, self.offset, "Unterminated block comment");
    }

    fn lex_word(&mut self) {
        let start = self.offset;
        let Ok((rest, word)) = identifier(self.rest()) else {
            self.bump();
            self.error(start, self.offset, "Invalid identifier");
            return;
        };
        self.offset = self.src.len() - rest.len();
        let is_keyword = rest.starts_with(':') && !rest.starts_with(":=");
        if is_keyword {
            self.bump();
        }
        let end = self.offset;
        let kind = match (word, is_keyword) {
            ("true", false) => TokenKind::True,
            ("false", false) => TokenKind::False,
            ("null", false) => TokenKind::Null,
            ("SUPER", false) => TokenKind::Super,
            (word, true) if is_reifier_name(word) => TokenKind::ReifierKeyword(format!("{word}:")),
            (word, true) => TokenKind::Keyword(format!("{word}:")),
            (word, false) if is_reifier_name(word) => TokenKind::ReifierIdentifier(word.to_string()),
            (word, false) => TokenKind::Identifier(word.to_string()),
        };
        self.push_token(kind, start, end);
    }

    fn lex_number(&mut self) {
        let start = self.offset;
        let Ok((rest, text)) = number(self.rest()) else {
            self.bump();
            self.error(start, self.offset, "Invalid number literal");
            return;
        };
        self.offset = self.src.len() - rest.len();
        let end = self.offset;
        if text.contains(['.', 'e', 'E']) {
            match text.parse::<f64>() {
                Ok(value) => self.push_token(TokenKind::Float(value), start, end),
                Err(_) => self.error(start, end, "Invalid float literal"),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => self.push_token(TokenKind::Integer(value), start, end),
                Err(_) => self.error(start, end, "Integer literal out of range"),
            }
        }
    }

    fn lex_operator(&mut self) {
        let start = self.offset;
        let Ok((rest, symbol)) = operator(self.rest()) else {
            self.bump();
            self.error(start, self.offset, "Invalid operator");
            return;
        };
        self.offset = self.src.len() - rest.len();
        self.push_token(TokenKind::Operator(symbol.to_string()), start, self.offset);
    }

    fn escape(&mut self, quote: char) -> Option<char> {
        let escaped = self.bump()?;
        Some(match escaped {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '\\' => '\\',
            '0' => '\0',
            other if other == quote => quote,
            other => other,
        })
    }

    fn lex_string(&mut self) {
        let start = self.offset;
        self.bump();
        let mut value = String::new();
        while let Some(ch) = self.bump() {
            match ch {
                '"' => {
                    self.push_token(TokenKind::String(value), start, self.offset);
                    return;
                }
                '\\' => match self.escape('"') {
                    Some(escaped) => value.push(escaped),
                    None => break,
                },
                _ => value.push(ch),
            }
        }
        self.error(start, self.offset, "Unterminated string literal");
    }

    fn lex_character(&mut self) {
        let start = self.offset;
        self.bump();
        let value = match self.bump() {
            Some('\\') => self.escape('\''),
            other => other,
        };
        let Some(value) = value else {
            self.error(start, self.offset, "Unterminated character literal");
            return;
        };
        if self.current() != Some('\'') {
            self.error(start, self.offset, "Unterminated character literal");
            return;
        }
        self.bump();
        self.push_token(TokenKind::Character(value), start, self.offset);
    }

    fn lex_punctuation(&mut self) {
        let start = self.offset;
        let Some(ch) = self.bump() else {
            return;
        };
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semi,
            other => {
                self.error(start, self.offset, format!("Unexpected character '{other}'"));
                return;
            }
        };
        self.push_token(kind, start, self.offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .expect("lexes")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn distinguishes_reifier_names_from_ordinary_names() {
        assert_eq!(
            kinds("x PUBLIC VARIABLE: 3"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::ReifierIdentifier("PUBLIC".into()),
                TokenKind::ReifierKeyword("VARIABLE:".into()),
                TokenKind::Integer(3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_operators_and_literals() {
        assert_eq!(
            kinds("t at: 1 put: 'c' <= 2.5e1 \"a\\n\" null SUPER"),
            vec![
                TokenKind::Identifier("t".into()),
                TokenKind::Keyword("at:".into()),
                TokenKind::Integer(1),
                TokenKind::Keyword("put:".into()),
                TokenKind::Character('c'),
                TokenKind::Operator("<=".into()),
                TokenKind::Float(25.0),
                TokenKind::String("a\n".into()),
                TokenKind::Null,
                TokenKind::Super,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_comments() {
        assert_eq!(
            kinds("// line\n x /* block */ ; y"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Semi,
                TokenKind::Identifier("y".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn spans_cover_the_lexeme() {
        let tokens = lex("abc VARIABLE: 12").unwrap();
        assert_eq!(tokens[1].span, Span::new(4, 13));
        assert_eq!(tokens[2].span, Span::new(14, 16));
    }

    #[test]
    fn reports_unterminated_literals() {
        let errors = lex("\"open").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unterminated string literal");
        assert!(lex("/* never closed").is_err());
        assert!(lex("x # y").is_err());
    }
}
