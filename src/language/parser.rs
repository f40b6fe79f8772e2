use crate::language::{
    ast::{Expression, Literal, Receiver},
    errors::{SyntaxError, SyntaxErrors},
    lexer::lex,
    span::Span,
    token::{Token, TokenKind},
};
use crate::runtime::pattern::Pattern;
use std::rc::Rc;

/// Reads a whole program: `;`-separated statements, evaluated as one
/// sequence.
pub fn parse_program(source: &str) -> Result<Rc<Expression>, SyntaxErrors> {
    let tokens = match lex(source) {
        Ok(tokens) => tokens,
        Err(errors) => {
            let errs = errors
                .into_iter()
                .map(|err| SyntaxError::new(err.message, err.span))
                .collect();
            return Err(SyntaxErrors::new(errs));
        }
    };
    Parser::new(tokens).parse()
}

/// Result of parsing one operand. `SUPER` is only meaningful as the receiver
/// of a message, so it is carried separately until a message consumes it.
enum Operand {
    Expression(Rc<Expression>),
    Super(Span),
}

impl Operand {
    fn into_receiver(self) -> Receiver {
        match self {
            Operand::Expression(expression) => Receiver::Expression(expression),
            Operand::Super(_) => Receiver::Super,
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<SyntaxError>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Rc<Expression>, SyntaxErrors> {
        let mut statements = Vec::new();
        while !self.is_eof() {
            if self.matches(&TokenKind::Semi) {
                continue;
            }
            match self.parse_statement() {
                Ok(statement) => {
                    statements.push(statement);
                    if !self.is_eof() && !self.matches(&TokenKind::Semi) {
                        let err = self
                            .error_here("Expected `;` between statements")
                            .with_help("separate statements with `;`");
                        self.report(err);
                        self.synchronize();
                    }
                }
                Err(err) => {
                    self.report(err);
                    self.synchronize();
                }
            }
        }

        if self.errors.is_empty() {
            Ok(Rc::new(Expression::Sequence(statements)))
        } else {
            Err(SyntaxErrors::new(self.errors))
        }
    }

    /// statement := [postfix] REIFIER_KEYWORD argument (REIFIER_KEYWORD argument)*
    ///            | postfix
    fn parse_statement(&mut self) -> Result<Rc<Expression>, SyntaxError> {
        let receiver = if matches!(self.peek_kind(), Some(TokenKind::ReifierKeyword(_))) {
            None
        } else {
            Some(self.parse_postfix()?)
        };
        if !matches!(self.peek_kind(), Some(TokenKind::ReifierKeyword(_))) {
            return match receiver {
                Some(operand) => self.finish(operand),
                None => Err(self.error_here("Expected an expression")),
            };
        }
        let mut parts = Vec::new();
        let mut arguments = Vec::new();
        while let Some(TokenKind::ReifierKeyword(part)) = self.peek_kind() {
            self.advance();
            parts.push(part);
            let argument = self.parse_postfix()?;
            arguments.push(self.finish(argument)?);
        }
        let receiver = match receiver {
            None => Receiver::Implicit,
            Some(operand) => operand.into_receiver(),
        };
        Ok(Rc::new(Expression::message(
            receiver,
            Pattern::keyword(parts).reifying(),
            arguments,
        )))
    }

    /// postfix := keyword REIFIER_IDENTIFIER*
    fn parse_postfix(&mut self) -> Result<Operand, SyntaxError> {
        let mut operand = self.parse_keyword()?;
        while let Some(TokenKind::ReifierIdentifier(name)) = self.peek_kind() {
            self.advance();
            operand = Operand::Expression(Rc::new(Expression::message(
                operand.into_receiver(),
                Pattern::unary(name).reifying(),
                Vec::new(),
            )));
        }
        Ok(operand)
    }

    /// keyword := [operator] (KEYWORD operator)+ | operator
    fn parse_keyword(&mut self) -> Result<Operand, SyntaxError> {
        let receiver = if matches!(self.peek_kind(), Some(TokenKind::Keyword(_))) {
            None
        } else {
            Some(self.parse_operator()?)
        };
        if !matches!(self.peek_kind(), Some(TokenKind::Keyword(_))) {
            return receiver.ok_or_else(|| self.error_here("Expected an expression"));
        }
        let mut parts = Vec::new();
        let mut arguments = Vec::new();
        while let Some(TokenKind::Keyword(part)) = self.peek_kind() {
            self.advance();
            parts.push(part);
            let argument = self.parse_operator()?;
            arguments.push(self.finish(argument)?);
        }
        let receiver = receiver.map_or(Receiver::Implicit, Operand::into_receiver);
        Ok(Operand::Expression(Rc::new(Expression::message(
            receiver,
            Pattern::keyword(parts),
            arguments,
        ))))
    }

    /// operator := [unary] (OPERATOR unary)+ | unary
    fn parse_operator(&mut self) -> Result<Operand, SyntaxError> {
        let mut operand = if self.at_receiverless_operator() {
            None
        } else {
            Some(self.parse_unary()?)
        };
        while let Some(TokenKind::Operator(symbol)) = self.peek_kind() {
            self.advance();
            let argument = self.parse_unary()?;
            let argument = self.finish(argument)?;
            let receiver = operand.map_or(Receiver::Implicit, Operand::into_receiver);
            operand = Some(Operand::Expression(Rc::new(Expression::message(
                receiver,
                Pattern::operator(symbol),
                vec![argument],
            ))));
        }
        operand.ok_or_else(|| self.error_here("Expected an expression"))
    }

    /// unary := primary IDENTIFIER*
    fn parse_unary(&mut self) -> Result<Operand, SyntaxError> {
        let mut operand = self.parse_primary()?;
        while let Some(TokenKind::Identifier(name)) = self.peek_kind() {
            self.advance();
            operand = Operand::Expression(Rc::new(Expression::message(
                operand.into_receiver(),
                Pattern::unary(name),
                Vec::new(),
            )));
        }
        Ok(operand)
    }

    fn parse_primary(&mut self) -> Result<Operand, SyntaxError> {
        let token = self.peek().clone();
        let literal = |literal: Literal| Ok(Operand::Expression(Rc::new(Expression::Literal(literal))));
        match token.kind {
            TokenKind::Integer(value) => {
                self.advance();
                literal(Literal::Integer(value))
            }
            TokenKind::Float(value) => {
                self.advance();
                literal(Literal::Float(value))
            }
            TokenKind::String(value) => {
                self.advance();
                literal(Literal::Text(value.into()))
            }
            TokenKind::Character(value) => {
                self.advance();
                literal(Literal::Character(value))
            }
            TokenKind::True => {
                self.advance();
                literal(Literal::Boolean(true))
            }
            TokenKind::False => {
                self.advance();
                literal(Literal::Boolean(false))
            }
            TokenKind::Null => {
                self.advance();
                literal(Literal::Null)
            }
            TokenKind::Operator(symbol) if symbol == "-" => self.parse_negative(token.span),
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Operand::Expression(Rc::new(Expression::message(
                    Receiver::Implicit,
                    Pattern::unary(name),
                    Vec::new(),
                ))))
            }
            TokenKind::ReifierIdentifier(name) => {
                self.advance();
                Ok(Operand::Expression(Rc::new(Expression::message(
                    Receiver::Implicit,
                    Pattern::unary(name).reifying(),
                    Vec::new(),
                ))))
            }
            TokenKind::Super => {
                self.advance();
                Ok(Operand::Super(token.span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_statement()?;
                self.expect(&TokenKind::RParen)?;
                Ok(Operand::Expression(inner))
            }
            TokenKind::LBrace => {
                self.advance();
                let statements = self.parse_delimited(&TokenKind::Semi, &TokenKind::RBrace)?;
                Ok(Operand::Expression(Rc::new(Expression::Sequence(statements))))
            }
            TokenKind::LBracket => {
                self.advance();
                let items = self.parse_delimited(&TokenKind::Comma, &TokenKind::RBracket)?;
                Ok(Operand::Expression(Rc::new(Expression::Table(items))))
            }
            other => Err(self.error_here(&format!("Unexpected {}", other.describe()))),
        }
    }

    /// `-` directly followed by a number literal is a negative literal.
    fn parse_negative(&mut self, minus: Span) -> Result<Operand, SyntaxError> {
        let next = self.peek_n(1).clone();
        if next.span.start != minus.end {
            return Err(self.error_here("Expected an expression"));
        }
        let literal = match next.kind {
            TokenKind::Integer(value) => Literal::Integer(-value),
            TokenKind::Float(value) => Literal::Float(-value),
            _ => return Err(self.error_here("Expected an expression")),
        };
        self.advance();
        self.advance();
        Ok(Operand::Expression(Rc::new(Expression::Literal(literal))))
    }

    fn parse_delimited(
        &mut self,
        separator: &TokenKind,
        close: &TokenKind,
    ) -> Result<Vec<Rc<Expression>>, SyntaxError> {
        let mut items = Vec::new();
        loop {
            while self.matches(separator) {}
            if self.matches(close) {
                return Ok(items);
            }
            if self.is_eof() {
                return Err(self.error_here(&format!("Expected {}", close.describe())));
            }
            items.push(self.parse_statement()?);
            if !self.check(close) && !self.check(separator) {
                return Err(self.error_here(&format!(
                    "Expected {} or {}",
                    separator.describe(),
                    close.describe()
                )));
            }
        }
    }

    /// A bare `SUPER` never stands for a value.
    fn finish(&self, operand: Operand) -> Result<Rc<Expression>, SyntaxError> {
        match operand {
            Operand::Expression(expression) => Ok(expression),
            Operand::Super(span) => Err(SyntaxError::new("`SUPER` must be followed by a message", span)
                .with_help("write `SUPER selector` to reach the parent's definition")),
        }
    }

    /// An operator in operand position is a receiverless operator send,
    /// unless it is the sign of a negative literal.
    fn at_receiverless_operator(&self) -> bool {
        let Some(TokenKind::Operator(symbol)) = self.peek_kind() else {
            return false;
        };
        let next = self.peek_n(1);
        let signed_number = symbol == "-"
            && next.span.start == self.peek().span.end
            && matches!(next.kind, TokenKind::Integer(_) | TokenKind::Float(_));
        !signed_number
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(&format!(
                "Expected {}, found {}",
                kind.describe(),
                self.peek().kind.describe()
            )))
        }
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn peek(&self) -> &Token {
        self.peek_n(0)
    }

    fn peek_n(&self, n: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + n).min(last)]
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind.clone())
    }

    fn advance(&mut self) -> &Token {
        let idx = self.pos.min(self.tokens.len().saturating_sub(1));
        self.pos = (self.pos + 1).min(self.tokens.len());
        &self.tokens[idx]
    }

    fn is_eof(&self) -> bool {
        matches!(self.peek_kind(), Some(TokenKind::Eof) | None)
    }

    fn error_here(&self, message: &str) -> SyntaxError {
        SyntaxError::new(message.to_string(), self.peek().span)
    }

    fn report(&mut self, err: SyntaxError) {
        self.errors.push(err);
    }

    /// Skips to the next top-level `;`, stepping over bracketed groups.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while !self.is_eof() {
            match self.peek().kind {
                TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1)
                }
                TokenKind::Semi if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }
}
