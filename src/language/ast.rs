use crate::runtime::pattern::{Pattern, Shape};
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Character(char),
    Text(Rc<str>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Receiver {
    /// Receiverless send: dispatched through the private part.
    Implicit,
    /// `SUPER`: dispatched through the parent with the same self.
    Super,
    Expression(Rc<Expression>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub receiver: Receiver,
    pub pattern: Pattern,
    pub arguments: Vec<Rc<Expression>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Message(Message),
    /// `{ a; b; c }`: evaluates each statement, yields the last.
    Sequence(Vec<Rc<Expression>>),
    /// `[a, b, c]`: a fresh table of the evaluated items.
    Table(Vec<Rc<Expression>>),
}

impl Expression {
    pub fn message(receiver: Receiver, pattern: Pattern, arguments: Vec<Rc<Expression>>) -> Self {
        Expression::Message(Message {
            receiver,
            pattern,
            arguments,
        })
    }

    /// The name of a bare receiverless unary send such as `x`, which is how
    /// formals and loop variables are written.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expression::Message(Message {
                receiver: Receiver::Implicit,
                pattern,
                arguments,
            }) if arguments.is_empty() && !pattern.is_reifier() => pattern.unary_name(),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Expression::Message(message) => Some(message),
            _ => None,
        }
    }

    fn needs_parens(&self) -> bool {
        match self {
            Expression::Message(message) => !matches!(message.pattern.shape(), Shape::Unary(_)),
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Boolean(value) => write!(f, "{value}"),
            Literal::Integer(value) => write!(f, "{value}"),
            Literal::Float(value) => write!(f, "{value:?}"),
            Literal::Character(value) => write!(f, "'{}'", value.escape_default()),
            Literal::Text(value) => write!(f, "\"{}\"", value.escape_default()),
        }
    }
}

struct Operand<'a>(&'a Expression);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.needs_parens() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separator = "";
        match &self.receiver {
            Receiver::Implicit => {}
            Receiver::Super => {
                write!(f, "SUPER")?;
                separator = " ";
            }
            Receiver::Expression(receiver) => {
                write!(f, "{}", Operand(receiver))?;
                separator = " ";
            }
        }
        match self.pattern.shape() {
            Shape::Unary(name) => write!(f, "{separator}{name}"),
            Shape::Operator(symbol) => {
                write!(f, "{separator}{symbol}")?;
                for argument in &self.arguments {
                    write!(f, " {}", Operand(argument))?;
                }
                Ok(())
            }
            Shape::Keyword(parts) => {
                for (part, argument) in parts.iter().zip(&self.arguments) {
                    write!(f, "{separator}{part} {}", Operand(argument))?;
                    separator = " ";
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(literal) => write!(f, "{literal}"),
            Expression::Message(message) => write!(f, "{message}"),
            Expression::Sequence(statements) => {
                write!(f, "{{ ")?;
                for (idx, statement) in statements.iter().enumerate() {
                    if idx > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{statement}")?;
                }
                write!(f, " }}")
            }
            Expression::Table(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}
