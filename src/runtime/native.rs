use crate::language::ast::Expression;
use crate::runtime::{
    bootstrap::roots,
    context::Context,
    error::AgoraError,
    identity::IdentityGenerator,
    object::AgoraObject,
    pattern::Declaration,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Host values the engine can box into objects.
#[derive(Clone)]
pub enum NativeValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Character(char),
    Text(Rc<str>),
    Table(Rc<RefCell<Vec<AgoraObject>>>),
    Expression(Rc<Expression>),
    Context(Rc<Context>),
    Declaration(Rc<Declaration>),
    Error(Rc<AgoraError>),
}

impl NativeValue {
    pub fn text(value: impl Into<Rc<str>>) -> Self {
        NativeValue::Text(value.into())
    }

    pub fn table(items: Vec<AgoraObject>) -> Self {
        NativeValue::Table(Rc::new(RefCell::new(items)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            NativeValue::Null => "Null",
            NativeValue::Boolean(_) => "Boolean",
            NativeValue::Integer(_) => "Integer",
            NativeValue::Float(_) => "Float",
            NativeValue::Character(_) => "Character",
            NativeValue::Text(_) => "Text",
            NativeValue::Table(_) => "Table",
            NativeValue::Expression(_) => "Expression",
            NativeValue::Context(_) => "Context",
            NativeValue::Declaration(_) => "Declaration",
            NativeValue::Error(_) => "Error",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            NativeValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            NativeValue::Float(value) => Some(*value),
            NativeValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NativeValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NativeValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }
}

/// Boxes a host value into an object whose public part is the primitive
/// generator for its kind.
pub fn up(value: NativeValue) -> AgoraObject {
    let public = roots().primitives.generator_for(&value);
    AgoraObject::from_identity(IdentityGenerator::primitive(public, value))
}

pub fn null() -> AgoraObject {
    up(NativeValue::Null)
}

impl fmt::Debug for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Null => write!(f, "Null"),
            NativeValue::Boolean(value) => write!(f, "Boolean({value})"),
            NativeValue::Integer(value) => write!(f, "Integer({value})"),
            NativeValue::Float(value) => write!(f, "Float({value})"),
            NativeValue::Character(value) => write!(f, "Character({value:?})"),
            NativeValue::Text(value) => write!(f, "Text({value:?})"),
            NativeValue::Table(items) => write!(f, "Table(len={})", items.borrow().len()),
            NativeValue::Expression(expression) => write!(f, "Expression({expression})"),
            NativeValue::Context(context) => write!(f, "{context:?}"),
            NativeValue::Declaration(declaration) => write!(f, "Declaration({declaration})"),
            NativeValue::Error(error) => write!(f, "Error({error})"),
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Null => write!(f, "null"),
            NativeValue::Boolean(value) => write!(f, "{value}"),
            NativeValue::Integer(value) => write!(f, "{value}"),
            NativeValue::Float(value) => write!(f, "{value:?}"),
            NativeValue::Character(value) => write!(f, "{value}"),
            NativeValue::Text(value) => write!(f, "{value}"),
            NativeValue::Table(items) => {
                write!(f, "[")?;
                for (idx, item) in items.borrow().iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            NativeValue::Expression(expression) => write!(f, "{expression}"),
            NativeValue::Context(_) => write!(f, "<context>"),
            NativeValue::Declaration(declaration) => write!(f, "{declaration}"),
            NativeValue::Error(error) => write!(f, "{error}"),
        }
    }
}
