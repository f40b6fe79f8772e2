use crate::runtime::category::Category;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Unary(String),
    Operator(String),
    /// Keyword parts keep their trailing colon, e.g. `["at:", "put:"]`.
    Keyword(Vec<String>),
}

/// Structural message key. Two patterns with the same shape and reifier flag
/// are the same key, whatever expression produced them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern {
    shape: Shape,
    reifier: bool,
}

impl Pattern {
    pub fn unary(name: impl Into<String>) -> Self {
        Self {
            shape: Shape::Unary(name.into()),
            reifier: false,
        }
    }

    pub fn operator(symbol: impl Into<String>) -> Self {
        Self {
            shape: Shape::Operator(symbol.into()),
            reifier: false,
        }
    }

    pub fn keyword<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts = parts
            .into_iter()
            .map(|part| {
                let mut part = part.into();
                if !part.ends_with(':') {
                    part.push(':');
                }
                part
            })
            .collect();
        Self {
            shape: Shape::Keyword(parts),
            reifier: false,
        }
    }

    /// Marks the pattern as a reifier without touching its selector.
    pub fn reifying(mut self) -> Self {
        self.reifier = true;
        self
    }

    /// The call-site form of a user-declared reifier: upper-cased selector
    /// with the reifier flag set.
    pub fn to_reifier(&self) -> Self {
        let shape = match &self.shape {
            Shape::Unary(name) => Shape::Unary(name.to_ascii_uppercase()),
            Shape::Operator(symbol) => Shape::Operator(symbol.clone()),
            Shape::Keyword(parts) => {
                Shape::Keyword(parts.iter().map(|p| p.to_ascii_uppercase()).collect())
            }
        };
        Self {
            shape,
            reifier: true,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is_reifier(&self) -> bool {
        self.reifier
    }

    pub fn arity(&self) -> usize {
        match &self.shape {
            Shape::Unary(_) => 0,
            Shape::Operator(_) => 1,
            Shape::Keyword(parts) => parts.len(),
        }
    }

    pub fn unary_name(&self) -> Option<&str> {
        match &self.shape {
            Shape::Unary(name) => Some(name),
            _ => None,
        }
    }

    /// `x` yields `x:`; only unary patterns have a setter.
    pub fn setter(&self) -> Option<Pattern> {
        self.unary_name().map(|name| Pattern {
            shape: Shape::Keyword(vec![format!("{name}:")]),
            reifier: self.reifier,
        })
    }

    pub fn selector(&self) -> String {
        match &self.shape {
            Shape::Unary(name) => name.clone(),
            Shape::Operator(symbol) => symbol.clone(),
            Shape::Keyword(parts) => parts.concat(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector())
    }
}

/// What a message expression evaluates to in `flags` mode: the pattern it
/// would have sent, the names standing in its argument positions, and the
/// declaration modifiers collected so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub formals: Vec<String>,
    pub pattern: Pattern,
    pub category: Category,
}

impl Declaration {
    pub fn new(pattern: Pattern, formals: Vec<String>) -> Self {
        Self {
            formals,
            pattern,
            category: Category::EMPTY,
        }
    }

    pub fn with_category(mut self, bits: Category) -> Self {
        self.category |= bits;
        self
    }

    pub fn is_public(&self) -> bool {
        self.category.contains(Category::PUBLIK)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pattern.shape() {
            Shape::Unary(name) => write!(f, "{name}")?,
            Shape::Operator(symbol) => {
                write!(f, "{symbol}")?;
                if let Some(formal) = self.formals.first() {
                    write!(f, " {formal}")?;
                }
            }
            Shape::Keyword(parts) => {
                for (idx, part) in parts.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{part}")?;
                    if let Some(formal) = self.formals.get(idx) {
                        write!(f, " {formal}")?;
                    }
                }
            }
        }
        if self.category.contains(Category::PUBLIK) {
            write!(f, " PUBLIC")?;
        }
        if self.category.contains(Category::LOCAL) {
            write!(f, " LOCAL")?;
        }
        Ok(())
    }
}
