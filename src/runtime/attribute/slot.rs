use super::{Attribute, AttributeRef};
use crate::runtime::{
    client::Client,
    clone_map::CloneMap,
    context::Context,
    error::{AgoraError, AgoraResult},
    object::AgoraObject,
    pattern::Pattern,
    variable::VariableContainer,
};
use std::rc::Rc;

pub struct VariableGetAttribute {
    container: Rc<VariableContainer>,
}

impl VariableGetAttribute {
    pub fn new(container: Rc<VariableContainer>) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &Rc<VariableContainer> {
        &self.container
    }
}

impl Attribute for VariableGetAttribute {
    fn do_attribute_value(
        &self,
        _pattern: &Pattern,
        _client: &Client,
        _context: &Context,
    ) -> AgoraResult<AgoraObject> {
        Ok(self.container.read())
    }

    fn copy(self: Rc<Self>, map: &mut CloneMap) -> AttributeRef {
        Rc::new(VariableGetAttribute::new(map.container(&self.container)))
    }

    fn kind(&self) -> &'static str {
        "variable-get"
    }
}

pub struct VariableSetAttribute {
    container: Rc<VariableContainer>,
}

impl VariableSetAttribute {
    pub fn new(container: Rc<VariableContainer>) -> Self {
        Self { container }
    }
}

impl Attribute for VariableSetAttribute {
    fn do_attribute_value(
        &self,
        pattern: &Pattern,
        client: &Client,
        _context: &Context,
    ) -> AgoraResult<AgoraObject> {
        let value = match client.actuals()? {
            [value] => value.clone(),
            other => {
                return Err(AgoraError::program(format!(
                    "`{pattern}` expects one argument, got {}",
                    other.len()
                )))
            }
        };
        self.container.write(value.clone());
        Ok(value)
    }

    fn copy(self: Rc<Self>, map: &mut CloneMap) -> AttributeRef {
        Rc::new(VariableSetAttribute::new(map.container(&self.container)))
    }

    fn kind(&self) -> &'static str {
        "variable-set"
    }
}

/// A read-only binding with no setter.
pub struct ConstantAttribute {
    value: AgoraObject,
}

impl ConstantAttribute {
    pub fn new(value: AgoraObject) -> Self {
        Self { value }
    }
}

impl Attribute for ConstantAttribute {
    fn do_attribute_value(
        &self,
        _pattern: &Pattern,
        _client: &Client,
        _context: &Context,
    ) -> AgoraResult<AgoraObject> {
        Ok(self.value.clone())
    }

    fn copy(self: Rc<Self>, _map: &mut CloneMap) -> AttributeRef {
        self
    }

    fn kind(&self) -> &'static str {
        "constant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::native::{up, NativeValue};

    #[test]
    fn setter_writes_are_visible_through_the_getter() {
        let container = Rc::new(VariableContainer::new(up(NativeValue::Integer(1))));
        let getter = VariableGetAttribute::new(container.clone());
        let setter = VariableSetAttribute::new(container);
        let context = Context::top_level();
        let pattern = Pattern::keyword(["x:"]);
        setter
            .do_attribute_value(
                &pattern,
                &Client::evaluated(vec![up(NativeValue::Integer(9))], None),
                &context,
            )
            .unwrap();
        let value = getter
            .do_attribute_value(
                &Pattern::unary("x"),
                &Client::evaluated(Vec::new(), None),
                &context,
            )
            .unwrap();
        assert_eq!(value.down().and_then(|v| v.as_integer()), Some(9));
        assert_eq!(Rc::strong_count(getter.container()), 2);
    }

    #[test]
    fn setter_rejects_wrong_arity() {
        let container = Rc::new(VariableContainer::new(up(NativeValue::Null)));
        let setter = VariableSetAttribute::new(container);
        let err = setter
            .do_attribute_value(
                &Pattern::keyword(["x:"]),
                &Client::evaluated(Vec::new(), None),
                &Context::top_level(),
            )
            .unwrap_err();
        assert!(matches!(err, AgoraError::ProgramError { .. }));
    }
}
