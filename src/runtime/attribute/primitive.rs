use super::{Attribute, AttributeRef};
use crate::runtime::{
    client::{Client, ReifierClient},
    clone_map::CloneMap,
    context::Context,
    error::{AgoraError, AgoraResult},
    native::NativeValue,
    object::AgoraObject,
    pattern::Pattern,
};
use std::rc::Rc;
use tracing::trace;

pub type PrimitiveFn = fn(&NativeValue, &[AgoraObject]) -> AgoraResult<AgoraObject>;
pub type ReifierFn = fn(&ReifierClient) -> AgoraResult<AgoraObject>;

/// A host operation on the receiver's native payload.
pub struct PrimitiveAttribute {
    name: &'static str,
    function: PrimitiveFn,
}

impl PrimitiveAttribute {
    pub fn new(name: &'static str, function: PrimitiveFn) -> Self {
        Self { name, function }
    }
}

impl Attribute for PrimitiveAttribute {
    fn do_attribute_value(
        &self,
        pattern: &Pattern,
        client: &Client,
        context: &Context,
    ) -> AgoraResult<AgoraObject> {
        let receiver = context.self_identity().native().ok_or_else(|| {
            AgoraError::program(format!(
                "primitive `{}` reached through `{pattern}` on an object without a native value",
                self.name
            ))
        })?;
        let actuals = client.actuals()?;
        if actuals.len() != pattern.arity() {
            return Err(AgoraError::program(format!(
                "primitive `{}` expects {} arguments, got {}",
                self.name,
                pattern.arity(),
                actuals.len()
            )));
        }
        (self.function)(receiver, actuals)
    }

    fn copy(self: Rc<Self>, _map: &mut CloneMap) -> AttributeRef {
        self
    }

    fn kind(&self) -> &'static str {
        "primitive"
    }
}

/// A built-in reifier such as `IFTRUE:` or `METHOD:`.
pub struct PrimitiveReifier {
    name: &'static str,
    function: ReifierFn,
}

impl PrimitiveReifier {
    pub fn new(name: &'static str, function: ReifierFn) -> Self {
        Self { name, function }
    }

}

impl Attribute for PrimitiveReifier {
    fn do_attribute_value(
        &self,
        _pattern: &Pattern,
        client: &Client,
        _context: &Context,
    ) -> AgoraResult<AgoraObject> {
        trace!(reifier = self.name, "built-in reifier");
        (self.function)(client.reifier_client()?)
    }

    fn copy(self: Rc<Self>, _map: &mut CloneMap) -> AttributeRef {
        self
    }

    fn kind(&self) -> &'static str {
        "primitive-reifier"
    }
}
