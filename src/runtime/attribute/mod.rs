mod extension;
mod method;
mod primitive;
mod slot;

pub use extension::{CloningAttribute, MixinAttribute, ViewAttribute};
pub use method::{MethodAttribute, ReifierMethodAttribute};
pub use primitive::{PrimitiveAttribute, PrimitiveFn, PrimitiveReifier, ReifierFn};
pub use slot::{ConstantAttribute, VariableGetAttribute, VariableSetAttribute};

use crate::runtime::{
    client::Client,
    clone_map::CloneMap,
    context::Context,
    error::{AgoraError, AgoraResult},
    generator::{Generator, GeneratorRef},
    object::AgoraObject,
    pattern::Pattern,
    variable::VariableContainer,
};
use std::rc::Rc;

pub type AttributeRef = Rc<dyn Attribute>;

/// An executable slot body installed in a generator's table.
pub trait Attribute {
    fn do_attribute_value(
        &self,
        pattern: &Pattern,
        client: &Client,
        context: &Context,
    ) -> AgoraResult<AgoraObject>;

    /// The attribute's counterpart in a copy made through `map`. Stateless
    /// attributes return themselves.
    fn copy(self: Rc<Self>, map: &mut CloneMap) -> AttributeRef;

    fn kind(&self) -> &'static str;
}

/// One getter/setter pair per formal, in a fresh frame over `over`.
pub fn bind_formals(
    formals: &[String],
    actuals: &[AgoraObject],
    over: &GeneratorRef,
) -> AgoraResult<GeneratorRef> {
    if formals.len() != actuals.len() {
        return Err(AgoraError::program(format!(
            "expected {} arguments but received {}",
            formals.len(),
            actuals.len()
        )));
    }
    let frame = Generator::frame(over.clone());
    for (formal, actual) in formals.iter().zip(actuals) {
        install_variable(&frame, formal, actual.clone())?;
    }
    Ok(frame)
}

/// Installs `name` and `name:` over one shared container.
pub fn install_variable(
    generator: &GeneratorRef,
    name: &str,
    value: AgoraObject,
) -> AgoraResult<Rc<VariableContainer>> {
    let container = Rc::new(VariableContainer::new(value));
    let getter = Pattern::unary(name);
    let setter = Pattern::keyword([format!("{name}:")]);
    generator.install(getter, Rc::new(VariableGetAttribute::new(container.clone())))?;
    generator.install(setter, Rc::new(VariableSetAttribute::new(container.clone())))?;
    Ok(container)
}
