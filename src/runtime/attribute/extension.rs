use super::{bind_formals, Attribute, AttributeRef};
use crate::language::ast::Expression;
use crate::runtime::{
    bootstrap::roots,
    category::Category,
    client::Client,
    clone_map::CloneMap,
    context::Context,
    error::AgoraResult,
    generator::Generator,
    identity::IdentityGenerator,
    object::AgoraObject,
    pattern::Pattern,
};
use std::rc::Rc;
use tracing::debug;

/// Returns a temporary object: a new layer over the receiver's public part.
/// The receiver itself is left untouched.
pub struct ViewAttribute {
    formals: Vec<String>,
    body: Rc<Expression>,
}

impl ViewAttribute {
    pub fn new(formals: Vec<String>, body: Rc<Expression>) -> Self {
        Self { formals, body }
    }
}

impl Attribute for ViewAttribute {
    fn do_attribute_value(
        &self,
        _pattern: &Pattern,
        client: &Client,
        context: &Context,
    ) -> AgoraResult<AgoraObject> {
        let private = bind_formals(&self.formals, client.actuals()?, context.private())?;
        let old_public = context.public().clone();
        let layer = Generator::layer(old_public.clone(), private.clone());
        let view = IdentityGenerator::user(layer.clone());
        let callee = Context::new(
            view.clone(),
            private,
            layer,
            old_public,
            Category::MIXIN,
            context.handler().cloned(),
        );
        self.body.eval(&callee)?;
        Ok(AgoraObject::from_identity(view))
    }

    fn copy(self: Rc<Self>, _map: &mut CloneMap) -> AttributeRef {
        self
    }

    fn kind(&self) -> &'static str {
        "view"
    }
}

/// Grows the receiver in place: the new layer replaces the identity's public
/// part before the body runs.
pub struct MixinAttribute {
    formals: Vec<String>,
    body: Rc<Expression>,
}

impl MixinAttribute {
    pub fn new(formals: Vec<String>, body: Rc<Expression>) -> Self {
        Self { formals, body }
    }
}

impl Attribute for MixinAttribute {
    fn do_attribute_value(
        &self,
        pattern: &Pattern,
        client: &Client,
        context: &Context,
    ) -> AgoraResult<AgoraObject> {
        let private = bind_formals(&self.formals, client.actuals()?, context.private())?;
        let identity = context.self_identity().clone();
        let old_public = identity.current_public();
        let layer = Generator::layer(old_public.clone(), private.clone());
        debug!(%pattern, "applying mixin");
        identity.change(layer.clone());
        let callee = Context::new(
            identity.clone(),
            private,
            layer,
            old_public,
            Category::MIXIN,
            context.handler().cloned(),
        );
        self.body.eval(&callee)?;
        Ok(AgoraObject::from_identity(identity))
    }

    fn copy(self: Rc<Self>, _map: &mut CloneMap) -> AttributeRef {
        self
    }

    fn kind(&self) -> &'static str {
        "mixin"
    }
}

/// A constructor that runs its body on a deep copy of the receiver. Under
/// `dontClone` (a `SUPER` call from another cloning body) it runs on the
/// receiver as given.
pub struct CloningAttribute {
    formals: Vec<String>,
    body: Rc<Expression>,
}

impl CloningAttribute {
    pub fn new(formals: Vec<String>, body: Rc<Expression>) -> Self {
        Self { formals, body }
    }
}

impl Attribute for CloningAttribute {
    fn do_attribute_value(
        &self,
        pattern: &Pattern,
        client: &Client,
        context: &Context,
    ) -> AgoraResult<AgoraObject> {
        let actuals = client.actuals()?;
        if context.category().contains(Category::DONT_CLONE) {
            let private = bind_formals(&self.formals, actuals, context.private())?;
            let callee = context.with_private(private);
            self.body.eval(&callee)?;
            return Ok(context.self_object());
        }

        let mut map = CloneMap::seeded(&roots());
        let identity = map.identity(context.self_identity());
        let private = map.generator(context.private());
        let public = map.generator(context.public());
        let parent = map.generator(context.parent());
        debug!(%pattern, copies = map.copies(), "cloned receiver");

        let private = bind_formals(&self.formals, actuals, &private)?;
        let callee = Context::new(
            identity.clone(),
            private,
            public,
            parent,
            Category::MIXIN | Category::DONT_CLONE,
            context.handler().cloned(),
        );
        self.body.eval(&callee)?;
        Ok(AgoraObject::from_identity(identity))
    }

    fn copy(self: Rc<Self>, _map: &mut CloneMap) -> AttributeRef {
        self
    }

    fn kind(&self) -> &'static str {
        "cloning"
    }
}
