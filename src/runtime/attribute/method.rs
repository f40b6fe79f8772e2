use super::{bind_formals, Attribute, AttributeRef, ConstantAttribute};
use crate::language::ast::Expression;
use crate::runtime::{
    category::Category,
    client::Client,
    clone_map::CloneMap,
    context::Context,
    error::{AgoraError, AgoraResult},
    generator::Generator,
    native::{up, NativeValue},
    object::AgoraObject,
    pattern::Pattern,
};
use std::rc::Rc;

pub struct MethodAttribute {
    formals: Vec<String>,
    body: Rc<Expression>,
}

impl MethodAttribute {
    pub fn new(formals: Vec<String>, body: Rc<Expression>) -> Self {
        Self { formals, body }
    }
}

impl Attribute for MethodAttribute {
    fn do_attribute_value(
        &self,
        _pattern: &Pattern,
        client: &Client,
        context: &Context,
    ) -> AgoraResult<AgoraObject> {
        let private = bind_formals(&self.formals, client.actuals()?, context.private())?;
        let public = Generator::layer(context.public().clone(), private.clone());
        let mut callee = context.clone();
        callee.imp_set_private(private);
        callee.imp_set_public(public);
        callee.imp_set_category(Category::EMPTY);
        self.body.eval(&callee)
    }

    fn copy(self: Rc<Self>, _map: &mut CloneMap) -> AttributeRef {
        self
    }

    fn kind(&self) -> &'static str {
        "method"
    }
}

/// A user-declared reifier. Its formals receive the unevaluated argument
/// expressions and `context_name` is bound, read-only, to the caller's
/// context.
pub struct ReifierMethodAttribute {
    formals: Vec<String>,
    context_name: String,
    body: Rc<Expression>,
}

impl ReifierMethodAttribute {
    pub fn new(formals: Vec<String>, context_name: String, body: Rc<Expression>) -> Self {
        Self {
            formals,
            context_name,
            body,
        }
    }
}

impl Attribute for ReifierMethodAttribute {
    fn do_attribute_value(
        &self,
        pattern: &Pattern,
        client: &Client,
        context: &Context,
    ) -> AgoraResult<AgoraObject> {
        let reifier = client.reifier_client()?;
        let expressions: Vec<AgoraObject> = reifier
            .arguments()
            .iter()
            .map(|argument| up(NativeValue::Expression(argument.clone())))
            .collect();
        let private = bind_formals(&self.formals, &expressions, context.private())?;
        private.install(
            Pattern::unary(self.context_name.clone()),
            Rc::new(ConstantAttribute::new(up(NativeValue::Context(Rc::new(
                reifier.caller().clone(),
            ))))),
        )?;
        let public = Generator::layer(context.public().clone(), private.clone());
        let mut callee = context.clone();
        callee.imp_set_private(private);
        callee.imp_set_public(public);
        callee.imp_set_category(Category::EMPTY);

        let result = self.body.eval(&callee)?;
        if let Some(NativeValue::Declaration(declaration)) = result.down() {
            return Err(AgoraError::program(format!(
                "reifier `{pattern}` returned the declaration `{declaration}` instead of an object"
            )));
        }
        Ok(result)
    }

    fn copy(self: Rc<Self>, _map: &mut CloneMap) -> AttributeRef {
        self
    }

    fn kind(&self) -> &'static str {
        "reifier-method"
    }
}
