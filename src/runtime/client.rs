use crate::language::ast::Expression;
use crate::runtime::{
    bootstrap::roots,
    category::Category,
    context::{Context, HandlerFrame},
    error::{AgoraError, AgoraResult},
    identity::IdentityRef,
    object::AgoraObject,
};
use std::rc::Rc;

/// The caller's side of a reifier send: nothing has been evaluated yet.
#[derive(Clone, Debug)]
pub struct ReifierClient {
    receiver: Option<Rc<Expression>>,
    arguments: Vec<Rc<Expression>>,
    caller: Context,
}

impl ReifierClient {
    pub fn new(
        receiver: Option<Rc<Expression>>,
        arguments: Vec<Rc<Expression>>,
        caller: Context,
    ) -> Self {
        Self {
            receiver,
            arguments,
            caller,
        }
    }

    pub fn receiver(&self) -> Option<&Rc<Expression>> {
        self.receiver.as_ref()
    }

    pub fn arguments(&self) -> &[Rc<Expression>] {
        &self.arguments
    }

    pub fn argument(&self, index: usize) -> AgoraResult<&Rc<Expression>> {
        self.arguments.get(index).ok_or_else(|| {
            AgoraError::reifier_misused(format!("missing reifier argument #{}", index + 1))
        })
    }

    pub fn caller(&self) -> &Context {
        &self.caller
    }

    pub fn require_receiver(&self, reifier: &str) -> AgoraResult<&Rc<Expression>> {
        self.receiver.as_ref().ok_or_else(|| {
            AgoraError::reifier_misused(format!("`{reifier}` needs a receiver expression"))
        })
    }

    pub fn forbid_receiver(&self, reifier: &str) -> AgoraResult<()> {
        match &self.receiver {
            Some(receiver) => Err(AgoraError::reifier_misused(format!(
                "`{reifier}` takes no receiver, got `{receiver}`"
            ))),
            None => Ok(()),
        }
    }

    /// The caller's context with declaration mode switched off, which is
    /// where arguments and receivers are evaluated for their value.
    pub fn evaluation_context(&self) -> Context {
        self.caller
            .with_category(self.caller.category().difference(Category::FLAGS))
    }

    /// Evaluates an argument expression in the caller's context.
    pub fn eval_argument(&self, index: usize) -> AgoraResult<AgoraObject> {
        self.argument(index)?.eval(&self.evaluation_context())
    }

    pub fn eval_receiver(&self, reifier: &str) -> AgoraResult<AgoraObject> {
        self.require_receiver(reifier)?
            .eval(&self.evaluation_context())
    }
}

#[derive(Clone, Debug)]
enum Arguments {
    Evaluated(Vec<AgoraObject>),
    Reified(ReifierClient),
}

/// Actual arguments of one send, plus the handler chain active at the call
/// site.
#[derive(Clone, Debug)]
pub struct Client {
    arguments: Arguments,
    handler: Option<Rc<HandlerFrame>>,
}

impl Client {
    pub fn evaluated(actuals: Vec<AgoraObject>, handler: Option<Rc<HandlerFrame>>) -> Self {
        Self {
            arguments: Arguments::Evaluated(actuals),
            handler,
        }
    }

    pub fn reifier(client: ReifierClient) -> Self {
        let handler = client.caller.handler().cloned();
        Self {
            arguments: Arguments::Reified(client),
            handler,
        }
    }

    pub fn is_reifier(&self) -> bool {
        matches!(self.arguments, Arguments::Reified(_))
    }

    pub fn handler(&self) -> Option<&Rc<HandlerFrame>> {
        self.handler.as_ref()
    }

    pub fn actuals(&self) -> AgoraResult<&[AgoraObject]> {
        match &self.arguments {
            Arguments::Evaluated(actuals) => Ok(actuals),
            Arguments::Reified(_) => Err(AgoraError::program(
                "attribute expects evaluated arguments but was reached by a reifier send",
            )),
        }
    }

    pub fn reifier_client(&self) -> AgoraResult<&ReifierClient> {
        match &self.arguments {
            Arguments::Reified(client) => Ok(client),
            Arguments::Evaluated(_) => Err(AgoraError::program(
                "attribute expects a reifier send but received evaluated arguments",
            )),
        }
    }

    /// The context a send to `identity` starts from, before the generator
    /// holding the attribute narrows private part and parent.
    pub fn make_context(&self, identity: &IdentityRef) -> Context {
        let public = identity.current_public();
        Context::new(
            identity.clone(),
            roots().private.clone(),
            public.clone(),
            public,
            Category::EMPTY,
            self.handler.clone(),
        )
    }
}
