use super::declaration_in;
use crate::language::ast::Receiver;
use crate::runtime::{
    attribute::bind_formals,
    category::Category,
    client::{Client, ReifierClient},
    context::HandlerFrame,
    error::{AgoraError, AgoraException, AgoraResult, AGORA_ERROR_SELECTOR},
    native::{up, NativeValue},
    object::AgoraObject,
    pattern::{Pattern, Shape},
};
use std::rc::Rc;
use tracing::debug;

/// `TRY: body CATCH: pattern DO: handler`. The catch pattern is a
/// declaration; its formals receive the raised arguments.
pub(super) fn try_catch(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    client.forbid_receiver("TRY:CATCH:DO:")?;
    let declaration = declaration_in(client, client.argument(1)?, "CATCH:")?;
    if !declaration.category.contains_less_than(Category::EMPTY) {
        return Err(AgoraError::reifier_misused(format!(
            "catch pattern `{declaration}` cannot carry modifiers"
        )));
    }
    let context = client.evaluation_context();
    let frame = HandlerFrame::push(declaration.pattern.clone(), context.handler().cloned());
    let outcome = client.argument(0)?.eval(&context.with_handler(frame));

    let actuals = match outcome {
        Ok(value) => return Ok(value),
        Err(AgoraError::Exception(exception)) if exception.matches(&declaration.pattern) => {
            exception.client.actuals()?.to_vec()
        }
        Err(error) if catches_generic(&declaration.pattern) && error.is_generic() => {
            debug!(kind = error.kind(), "agoraError handler caught {error}");
            vec![up(NativeValue::Error(Rc::new(error)))]
        }
        Err(error) => return Err(error),
    };
    let private = bind_formals(&declaration.formals, &actuals, context.private())?;
    client.argument(2)?.eval(&context.with_private(private))
}

fn catches_generic(pattern: &Pattern) -> bool {
    !pattern.is_reifier()
        && matches!(pattern.shape(), Shape::Keyword(parts) if parts.len() == 1 && parts[0] == AGORA_ERROR_SELECTOR)
}

/// `(pattern: arguments) RAISE`. The arguments are evaluated; the pattern
/// itself is never sent.
pub(super) fn raise(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    let receiver = client.require_receiver("RAISE")?;
    let message = receiver
        .as_message()
        .filter(|message| message.receiver == Receiver::Implicit && !message.pattern.is_reifier())
        .ok_or_else(|| {
            AgoraError::reifier_misused(format!(
                "`RAISE` needs a receiverless exception pattern, got `{receiver}`"
            ))
        })?;
    let context = client.evaluation_context();
    let actuals = message
        .arguments
        .iter()
        .map(|argument| argument.eval(&context))
        .collect::<AgoraResult<Vec<_>>>()?;
    let handler = context.handler().cloned();
    let handled = handler
        .as_ref()
        .is_some_and(|frame| frame.handles(&message.pattern));
    if !handled {
        debug!(pattern = %message.pattern, "raised exception has no matching handler");
    }
    let exception = AgoraException::new(
        message.pattern.clone(),
        Client::evaluated(actuals, handler),
    );
    Err(AgoraError::Exception(exception))
}

pub(super) fn halt(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    client.forbid_receiver("HALT")?;
    debug!("halt requested");
    Err(AgoraError::Halt)
}
