use super::truth;
use crate::runtime::{
    attribute::install_variable,
    client::ReifierClient,
    error::{AgoraError, AgoraResult},
    generator::Generator,
    native::{null, up, NativeValue},
    object::AgoraObject,
};

pub(super) fn if_true(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    let condition = client.eval_receiver("IFTRUE:")?;
    if truth(&condition, "IFTRUE:")? {
        client.eval_argument(0)
    } else {
        Ok(null())
    }
}

pub(super) fn if_false(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    let condition = client.eval_receiver("IFFALSE:")?;
    if truth(&condition, "IFFALSE:")? {
        Ok(null())
    } else {
        client.eval_argument(0)
    }
}

pub(super) fn if_true_if_false(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    let condition = client.eval_receiver("IFTRUE:IFFALSE:")?;
    let branch = if truth(&condition, "IFTRUE:IFFALSE:")? {
        0
    } else {
        1
    };
    client.eval_argument(branch)
}

/// The receiver is the condition expression and is evaluated again before
/// every iteration.
pub(super) fn while_true(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    loop {
        let condition = client.eval_receiver("WHILETRUE:")?;
        if !truth(&condition, "WHILETRUE:")? {
            return Ok(null());
        }
        client.eval_argument(0)?;
    }
}

/// `i FOR: from TO: to DO: body`, inclusive at both ends. Each iteration
/// binds `i` in a fresh frame over the caller's private part.
pub(super) fn for_to_do(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    let variable = client.require_receiver("FOR:TO:DO:")?;
    let name = variable.as_name().ok_or_else(|| {
        AgoraError::reifier_misused(format!(
            "`FOR:TO:DO:` needs a loop variable name, got `{variable}`"
        ))
    })?;
    let from = bound(client.eval_argument(0)?, "FOR:")?;
    let to = bound(client.eval_argument(1)?, "TO:")?;
    let body = client.argument(2)?;
    let context = client.evaluation_context();
    for index in from..=to {
        let frame = Generator::frame(context.private().clone());
        install_variable(&frame, name, up(NativeValue::Integer(index)))?;
        body.eval(&context.with_private(frame))?;
    }
    Ok(null())
}

fn bound(value: AgoraObject, part: &str) -> AgoraResult<i64> {
    value
        .down()
        .and_then(|native| native.as_integer())
        .ok_or_else(|| AgoraError::program(format!("`{part}` expects an integer, got {value}")))
}
