//! Built-in reifiers, installed in the root private part. Every private
//! chain ends there, so these are reachable from any context unless user
//! code shadows them with a reifier of its own.

mod control;
mod declaration;
mod exception;

use crate::language::ast::Expression;
use crate::runtime::{
    attribute::{AttributeRef, PrimitiveReifier, ReifierFn},
    category::Category,
    client::ReifierClient,
    error::{AgoraError, AgoraResult},
    native::NativeValue,
    object::AgoraObject,
    pattern::{Declaration, Pattern},
};
use std::rc::Rc;

pub fn builtins() -> Vec<(Pattern, AttributeRef)> {
    vec![
        reifier("SELF", Pattern::unary("SELF"), declaration::self_object),
        reifier("OBJECT", Pattern::unary("OBJECT"), declaration::object),
        reifier("OBJECT:", Pattern::keyword(["OBJECT:"]), declaration::object_with_body),
        reifier("PUBLIC", Pattern::unary("PUBLIC"), declaration::public),
        reifier("LOCAL", Pattern::unary("LOCAL"), declaration::local),
        reifier("VARIABLE:", Pattern::keyword(["VARIABLE:"]), declaration::variable),
        reifier("METHOD:", Pattern::keyword(["METHOD:"]), declaration::method),
        reifier("MIXIN:", Pattern::keyword(["MIXIN:"]), declaration::mixin),
        reifier("VIEW:", Pattern::keyword(["VIEW:"]), declaration::view),
        reifier("CLONING:", Pattern::keyword(["CLONING:"]), declaration::cloning),
        reifier("REIFIER:IS:", Pattern::keyword(["REIFIER:", "IS:"]), declaration::reifier),
        reifier("IFTRUE:", Pattern::keyword(["IFTRUE:"]), control::if_true),
        reifier("IFFALSE:", Pattern::keyword(["IFFALSE:"]), control::if_false),
        reifier("IFTRUE:IFFALSE:", Pattern::keyword(["IFTRUE:", "IFFALSE:"]), control::if_true_if_false),
        reifier("WHILETRUE:", Pattern::keyword(["WHILETRUE:"]), control::while_true),
        reifier("FOR:TO:DO:", Pattern::keyword(["FOR:", "TO:", "DO:"]), control::for_to_do),
        reifier("TRY:CATCH:DO:", Pattern::keyword(["TRY:", "CATCH:", "DO:"]), exception::try_catch),
        reifier("RAISE", Pattern::unary("RAISE"), exception::raise),
        reifier("HALT", Pattern::unary("HALT"), exception::halt),
    ]
}

fn reifier(name: &'static str, pattern: Pattern, function: ReifierFn) -> (Pattern, AttributeRef) {
    (
        pattern.reifying(),
        Rc::new(PrimitiveReifier::new(name, function)),
    )
}

/// Evaluates `expression` in declaration mode and expects the resulting
/// declaration record.
fn declaration_in(
    client: &ReifierClient,
    expression: &Expression,
    reifier: &str,
) -> AgoraResult<Rc<Declaration>> {
    let caller = client.caller();
    let context = caller.with_category(caller.category() | Category::FLAGS);
    match expression.eval(&context)?.down() {
        Some(NativeValue::Declaration(declaration)) => Ok(declaration),
        _ => Err(AgoraError::reifier_misused(format!(
            "`{reifier}` expects a declaration pattern, got `{expression}`"
        ))),
    }
}

/// The declaration written as the receiver of a declaring reifier.
fn declaration_of(client: &ReifierClient, reifier: &str) -> AgoraResult<Rc<Declaration>> {
    let receiver = client.require_receiver(reifier)?;
    declaration_in(client, receiver, reifier)
}

fn truth(value: &AgoraObject, reifier: &str) -> AgoraResult<bool> {
    value.down().and_then(|native| native.as_bool()).ok_or_else(|| {
        AgoraError::program(format!("`{reifier}` expects a boolean condition, got {value}"))
    })
}
