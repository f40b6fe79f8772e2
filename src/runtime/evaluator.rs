use crate::language::ast::{Expression, Literal, Message, Receiver};
use crate::runtime::{
    category::Category,
    client::{Client, ReifierClient},
    config::DepthGuard,
    context::Context,
    error::{AgoraError, AgoraResult},
    native::{null, up, NativeValue},
    object::AgoraObject,
    pattern::Declaration,
};
use std::rc::Rc;
use tracing::trace;

impl Expression {
    /// Evaluates against a fresh top-level context.
    pub fn default_eval(&self) -> AgoraResult<AgoraObject> {
        self.eval(&Context::top_level())
    }

    pub fn eval(&self, context: &Context) -> AgoraResult<AgoraObject> {
        match self {
            Expression::Literal(literal) => Ok(up(literal.to_native())),
            Expression::Message(message) => message.eval(context),
            Expression::Sequence(statements) => {
                let context = value_context(context);
                let mut result = null();
                for statement in statements {
                    result = statement.eval(&context)?;
                }
                Ok(result)
            }
            Expression::Table(items) => {
                let context = value_context(context);
                let items = items
                    .iter()
                    .map(|item| item.eval(&context))
                    .collect::<AgoraResult<Vec<_>>>()?;
                Ok(up(NativeValue::table(items)))
            }
        }
    }
}

impl Literal {
    pub fn to_native(&self) -> NativeValue {
        match self {
            Literal::Null => NativeValue::Null,
            Literal::Boolean(value) => NativeValue::Boolean(*value),
            Literal::Integer(value) => NativeValue::Integer(*value),
            Literal::Float(value) => NativeValue::Float(*value),
            Literal::Character(value) => NativeValue::Character(*value),
            Literal::Text(value) => NativeValue::Text(value.clone()),
        }
    }
}

/// Declaration mode only applies to the expression a declaring reifier
/// hands in, never to nested sequences or table items.
fn value_context(context: &Context) -> Context {
    if context.category().contains(Category::FLAGS) {
        context.with_category(context.category().difference(Category::FLAGS))
    } else {
        context.clone()
    }
}

impl Message {
    fn eval(&self, context: &Context) -> AgoraResult<AgoraObject> {
        if self.pattern.is_reifier() {
            return self.eval_reifier(context);
        }
        if context.category().contains(Category::FLAGS) {
            return self
                .reify()
                .map(|declaration| up(NativeValue::Declaration(Rc::new(declaration))));
        }

        let actuals = self
            .arguments
            .iter()
            .map(|argument| argument.eval(context))
            .collect::<AgoraResult<Vec<_>>>()?;
        let client = Client::evaluated(actuals, context.handler().cloned());

        match &self.receiver {
            Receiver::Implicit => {
                let _depth = DepthGuard::enter()?;
                let callee = context.with_category(Category::EMPTY);
                context.private().delegate(&self.pattern, &client, &callee)
            }
            Receiver::Super => {
                let _depth = DepthGuard::enter()?;
                trace!(pattern = %self.pattern, category = %context.category(), "super send");
                context
                    .parent()
                    .delegate(&self.pattern, &client, context)
            }
            Receiver::Expression(receiver) => {
                let receiver = receiver.eval(context)?;
                receiver.send(&self.pattern, &client)
            }
        }
    }

    /// Flags mode: the message names what is being declared instead of
    /// being sent.
    fn reify(&self) -> AgoraResult<Declaration> {
        if self.receiver != Receiver::Implicit {
            return Err(AgoraError::reifier_misused(format!(
                "declaration pattern `{self}` must not have a receiver"
            )));
        }
        let formals = self
            .arguments
            .iter()
            .map(|argument| {
                argument.as_name().map(str::to_string).ok_or_else(|| {
                    AgoraError::reifier_misused(format!(
                        "formal `{argument}` of declaration pattern `{self}` is not a name"
                    ))
                })
            })
            .collect::<AgoraResult<Vec<_>>>()?;
        Ok(Declaration::new(self.pattern.clone(), formals))
    }

    /// Reifier sends hand their unevaluated parts to whatever the caller's
    /// private chain holds under the pattern.
    fn eval_reifier(&self, context: &Context) -> AgoraResult<AgoraObject> {
        let receiver = match &self.receiver {
            Receiver::Implicit => None,
            Receiver::Expression(receiver) => Some(receiver.clone()),
            Receiver::Super => {
                return Err(AgoraError::reifier_misused(format!(
                    "`SUPER` cannot receive the reifier `{}`",
                    self.pattern
                )))
            }
        };
        let _depth = DepthGuard::enter()?;
        let reifier = ReifierClient::new(receiver, self.arguments.clone(), context.clone());
        let client = Client::reifier(reifier);
        let callee = context.with_category(Category::EMPTY);
        context.private().delegate(&self.pattern, &client, &callee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::parser::parse_program;
    use crate::runtime::pattern::Pattern;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> AgoraResult<AgoraObject> {
        parse_program(source).expect("parses").default_eval()
    }

    #[test]
    fn literals_box_into_primitive_objects() {
        let value = run("41 + 1").unwrap();
        assert_eq!(value.down().and_then(|v| v.as_integer()), Some(42));
        let text = run("\"agora\" size").unwrap();
        assert_eq!(text.down().and_then(|v| v.as_integer()), Some(5));
    }

    #[test]
    fn empty_program_evaluates_to_null() {
        assert!(run("").unwrap().down().is_some_and(|v| v.is_null()));
    }

    #[test]
    fn flags_mode_yields_a_declaration() {
        let statement = parse_program("at: i put: v").unwrap();
        let context = Context::top_level().with_category(Category::FLAGS);
        let Expression::Sequence(statements) = &*statement else {
            panic!("expected a sequence");
        };
        let declared = statements[0].eval(&context).unwrap();
        match declared.down() {
            Some(NativeValue::Declaration(declaration)) => {
                assert_eq!(declaration.pattern, Pattern::keyword(["at:", "put:"]));
                assert_eq!(declaration.formals, vec!["i".to_string(), "v".to_string()]);
            }
            other => panic!("expected a declaration, got {other:?}"),
        }
    }

    #[test]
    fn flags_mode_rejects_non_name_formals() {
        let err = run("at: 1 METHOD: { 2 }").unwrap_err();
        assert!(matches!(err, AgoraError::ReifierMisused { .. }));
    }

    #[test]
    fn super_cannot_receive_a_reifier() {
        let err = run("SUPER IFTRUE: 1").unwrap_err();
        assert!(matches!(err, AgoraError::ReifierMisused { .. }));
    }

    #[test]
    fn unknown_receiverless_message_reports_the_top_level_self() {
        let err = run("nothing").unwrap_err();
        match err {
            AgoraError::MessageNotUnderstood { pattern, .. } => {
                assert_eq!(pattern, Pattern::unary("nothing"))
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
