use crate::{
    language::{errors::SyntaxErrors, parser::parse_program},
    runtime::{
        client::Client,
        error::AgoraError,
        object::AgoraObject,
        pattern::Pattern,
    },
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EvalFailure {
    #[error("{0}")]
    Syntax(SyntaxErrors),
    #[error("{0}")]
    Runtime(AgoraError),
}

/// Reads `source` and evaluates it in a fresh top-level context.
pub fn evaluate(source: &str) -> Result<AgoraObject, EvalFailure> {
    let program = parse_program(source).map_err(EvalFailure::Syntax)?;
    debug!(statements = %program, "evaluating program");
    program.default_eval().map_err(EvalFailure::Runtime)
}

/// Asks `value` for its `printString`. Objects that do not understand it
/// print as their host form.
pub fn print_string(value: &AgoraObject) -> Result<String, AgoraError> {
    let client = Client::evaluated(Vec::new(), None);
    match value.send(&Pattern::unary("printString"), &client) {
        Ok(printed) => Ok(printed.to_string()),
        Err(AgoraError::MessageNotUnderstood { .. }) => Ok(value.to_string()),
        Err(error) => Err(error),
    }
}
