//! End-to-end programs run through the reader and the evaluator.

mod objects;
mod reifiers;

use crate::driver::{evaluate, EvalFailure};
use crate::runtime::{error::AgoraError, native::NativeValue, object::AgoraObject};

fn run(source: &str) -> Result<AgoraObject, EvalFailure> {
    evaluate(source)
}

fn runtime_error(source: &str) -> AgoraError {
    match run(source) {
        Err(EvalFailure::Runtime(error)) => error,
        Err(EvalFailure::Syntax(errors)) => panic!("unexpected syntax errors: {errors}"),
        Ok(value) => panic!("expected a runtime error, got {value}"),
    }
}

fn integer(source: &str) -> i64 {
    run(source)
        .expect("evaluates")
        .down()
        .and_then(|value| value.as_integer())
        .expect("an integer result")
}

/// The integers of a table result, in order.
fn integers(source: &str) -> Vec<i64> {
    match run(source).expect("evaluates").down() {
        Some(NativeValue::Table(items)) => items
            .borrow()
            .iter()
            .map(|item| {
                item.down()
                    .and_then(|value| value.as_integer())
                    .expect("an integer element")
            })
            .collect(),
        other => panic!("expected a table, got {other:?}"),
    }
}

fn text(source: &str) -> String {
    run(source).expect("evaluates").to_string()
}
