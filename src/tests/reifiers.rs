use super::{integer, run, runtime_error, text};
use crate::runtime::config::{self, EngineConfig};
use crate::runtime::error::AgoraError;
use pretty_assertions::assert_eq;

#[test]
fn user_reifiers_evaluate_in_the_callers_scope() {
    let source = "unless: c do: b REIFIER: ctx IS: { \
                      (ctx eval: c) IFFALSE: { ctx eval: b } \
                  }; \
                  x VARIABLE: 1; \
                  UNLESS: (x > 3) DO: { x: x + 10 }; \
                  UNLESS: (x > 3) DO: { x: x + 100 }; \
                  x";
    assert_eq!(integer(source), 11);
}

#[test]
fn reifier_arguments_arrive_unevaluated() {
    let source = "quote: e REIFIER: ctx IS: { e }; QUOTE: (1 + 2)";
    assert_eq!(text(source), "1 + 2");
}

#[test]
fn reifier_context_exposes_the_caller() {
    let source = "here REIFIER: ctx IS: { ctx self }; \
                  o VARIABLE: (OBJECT: { \
                      n PUBLIC VARIABLE: 7; \
                      probe PUBLIC METHOD: { HERE } \
                  }); \
                  (o probe) n";
    assert_eq!(integer(source), 7);
}

#[test]
fn reifier_context_reads_the_callers_private_part() {
    let source = "n VARIABLE: 7; \
                  peek REIFIER: ctx IS: { ctx private n }; \
                  m: n METHOD: { PEEK }; \
                  m: 42";
    assert_eq!(integer(source), 42);
}

#[test]
fn reifier_context_reads_the_callers_public_part() {
    let source = "peek REIFIER: ctx IS: { ctx public v }; \
                  o VARIABLE: (OBJECT: { \
                      v PUBLIC VARIABLE: 9; \
                      p PUBLIC METHOD: { PEEK } \
                  }); \
                  o p";
    assert_eq!(integer(source), 9);
}

#[test]
fn raised_exceptions_unwind_through_methods() {
    let source = "fail: n METHOD: { (failed: n) RAISE; 0 }; \
                  TRY: { fail: 5 } CATCH: failed: k DO: { k * 3 }";
    assert_eq!(integer(source), 15);
}

#[test]
fn unhandled_exceptions_reach_the_top_level() {
    assert!(matches!(
        runtime_error("(oops: 1) RAISE"),
        AgoraError::Exception(_)
    ));
    assert!(matches!(runtime_error("1 + 2; HALT; 3"), AgoraError::Halt));
}

#[test]
fn deep_recursion_is_stopped_by_the_configured_limit() {
    config::install(EngineConfig {
        max_depth: 40,
        ..EngineConfig::default()
    });
    let prelude = "down: n METHOD: { (n = 0) IFTRUE: 0 IFFALSE: { down: n - 1 } }; ";
    assert_eq!(integer(&format!("{prelude} down: 5")), 0);
    let err = runtime_error(&format!("{prelude} down: 500"));
    config::install(EngineConfig::default());
    assert!(matches!(err, AgoraError::ProgramError { .. }));
}

#[test]
fn modifiers_used_as_values_are_misuse() {
    assert!(matches!(
        runtime_error("OBJECT PUBLIC"),
        AgoraError::ReifierMisused { .. }
    ));
    assert!(run("x VARIABLE: 1; y VARIABLE: x; y").is_ok());
}
