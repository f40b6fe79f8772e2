use super::{integer, integers, run, runtime_error, text};
use crate::driver::EvalFailure;
use crate::runtime::{error::AgoraError, pattern::Pattern};
use pretty_assertions::assert_eq;

#[test]
fn public_variables_are_readable_and_writable_from_outside() {
    let source = "o VARIABLE: (OBJECT: { x PUBLIC VARIABLE: 3 }); \
                  before VARIABLE: o x; \
                  o x: 7; \
                  [before, o x]";
    assert_eq!(integers(source), vec![3, 7]);
}

#[test]
fn methods_see_the_object_private_part() {
    let source = "o VARIABLE: (OBJECT: { \
                      hits LOCAL VARIABLE: 0; \
                      hit PUBLIC METHOD: { hits: hits + 1 } \
                  }); \
                  o hit; o hit; o hit";
    assert_eq!(integer(source), 3);
    assert!(matches!(
        runtime_error("o VARIABLE: (OBJECT: { hits LOCAL VARIABLE: 0 }); o hits"),
        AgoraError::MessageNotUnderstood { .. }
    ));
}

#[test]
fn fresh_objects_understand_nothing() {
    match runtime_error("OBJECT foo") {
        AgoraError::MessageNotUnderstood { pattern, .. } => {
            assert_eq!(pattern, Pattern::unary("foo"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn mixins_grow_the_object_for_every_alias() {
    let source = "o VARIABLE: (OBJECT: { \
                      n PUBLIC VARIABLE: 1; \
                      grow PUBLIC MIXIN: { twice PUBLIC METHOD: { n * 2 } } \
                  }); \
                  alias VARIABLE: o; \
                  o grow; \
                  alias twice";
    assert_eq!(integer(source), 2);
}

#[test]
fn mixin_arguments_are_private_to_the_new_layer() {
    let source = "o VARIABLE: (OBJECT: { \
                      base PUBLIC VARIABLE: 10; \
                      offset: k PUBLIC MIXIN: { shifted PUBLIC METHOD: { base + k } } \
                  }); \
                  o offset: 5; \
                  o shifted";
    assert_eq!(integer(source), 15);
    let source = "o VARIABLE: (OBJECT: { \
                      offset: k PUBLIC MIXIN: { probe PUBLIC METHOD: { k } } \
                  }); \
                  o offset: 5; \
                  o k";
    assert!(matches!(
        runtime_error(source),
        AgoraError::MessageNotUnderstood { .. }
    ));
}

#[test]
fn views_extend_a_temporary_object_only() {
    let prelude = "o VARIABLE: (OBJECT: { \
                       n PUBLIC VARIABLE: 3; \
                       extended PUBLIC VIEW: { extra PUBLIC METHOD: { n * 2 } } \
                   }); \
                   v VARIABLE: o extended; ";
    assert_eq!(integer(&format!("{prelude} v extra")), 6);
    assert_eq!(integer(&format!("{prelude} v n")), 3);
    assert!(matches!(
        runtime_error(&format!("{prelude} o extra")),
        AgoraError::MessageNotUnderstood { .. }
    ));
}

#[test]
fn views_share_state_with_their_receiver() {
    let source = "o VARIABLE: (OBJECT: { \
                      n PUBLIC VARIABLE: 3; \
                      extended PUBLIC VIEW: { bump PUBLIC METHOD: { n: n + 1 } } \
                  }); \
                  (o extended) bump; \
                  o n";
    assert_eq!(integer(source), 4);
}

#[test]
fn super_skips_the_current_layer() {
    let source = "o VARIABLE: (OBJECT: { \
                      describe PUBLIC METHOD: { 1 }; \
                      refine PUBLIC MIXIN: { describe PUBLIC METHOD: { (SUPER describe) + 10 } } \
                  }); \
                  o refine; \
                  o describe";
    assert_eq!(integer(source), 11);
}

#[test]
fn objects_capture_their_lexical_scope() {
    let source = "total VARIABLE: 0; \
                  o VARIABLE: (OBJECT: { add: k PUBLIC METHOD: { total: total + k } }); \
                  o add: 4; o add: 5; \
                  total";
    assert_eq!(integer(source), 9);
}

#[test]
fn self_is_the_receiver_inside_methods() {
    let source = "o VARIABLE: (OBJECT: { \
                      n PUBLIC VARIABLE: 2; \
                      square PUBLIC METHOD: { (SELF n) * n } \
                  }); \
                  o square";
    assert_eq!(integer(source), 4);
}

#[test]
fn public_declarations_outside_objects_are_caught_as_generic_errors() {
    let source = "TRY: { x PUBLIC VARIABLE: 1 } CATCH: agoraError: e DO: { e kind }";
    assert_eq!(text(source), "ReifierMisused");
    let source = "TRY: { grow LOCAL MIXIN: { 0 } } CATCH: agoraError: e DO: { e kind }";
    assert_eq!(text(source), "ReifierMisused");
}

#[test]
fn primitive_values_answer_their_protocol() {
    assert_eq!(integer("(\"abc\" + \"de\") size"), 5);
    assert_eq!(integer("t VARIABLE: [1, 2, 3]; t at: 2 put: 20; t at: 2"), 20);
    assert_eq!(text("3 = 3"), "true");
    assert!(matches!(
        runtime_error("[1, 2] at: 5"),
        AgoraError::PrimException { .. }
    ));
}

#[test]
fn syntax_errors_are_reported_before_evaluation() {
    match run("x VARIABLE: 1; y VARIABLE: ; x") {
        Err(EvalFailure::Syntax(errors)) => assert_eq!(errors.errors.len(), 1),
        other => panic!("expected syntax errors, got {:?}", other.map(|v| v.to_string())),
    }
    assert!(matches!(run("SUPER"), Err(EvalFailure::Syntax(_))));
}
