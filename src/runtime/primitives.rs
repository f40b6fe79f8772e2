use crate::runtime::{
    attribute::{AttributeRef, PrimitiveAttribute, PrimitiveFn},
    context::Context,
    error::{AgoraError, AgoraResult},
    generator::{Generator, GeneratorRef},
    identity::IdentityGenerator,
    native::{up, NativeValue},
    object::AgoraObject,
    pattern::Pattern,
};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

/// One primitive generator per native kind, shared by every boxed value of
/// that kind.
pub struct PrimitiveTables {
    null: GeneratorRef,
    boolean: GeneratorRef,
    integer: GeneratorRef,
    float: GeneratorRef,
    character: GeneratorRef,
    text: GeneratorRef,
    table: GeneratorRef,
    expression: GeneratorRef,
    context: GeneratorRef,
    declaration: GeneratorRef,
    error: GeneratorRef,
}

impl PrimitiveTables {
    pub fn build(parent: &GeneratorRef) -> Self {
        let table = |name: &'static str, entries: Vec<(Pattern, AttributeRef)>| {
            Generator::primitive(name, parent.clone(), entries)
        };
        Self {
            null: table("Null", null_protocol()),
            boolean: table("Boolean", boolean_protocol()),
            integer: table("Integer", number_protocol()),
            float: table("Float", number_protocol()),
            character: table("Character", character_protocol()),
            text: table("Text", text_protocol()),
            table: table("Table", table_protocol()),
            expression: table("Expression", common_protocol()),
            context: table("Context", context_protocol()),
            declaration: table("Declaration", common_protocol()),
            error: table("Error", error_protocol()),
        }
    }

    pub fn generator_for(&self, value: &NativeValue) -> GeneratorRef {
        let generator = match value {
            NativeValue::Null => &self.null,
            NativeValue::Boolean(_) => &self.boolean,
            NativeValue::Integer(_) => &self.integer,
            NativeValue::Float(_) => &self.float,
            NativeValue::Character(_) => &self.character,
            NativeValue::Text(_) => &self.text,
            NativeValue::Table(_) => &self.table,
            NativeValue::Expression(_) => &self.expression,
            NativeValue::Context(_) => &self.context,
            NativeValue::Declaration(_) => &self.declaration,
            NativeValue::Error(_) => &self.error,
        };
        generator.clone()
    }
}

fn entry(pattern: Pattern, name: &'static str, function: PrimitiveFn) -> (Pattern, AttributeRef) {
    (pattern, Rc::new(PrimitiveAttribute::new(name, function)))
}

fn common_protocol() -> Vec<(Pattern, AttributeRef)> {
    vec![
        entry(Pattern::unary("printString"), "printString", print_string),
        entry(Pattern::operator("="), "=", equals),
        entry(Pattern::operator("~="), "~=", not_equals),
    ]
}

fn with_common(mut entries: Vec<(Pattern, AttributeRef)>) -> Vec<(Pattern, AttributeRef)> {
    entries.extend(common_protocol());
    entries
}

fn null_protocol() -> Vec<(Pattern, AttributeRef)> {
    with_common(vec![entry(Pattern::unary("isNull"), "Null isNull", is_null)])
}

fn boolean_protocol() -> Vec<(Pattern, AttributeRef)> {
    with_common(vec![
        entry(Pattern::operator("&"), "Boolean &", boolean_and),
        entry(Pattern::operator("|"), "Boolean |", boolean_or),
        entry(Pattern::unary("not"), "Boolean not", boolean_not),
    ])
}

fn number_protocol() -> Vec<(Pattern, AttributeRef)> {
    with_common(vec![
        entry(Pattern::operator("+"), "Number +", add),
        entry(Pattern::operator("-"), "Number -", subtract),
        entry(Pattern::operator("*"), "Number *", multiply),
        entry(Pattern::operator("/"), "Number /", divide),
        entry(Pattern::operator("%"), "Number %", remainder),
        entry(Pattern::operator("<"), "Number <", less),
        entry(Pattern::operator("<="), "Number <=", less_equal),
        entry(Pattern::operator(">"), "Number >", greater),
        entry(Pattern::operator(">="), "Number >=", greater_equal),
        entry(Pattern::keyword(["max:"]), "Number max:", max),
        entry(Pattern::keyword(["min:"]), "Number min:", min),
        entry(Pattern::unary("negated"), "Number negated", negated),
        entry(Pattern::unary("abs"), "Number abs", abs),
        entry(Pattern::unary("sqrt"), "Number sqrt", sqrt),
        entry(Pattern::unary("asFloat"), "Number asFloat", as_float),
        entry(Pattern::unary("asInteger"), "Number asInteger", as_integer),
    ])
}

fn character_protocol() -> Vec<(Pattern, AttributeRef)> {
    with_common(vec![entry(
        Pattern::unary("asInteger"),
        "Character asInteger",
        character_code,
    )])
}

fn text_protocol() -> Vec<(Pattern, AttributeRef)> {
    with_common(vec![
        entry(Pattern::operator("+"), "Text +", concatenate),
        entry(Pattern::unary("size"), "Text size", text_size),
        entry(Pattern::keyword(["at:"]), "Text at:", text_at),
    ])
}

fn table_protocol() -> Vec<(Pattern, AttributeRef)> {
    with_common(vec![
        entry(Pattern::unary("size"), "Table size", table_size),
        entry(Pattern::keyword(["at:"]), "Table at:", table_at),
        entry(Pattern::keyword(["at:", "put:"]), "Table at:put:", table_at_put),
    ])
}

fn context_protocol() -> Vec<(Pattern, AttributeRef)> {
    with_common(vec![
        entry(Pattern::unary("self"), "Context self", context_self),
        entry(Pattern::unary("private"), "Context private", context_private),
        entry(Pattern::unary("public"), "Context public", context_public),
        entry(Pattern::unary("category"), "Context category", context_category),
        entry(Pattern::keyword(["eval:"]), "Context eval:", context_eval),
    ])
}

fn error_protocol() -> Vec<(Pattern, AttributeRef)> {
    with_common(vec![
        entry(Pattern::unary("message"), "Error message", error_message),
        entry(Pattern::unary("kind"), "Error kind", error_kind),
    ])
}

fn boolean(value: bool) -> AgoraObject {
    up(NativeValue::Boolean(value))
}

fn integer(value: i64) -> AgoraObject {
    up(NativeValue::Integer(value))
}

fn float(value: f64) -> AgoraObject {
    up(NativeValue::Float(value))
}

fn text(value: impl Into<Rc<str>>) -> AgoraObject {
    up(NativeValue::text(value))
}

fn native_argument(actuals: &[AgoraObject], origin: &str) -> AgoraResult<NativeValue> {
    actuals
        .first()
        .and_then(AgoraObject::down)
        .ok_or_else(|| AgoraError::primitive(origin, "argument is not a native value"))
}

fn print_string(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    Ok(text(receiver.to_string()))
}

fn native_equals(left: &NativeValue, right: &NativeValue) -> bool {
    match (left, right) {
        (NativeValue::Null, NativeValue::Null) => true,
        (NativeValue::Boolean(a), NativeValue::Boolean(b)) => a == b,
        (NativeValue::Integer(a), NativeValue::Integer(b)) => a == b,
        (NativeValue::Integer(_) | NativeValue::Float(_), NativeValue::Integer(_) | NativeValue::Float(_)) => {
            left.as_float() == right.as_float()
        }
        (NativeValue::Character(a), NativeValue::Character(b)) => a == b,
        (NativeValue::Text(a), NativeValue::Text(b)) => a == b,
        (NativeValue::Table(a), NativeValue::Table(b)) => Rc::ptr_eq(a, b),
        (NativeValue::Expression(a), NativeValue::Expression(b)) => Rc::ptr_eq(a, b),
        (NativeValue::Declaration(a), NativeValue::Declaration(b)) => a == b,
        _ => false,
    }
}

fn equals(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let equal = actuals
        .first()
        .and_then(AgoraObject::down)
        .is_some_and(|other| native_equals(receiver, &other));
    Ok(boolean(equal))
}

fn not_equals(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let equal = actuals
        .first()
        .and_then(AgoraObject::down)
        .is_some_and(|other| native_equals(receiver, &other));
    Ok(boolean(!equal))
}

fn is_null(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    Ok(boolean(receiver.is_null()))
}

fn boolean_operands(
    receiver: &NativeValue,
    actuals: &[AgoraObject],
    origin: &str,
) -> AgoraResult<(bool, bool)> {
    let right = native_argument(actuals, origin)?;
    match (receiver.as_bool(), right.as_bool()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(AgoraError::primitive(origin, "expected two booleans")),
    }
}

fn boolean_and(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let (a, b) = boolean_operands(receiver, actuals, "Boolean &")?;
    Ok(boolean(a && b))
}

fn boolean_or(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let (a, b) = boolean_operands(receiver, actuals, "Boolean |")?;
    Ok(boolean(a || b))
}

fn boolean_not(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    receiver
        .as_bool()
        .map(|value| boolean(!value))
        .ok_or_else(|| AgoraError::primitive("Boolean not", "receiver is not a boolean"))
}

#[derive(Clone, Copy)]
enum Arithmetic {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl Arithmetic {
    fn origin(self) -> &'static str {
        match self {
            Arithmetic::Add => "Number +",
            Arithmetic::Subtract => "Number -",
            Arithmetic::Multiply => "Number *",
            Arithmetic::Divide => "Number /",
            Arithmetic::Remainder => "Number %",
        }
    }
}

fn arithmetic(
    op: Arithmetic,
    receiver: &NativeValue,
    actuals: &[AgoraObject],
) -> AgoraResult<AgoraObject> {
    let origin = op.origin();
    let right = native_argument(actuals, origin)?;
    if let (NativeValue::Integer(a), NativeValue::Integer(b)) = (receiver, &right) {
        if *b == 0 && matches!(op, Arithmetic::Divide | Arithmetic::Remainder) {
            return Err(AgoraError::primitive(origin, "division by zero"));
        }
        let result = match op {
            Arithmetic::Add => a.checked_add(*b),
            Arithmetic::Subtract => a.checked_sub(*b),
            Arithmetic::Multiply => a.checked_mul(*b),
            Arithmetic::Divide => a.checked_div(*b),
            Arithmetic::Remainder => a.checked_rem(*b),
        };
        return result
            .map(integer)
            .ok_or_else(|| AgoraError::primitive(origin, "integer overflow"));
    }
    let (a, b) = match (receiver.as_float(), right.as_float()) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(AgoraError::primitive(
                origin,
                format!("cannot combine {} with {}", receiver.type_name(), right.type_name()),
            ))
        }
    };
    Ok(float(match op {
        Arithmetic::Add => a + b,
        Arithmetic::Subtract => a - b,
        Arithmetic::Multiply => a * b,
        Arithmetic::Divide => a / b,
        Arithmetic::Remainder => a % b,
    }))
}

fn add(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    arithmetic(Arithmetic::Add, receiver, actuals)
}

fn subtract(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    arithmetic(Arithmetic::Subtract, receiver, actuals)
}

fn multiply(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    arithmetic(Arithmetic::Multiply, receiver, actuals)
}

fn divide(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    arithmetic(Arithmetic::Divide, receiver, actuals)
}

fn remainder(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    arithmetic(Arithmetic::Remainder, receiver, actuals)
}

fn compare(receiver: &NativeValue, actuals: &[AgoraObject], origin: &str) -> AgoraResult<Ordering> {
    let right = native_argument(actuals, origin)?;
    if let (NativeValue::Integer(a), NativeValue::Integer(b)) = (receiver, &right) {
        return Ok(a.cmp(b));
    }
    match (receiver.as_float(), right.as_float()) {
        (Some(a), Some(b)) => a
            .partial_cmp(&b)
            .ok_or_else(|| AgoraError::primitive(origin, "cannot order NaN")),
        _ => Err(AgoraError::primitive(
            origin,
            format!("cannot compare {} with {}", receiver.type_name(), right.type_name()),
        )),
    }
}

fn less(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    Ok(boolean(compare(receiver, actuals, "Number <")?.is_lt()))
}

fn less_equal(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    Ok(boolean(compare(receiver, actuals, "Number <=")?.is_le()))
}

fn greater(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    Ok(boolean(compare(receiver, actuals, "Number >")?.is_gt()))
}

fn greater_equal(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    Ok(boolean(compare(receiver, actuals, "Number >=")?.is_ge()))
}

fn max(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    Ok(match compare(receiver, actuals, "Number max:")? {
        Ordering::Less => actuals[0].clone(),
        _ => up(receiver.clone()),
    })
}

fn min(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    Ok(match compare(receiver, actuals, "Number min:")? {
        Ordering::Greater => actuals[0].clone(),
        _ => up(receiver.clone()),
    })
}

fn negated(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    match receiver {
        NativeValue::Integer(value) => value
            .checked_neg()
            .map(integer)
            .ok_or_else(|| AgoraError::primitive("Number negated", "integer overflow")),
        NativeValue::Float(value) => Ok(float(-value)),
        other => Err(not_a_number("Number negated", other)),
    }
}

fn abs(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    match receiver {
        NativeValue::Integer(value) => value
            .checked_abs()
            .map(integer)
            .ok_or_else(|| AgoraError::primitive("Number abs", "integer overflow")),
        NativeValue::Float(value) => Ok(float(value.abs())),
        other => Err(not_a_number("Number abs", other)),
    }
}

fn sqrt(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let value = receiver
        .as_float()
        .ok_or_else(|| not_a_number("Number sqrt", receiver))?;
    if value < 0.0 {
        return Err(AgoraError::primitive(
            "Number sqrt",
            "square root of a negative number",
        ));
    }
    Ok(float(value.sqrt()))
}

fn as_float(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    receiver
        .as_float()
        .map(float)
        .ok_or_else(|| not_a_number("Number asFloat", receiver))
}

fn as_integer(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    match receiver {
        NativeValue::Integer(value) => Ok(integer(*value)),
        NativeValue::Float(value) if value.is_finite() => Ok(integer(value.trunc() as i64)),
        NativeValue::Float(_) => Err(AgoraError::primitive(
            "Number asInteger",
            "value is not finite",
        )),
        other => Err(not_a_number("Number asInteger", other)),
    }
}

fn not_a_number(origin: &str, value: &NativeValue) -> AgoraError {
    AgoraError::primitive(origin, format!("{} is not a number", value.type_name()))
}

fn character_code(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    match receiver {
        NativeValue::Character(value) => Ok(integer(*value as i64)),
        other => Err(AgoraError::primitive(
            "Character asInteger",
            format!("{} is not a character", other.type_name()),
        )),
    }
}

fn concatenate(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let left = receiver
        .as_text()
        .ok_or_else(|| AgoraError::primitive("Text +", "receiver is not text"))?;
    let right = native_argument(actuals, "Text +")?;
    Ok(text(format!("{left}{right}")))
}

fn text_size(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let value = receiver
        .as_text()
        .ok_or_else(|| AgoraError::primitive("Text size", "receiver is not text"))?;
    Ok(integer(value.chars().count() as i64))
}

fn one_based_index(actuals: &[AgoraObject], origin: &str, len: usize) -> AgoraResult<usize> {
    let index = native_argument(actuals, origin)?
        .as_integer()
        .ok_or_else(|| AgoraError::primitive(origin, "index is not an integer"))?;
    if index < 1 || index as usize > len {
        return Err(AgoraError::primitive(
            origin,
            format!("index {index} out of range 1..{len}"),
        ));
    }
    Ok(index as usize - 1)
}

fn text_at(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let value = receiver
        .as_text()
        .ok_or_else(|| AgoraError::primitive("Text at:", "receiver is not text"))?;
    let index = one_based_index(actuals, "Text at:", value.chars().count())?;
    let character = value
        .chars()
        .nth(index)
        .ok_or_else(|| AgoraError::primitive("Text at:", "index out of range"))?;
    Ok(up(NativeValue::Character(character)))
}

fn table_items(receiver: &NativeValue, origin: &str) -> AgoraResult<Rc<RefCell<Vec<AgoraObject>>>> {
    match receiver {
        NativeValue::Table(items) => Ok(items.clone()),
        other => Err(AgoraError::primitive(
            origin,
            format!("{} is not a table", other.type_name()),
        )),
    }
}

fn table_size(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let items = table_items(receiver, "Table size")?;
    let len = items.borrow().len();
    Ok(integer(len as i64))
}

fn table_at(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let items = table_items(receiver, "Table at:")?;
    let items = items.borrow();
    let index = one_based_index(actuals, "Table at:", items.len())?;
    Ok(items[index].clone())
}

fn table_at_put(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let items = table_items(receiver, "Table at:put:")?;
    let mut items = items.borrow_mut();
    let index = one_based_index(actuals, "Table at:put:", items.len())?;
    let value = actuals[1].clone();
    items[index] = value.clone();
    Ok(value)
}

fn context_of<'a>(receiver: &'a NativeValue, origin: &str) -> AgoraResult<&'a Rc<Context>> {
    match receiver {
        NativeValue::Context(context) => Ok(context),
        other => Err(AgoraError::primitive(
            origin,
            format!("{} is not a context", other.type_name()),
        )),
    }
}

fn context_self(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    Ok(context_of(receiver, "Context self")?.self_object())
}

fn context_private(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let context = context_of(receiver, "Context private")?;
    Ok(AgoraObject::from_identity(IdentityGenerator::user(
        context.private().clone(),
    )))
}

fn context_public(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let context = context_of(receiver, "Context public")?;
    Ok(AgoraObject::from_identity(IdentityGenerator::user(
        context.public().clone(),
    )))
}

fn context_category(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let context = context_of(receiver, "Context category")?;
    Ok(text(context.category().to_string()))
}

fn context_eval(receiver: &NativeValue, actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    let context = context_of(receiver, "Context eval:")?;
    match native_argument(actuals, "Context eval:")? {
        NativeValue::Expression(expression) => expression.eval(context),
        other => Err(AgoraError::primitive(
            "Context eval:",
            format!("{} is not an expression", other.type_name()),
        )),
    }
}

fn error_of<'a>(receiver: &'a NativeValue, origin: &str) -> AgoraResult<&'a Rc<AgoraError>> {
    match receiver {
        NativeValue::Error(error) => Ok(error),
        other => Err(AgoraError::primitive(
            origin,
            format!("{} is not an error", other.type_name()),
        )),
    }
}

fn error_message(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    Ok(text(error_of(receiver, "Error message")?.to_string()))
}

fn error_kind(receiver: &NativeValue, _actuals: &[AgoraObject]) -> AgoraResult<AgoraObject> {
    Ok(text(error_of(receiver, "Error kind")?.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::client::Client;

    fn send(receiver: AgoraObject, pattern: Pattern, actuals: Vec<AgoraObject>) -> AgoraResult<AgoraObject> {
        receiver.send(&pattern, &Client::evaluated(actuals, None))
    }

    #[test]
    fn integer_arithmetic_stays_integral() {
        let sum = send(integer(3), Pattern::operator("+"), vec![integer(4)]).unwrap();
        assert_eq!(sum.down().and_then(|v| v.as_integer()), Some(7));
        let quotient = send(integer(7), Pattern::operator("/"), vec![integer(2)]).unwrap();
        assert_eq!(quotient.down().and_then(|v| v.as_integer()), Some(3));
    }

    #[test]
    fn mixed_arithmetic_promotes_to_float() {
        let product = send(integer(3), Pattern::operator("*"), vec![float(0.5)]).unwrap();
        assert!(matches!(product.down(), Some(NativeValue::Float(v)) if v == 1.5));
    }

    #[test]
    fn division_by_zero_is_a_primitive_exception() {
        let err = send(integer(1), Pattern::operator("/"), vec![integer(0)]).unwrap_err();
        match err {
            AgoraError::PrimException { origin, cause } => {
                assert_eq!(origin, "Number /");
                assert_eq!(cause, "division by zero");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn comparisons_and_equality() {
        let less = send(integer(2), Pattern::operator("<"), vec![float(2.5)]).unwrap();
        assert_eq!(less.down().and_then(|v| v.as_bool()), Some(true));
        let equal = send(text("a"), Pattern::operator("="), vec![text("a")]).unwrap();
        assert_eq!(equal.down().and_then(|v| v.as_bool()), Some(true));
        let different = send(integer(1), Pattern::operator("~="), vec![text("1")]).unwrap();
        assert_eq!(different.down().and_then(|v| v.as_bool()), Some(true));
    }

    #[test]
    fn tables_are_one_based_and_shared() {
        let table = up(NativeValue::table(vec![integer(10), integer(20)]));
        send(
            table.clone(),
            Pattern::keyword(["at:", "put:"]),
            vec![integer(2), integer(99)],
        )
        .unwrap();
        let second = send(table.clone(), Pattern::keyword(["at:"]), vec![integer(2)]).unwrap();
        assert_eq!(second.down().and_then(|v| v.as_integer()), Some(99));
        assert!(send(table, Pattern::keyword(["at:"]), vec![integer(3)]).is_err());
    }

    #[test]
    fn text_protocol() {
        let joined = send(text("ag"), Pattern::operator("+"), vec![text("ora")]).unwrap();
        assert_eq!(joined.down().unwrap().to_string(), "agora");
        let size = send(joined, Pattern::unary("size"), Vec::new()).unwrap();
        assert_eq!(size.down().and_then(|v| v.as_integer()), Some(5));
    }

    #[test]
    fn wrong_kind_reports_the_origin() {
        let err = send(boolean(true), Pattern::operator("&"), vec![integer(1)]).unwrap_err();
        assert!(matches!(err, AgoraError::PrimException { origin, .. } if origin == "Boolean &"));
    }
}
