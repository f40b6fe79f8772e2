use crate::runtime::{
    attribute::AttributeRef,
    client::Client,
    clone_map::CloneMap,
    config,
    context::Context,
    error::{AgoraError, AgoraResult},
    object::AgoraObject,
    pattern::Pattern,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

pub type GeneratorRef = Rc<Generator>;

/// Pattern to attribute table shared by every method-holding generator.
#[derive(Default)]
pub struct MethodTable {
    entries: RefCell<HashMap<Pattern, AttributeRef>>,
}

impl MethodTable {
    pub fn lookup(&self, pattern: &Pattern) -> Option<AttributeRef> {
        self.entries.borrow().get(pattern).cloned()
    }

    pub fn install(&self, pattern: Pattern, attribute: AttributeRef) {
        self.entries.borrow_mut().insert(pattern, attribute);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn snapshot(&self) -> Vec<(Pattern, AttributeRef)> {
        self.entries
            .borrow()
            .iter()
            .map(|(pattern, attribute)| (pattern.clone(), attribute.clone()))
            .collect()
    }
}

#[derive(Clone)]
pub enum PrivatePart {
    /// A private frame is its own private part.
    Itself,
    Frame(GeneratorRef),
}

pub struct InternalGenerator {
    methods: MethodTable,
    parent: RefCell<GeneratorRef>,
    private: RefCell<PrivatePart>,
    /// Set on an object's own private frame. Its parent is the lexical
    /// scope the object was created in, which copies share.
    scope_boundary: bool,
}

impl InternalGenerator {
    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    pub fn parent(&self) -> GeneratorRef {
        self.parent.borrow().clone()
    }

    pub fn private_part(&self) -> PrivatePart {
        self.private.borrow().clone()
    }
}

pub struct PrimGenerator {
    name: &'static str,
    methods: MethodTable,
    parent: GeneratorRef,
}

impl PrimGenerator {
    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }
}

/// A node in a delegation chain.
pub enum Generator {
    /// The root parent: understands nothing.
    Empty,
    Internal(InternalGenerator),
    Prim(PrimGenerator),
}

impl Generator {
    pub fn empty() -> GeneratorRef {
        Rc::new(Generator::Empty)
    }

    /// A private frame over `parent`.
    pub fn frame(parent: GeneratorRef) -> GeneratorRef {
        Self::internal(parent, PrivatePart::Itself, false)
    }

    /// The private frame of a new object, over the private part of the
    /// context that created it.
    pub fn object_frame(lexical: GeneratorRef) -> GeneratorRef {
        Self::internal(lexical, PrivatePart::Itself, true)
    }

    /// A public layer over `parent` whose attributes run against `private`.
    pub fn layer(parent: GeneratorRef, private: GeneratorRef) -> GeneratorRef {
        Self::internal(parent, PrivatePart::Frame(private), false)
    }

    fn internal(parent: GeneratorRef, private: PrivatePart, scope_boundary: bool) -> GeneratorRef {
        Rc::new(Generator::Internal(InternalGenerator {
            methods: MethodTable::default(),
            parent: RefCell::new(parent),
            private: RefCell::new(private),
            scope_boundary,
        }))
    }

    pub fn primitive(
        name: &'static str,
        parent: GeneratorRef,
        entries: Vec<(Pattern, AttributeRef)>,
    ) -> GeneratorRef {
        let methods = MethodTable::default();
        for (pattern, attribute) in entries {
            methods.install(pattern, attribute);
        }
        Rc::new(Generator::Prim(PrimGenerator {
            name,
            methods,
            parent,
        }))
    }

    pub fn is_empty_generator(&self) -> bool {
        matches!(self, Generator::Empty)
    }

    pub fn parent(&self) -> Option<GeneratorRef> {
        match self {
            Generator::Empty => None,
            Generator::Internal(internal) => Some(internal.parent()),
            Generator::Prim(prim) => Some(prim.parent.clone()),
        }
    }

    pub fn lookup_local(&self, pattern: &Pattern) -> Option<AttributeRef> {
        match self {
            Generator::Empty => None,
            Generator::Internal(internal) => internal.methods.lookup(pattern),
            Generator::Prim(prim) => prim.methods.lookup(pattern),
        }
    }

    /// Walks the chain for `pattern`, returning the attribute and the
    /// generator holding it.
    pub fn lookup(self: &Rc<Self>, pattern: &Pattern) -> Option<(GeneratorRef, AttributeRef)> {
        let mut current = self.clone();
        loop {
            if let Some(attribute) = current.lookup_local(pattern) {
                return Some((current, attribute));
            }
            current = current.parent()?;
        }
    }

    pub fn private_of(self: &Rc<Self>) -> Option<GeneratorRef> {
        match &**self {
            Generator::Internal(internal) => match internal.private_part() {
                PrivatePart::Itself => Some(self.clone()),
                PrivatePart::Frame(frame) => Some(frame),
            },
            _ => None,
        }
    }

    pub fn install(&self, pattern: Pattern, attribute: AttributeRef) -> AgoraResult<()> {
        match self {
            Generator::Empty => Err(AgoraError::program(format!(
                "cannot install `{pattern}` into the empty generator"
            ))),
            Generator::Internal(internal) => {
                internal.methods.install(pattern, attribute);
                Ok(())
            }
            Generator::Prim(prim) => Err(AgoraError::program(format!(
                "cannot install `{pattern}` into primitive generator `{}`",
                prim.name
            ))),
        }
    }

    pub fn set_private(&self, frame: GeneratorRef) -> AgoraResult<()> {
        match self {
            Generator::Internal(internal) => {
                *internal.private.borrow_mut() = PrivatePart::Frame(frame);
                Ok(())
            }
            Generator::Empty => Err(AgoraError::program(
                "the empty generator has no private part",
            )),
            Generator::Prim(prim) => Err(AgoraError::program(format!(
                "primitive generator `{}` has no private part",
                prim.name
            ))),
        }
    }

    /// Finds `pattern` along the chain and runs the attribute with the
    /// context narrowed to the holding generator's private part and parent.
    /// Falling off the end of the chain is `MessageNotUnderstood`.
    pub fn delegate(
        self: &Rc<Self>,
        pattern: &Pattern,
        client: &Client,
        context: &Context,
    ) -> AgoraResult<AgoraObject> {
        let tracing_enabled = config::current().trace_dispatch;
        let mut current = self.clone();
        loop {
            let next = match &*current {
                Generator::Empty => {
                    if tracing_enabled {
                        trace!(%pattern, "message not understood");
                    }
                    return Err(AgoraError::MessageNotUnderstood {
                        pattern: pattern.clone(),
                        receiver: context.self_object(),
                    });
                }
                Generator::Internal(internal) => {
                    if let Some(attribute) = internal.methods.lookup(pattern) {
                        if tracing_enabled {
                            trace!(%pattern, kind = attribute.kind(), "delegate hit");
                        }
                        let private = match internal.private_part() {
                            PrivatePart::Itself => current.clone(),
                            PrivatePart::Frame(frame) => frame,
                        };
                        let mut callee = context.clone();
                        callee.imp_set_private(private);
                        callee.imp_set_parent(internal.parent());
                        return attribute.do_attribute_value(pattern, client, &callee);
                    }
                    internal.parent()
                }
                Generator::Prim(prim) => {
                    if let Some(attribute) = prim.methods.lookup(pattern) {
                        if tracing_enabled {
                            trace!(%pattern, generator = prim.name, "primitive hit");
                        }
                        let mut callee = context.clone();
                        callee.imp_set_parent(prim.parent.clone());
                        return attribute.do_attribute_value(pattern, client, &callee);
                    }
                    prim.parent.clone()
                }
            };
            current = next;
        }
    }

    /// Copies this generator through `map`. Only internal generators are
    /// duplicated; the empty root and primitive tables are shared, and so is
    /// the lexical scope above an object frame.
    pub fn copy(self: &Rc<Self>, map: &mut CloneMap) -> GeneratorRef {
        let internal = match &**self {
            Generator::Internal(internal) => internal,
            _ => return self.clone(),
        };
        let copy = Self::internal(
            internal.parent(),
            PrivatePart::Itself,
            internal.scope_boundary,
        );
        map.record_generator(self, copy.clone());

        let parent = if internal.scope_boundary {
            internal.parent()
        } else {
            map.generator(&internal.parent())
        };
        let private = match internal.private_part() {
            PrivatePart::Itself => PrivatePart::Itself,
            PrivatePart::Frame(frame) => PrivatePart::Frame(map.generator(&frame)),
        };
        let entries = internal.methods.snapshot();
        if let Generator::Internal(target) = &*copy {
            *target.parent.borrow_mut() = parent;
            *target.private.borrow_mut() = private;
            for (pattern, attribute) in entries {
                let attribute = map.attribute(&attribute);
                target.methods.install(pattern, attribute);
            }
        }
        copy
    }

    /// Number of generators from here to the empty root, inclusive.
    pub fn chain_length(self: &Rc<Self>) -> usize {
        let mut length = 1;
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            length += 1;
            current = parent;
        }
        length
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generator::Empty => write!(f, "EmptyGenerator"),
            Generator::Internal(internal) => f
                .debug_struct("InternalGenerator")
                .field("attributes", &internal.methods.len())
                .field(
                    "frame",
                    &matches!(internal.private_part(), PrivatePart::Itself),
                )
                .finish(),
            Generator::Prim(prim) => f
                .debug_struct("PrimGenerator")
                .field("name", &prim.name)
                .field("attributes", &prim.methods.len())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::attribute::{ConstantAttribute, VariableGetAttribute};
    use crate::runtime::bootstrap::roots;
    use crate::runtime::identity::IdentityGenerator;
    use crate::runtime::native::{up, NativeValue};
    use crate::runtime::variable::VariableContainer;

    fn empty_client() -> Client {
        Client::evaluated(Vec::new(), None)
    }

    fn object_over(public: GeneratorRef) -> AgoraObject {
        AgoraObject::from_identity(IdentityGenerator::user(public))
    }

    #[test]
    fn unknown_pattern_terminates_in_message_not_understood() {
        let roots = roots();
        let mut chain = Generator::layer(roots.parent.clone(), roots.private.clone());
        for _ in 0..64 {
            chain = Generator::layer(chain, roots.private.clone());
        }
        assert_eq!(chain.chain_length(), 66);
        let object = object_over(chain);
        let err = object
            .send(&Pattern::unary("missing"), &empty_client())
            .unwrap_err();
        match err {
            AgoraError::MessageNotUnderstood { pattern, receiver } => {
                assert_eq!(pattern, Pattern::unary("missing"));
                assert!(receiver.same_identity(&object));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn lookup_finds_the_nearest_definition() {
        let roots = roots();
        let base = Generator::layer(roots.parent.clone(), roots.private.clone());
        base.install(
            Pattern::unary("answer"),
            Rc::new(ConstantAttribute::new(up(NativeValue::Integer(1)))),
        )
        .unwrap();
        let derived = Generator::layer(base.clone(), roots.private.clone());
        derived
            .install(
                Pattern::unary("answer"),
                Rc::new(ConstantAttribute::new(up(NativeValue::Integer(2)))),
            )
            .unwrap();
        let object = object_over(derived.clone());
        let answer = object
            .send(&Pattern::unary("answer"), &empty_client())
            .unwrap();
        assert_eq!(answer.down().and_then(|v| v.as_integer()), Some(2));
        let (holder, _) = derived.lookup(&Pattern::unary("answer")).unwrap();
        assert!(Rc::ptr_eq(&holder, &derived));
    }

    #[test]
    fn delegation_narrows_private_part_to_the_holder() {
        let roots = roots();
        let frame = Generator::frame(roots.private.clone());
        let container = Rc::new(VariableContainer::new(up(NativeValue::Integer(5))));
        frame
            .install(
                Pattern::unary("hidden"),
                Rc::new(VariableGetAttribute::new(container)),
            )
            .unwrap();
        let public = Generator::layer(roots.parent.clone(), frame.clone());
        assert!(Rc::ptr_eq(&public.private_of().unwrap(), &frame));
        assert!(Rc::ptr_eq(&frame.private_of().unwrap(), &frame));
        let object = object_over(public);
        assert!(object.send(&Pattern::unary("hidden"), &empty_client()).is_err());
    }

    #[test]
    fn primitive_generators_reject_installation_and_private_parts() {
        let roots = roots();
        let prim = Generator::primitive("Test", roots.parent.clone(), Vec::new());
        let attribute: AttributeRef = Rc::new(ConstantAttribute::new(up(NativeValue::Null)));
        assert!(prim.install(Pattern::unary("x"), attribute).is_err());
        assert!(prim.set_private(roots.private.clone()).is_err());
        assert!(prim.private_of().is_none());
    }
}
