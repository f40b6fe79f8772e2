use crate::runtime::{clone_map::CloneMap, generator::GeneratorRef, native::NativeValue};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

pub type IdentityRef = Rc<IdentityGenerator>;

#[derive(Clone)]
enum IdentityKind {
    User,
    Primitive(NativeValue),
}

/// The part of an object that stays the same while it grows: a pointer to its
/// current public generator, plus the native payload of boxed host values.
pub struct IdentityGenerator {
    public: RefCell<GeneratorRef>,
    kind: IdentityKind,
}

impl IdentityGenerator {
    pub fn user(public: GeneratorRef) -> IdentityRef {
        Rc::new(IdentityGenerator {
            public: RefCell::new(public),
            kind: IdentityKind::User,
        })
    }

    pub fn primitive(public: GeneratorRef, native: NativeValue) -> IdentityRef {
        Rc::new(IdentityGenerator {
            public: RefCell::new(public),
            kind: IdentityKind::Primitive(native),
        })
    }

    pub fn current_public(&self) -> GeneratorRef {
        self.public.borrow().clone()
    }

    /// Replaces the public part in place. Every holder of this identity sees
    /// the new members from now on.
    pub fn change(&self, public: GeneratorRef) {
        debug!(
            from = ?Rc::as_ptr(&self.current_public()),
            to = ?Rc::as_ptr(&public),
            "identity public part changed"
        );
        *self.public.borrow_mut() = public;
    }

    pub fn native(&self) -> Option<&NativeValue> {
        match &self.kind {
            IdentityKind::User => None,
            IdentityKind::Primitive(native) => Some(native),
        }
    }

    pub fn copy(self: &Rc<Self>, map: &mut CloneMap) -> IdentityRef {
        let copy = Rc::new(IdentityGenerator {
            public: RefCell::new(self.current_public()),
            kind: self.kind.clone(),
        });
        map.record_identity(self, copy.clone());
        let public = map.generator(&self.current_public());
        *copy.public.borrow_mut() = public;
        copy
    }
}

impl fmt::Debug for IdentityGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IdentityKind::User => write!(f, "UserIdentity({:?})", Rc::as_ptr(&self.current_public())),
            IdentityKind::Primitive(native) => write!(f, "PrimitiveIdentity({native:?})"),
        }
    }
}
