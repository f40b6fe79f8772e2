use crate::runtime::{
    attribute::AttributeRef,
    bootstrap::Roots,
    generator::{Generator, GeneratorRef},
    identity::{IdentityGenerator, IdentityRef},
    variable::VariableContainer,
};
use std::collections::HashMap;
use std::rc::Rc;

/// Identity-keyed memo for one deep copy. Every node reachable from the
/// copied roots is duplicated at most once, so shared structure stays shared
/// and cycles terminate.
#[derive(Default)]
pub struct CloneMap {
    generators: HashMap<*const Generator, GeneratorRef>,
    identities: HashMap<*const IdentityGenerator, IdentityRef>,
    attributes: HashMap<*const (), AttributeRef>,
    containers: HashMap<*const VariableContainer, Rc<VariableContainer>>,
    copies: usize,
}

impl CloneMap {
    /// A map where the bootstrap sentinels map to themselves.
    pub fn seeded(roots: &Roots) -> Self {
        let mut map = CloneMap::default();
        map.generators
            .insert(Rc::as_ptr(&roots.parent), roots.parent.clone());
        map.generators
            .insert(Rc::as_ptr(&roots.private), roots.private.clone());
        map.identities
            .insert(Rc::as_ptr(&roots.identity), roots.identity.clone());
        map
    }

    pub fn generator(&mut self, original: &GeneratorRef) -> GeneratorRef {
        if let Some(copy) = self.generators.get(&Rc::as_ptr(original)) {
            return copy.clone();
        }
        original.copy(self)
    }

    pub fn identity(&mut self, original: &IdentityRef) -> IdentityRef {
        if let Some(copy) = self.identities.get(&Rc::as_ptr(original)) {
            return copy.clone();
        }
        original.copy(self)
    }

    pub fn attribute(&mut self, original: &AttributeRef) -> AttributeRef {
        let key = Rc::as_ptr(original) as *const ();
        if let Some(copy) = self.attributes.get(&key) {
            return copy.clone();
        }
        let copy = original.clone().copy(self);
        self.attributes.insert(key, copy.clone());
        copy
    }

    pub fn container(&mut self, original: &Rc<VariableContainer>) -> Rc<VariableContainer> {
        if let Some(copy) = self.containers.get(&Rc::as_ptr(original)) {
            return copy.clone();
        }
        let copy = Rc::new(original.duplicate());
        self.containers.insert(Rc::as_ptr(original), copy.clone());
        self.copies += 1;
        copy
    }

    /// Registers `copy` before its fields are filled, so back references
    /// reached while filling them resolve to it.
    pub(crate) fn record_generator(&mut self, original: &GeneratorRef, copy: GeneratorRef) {
        self.generators.insert(Rc::as_ptr(original), copy);
        self.copies += 1;
    }

    pub(crate) fn record_identity(&mut self, original: &IdentityRef, copy: IdentityRef) {
        self.identities.insert(Rc::as_ptr(original), copy);
        self.copies += 1;
    }

    /// Generators, identities and containers duplicated so far.
    pub fn copies(&self) -> usize {
        self.copies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::attribute::{bind_formals, AttributeRef};
    use crate::runtime::bootstrap::roots;
    use crate::runtime::client::Client;
    use crate::runtime::native::{up, NativeValue};
    use crate::runtime::object::AgoraObject;
    use crate::runtime::pattern::Pattern;

    fn read(object: &AgoraObject, name: &str) -> i64 {
        object
            .send(&Pattern::unary(name), &Client::evaluated(Vec::new(), None))
            .unwrap()
            .down()
            .and_then(|value| value.as_integer())
            .unwrap()
    }

    fn write(object: &AgoraObject, name: &str, value: i64) {
        object
            .send(
                &Pattern::keyword([format!("{name}:")]),
                &Client::evaluated(vec![up(NativeValue::Integer(value))], None),
            )
            .unwrap();
    }

    /// A frame holding `count` whose getter and setter are also public.
    fn counter_object() -> (AgoraObject, GeneratorRef) {
        let roots = roots();
        let frame = bind_formals(
            &["count".to_string()],
            &[up(NativeValue::Integer(1))],
            &roots.private,
        )
        .unwrap();
        let public = Generator::layer(roots.parent.clone(), frame.clone());
        for pattern in [Pattern::unary("count"), Pattern::keyword(["count:"])] {
            let attribute: AttributeRef = frame.lookup_local(&pattern).unwrap();
            public.install(pattern, attribute).unwrap();
        }
        let object = AgoraObject::from_identity(IdentityGenerator::user(public));
        (object, frame)
    }

    #[test]
    fn sentinels_map_to_themselves() {
        let roots = roots();
        let mut map = CloneMap::seeded(&roots);
        assert!(Rc::ptr_eq(&map.generator(&roots.parent), &roots.parent));
        assert!(Rc::ptr_eq(&map.generator(&roots.private), &roots.private));
        assert!(Rc::ptr_eq(&map.identity(&roots.identity), &roots.identity));
        assert_eq!(map.copies(), 0);
    }

    #[test]
    fn shared_generator_is_copied_once() {
        let roots = roots();
        let shared = Generator::frame(roots.private.clone());
        let layer = Generator::layer(shared.clone(), shared.clone());
        let mut map = CloneMap::seeded(&roots);
        let copy = map.generator(&layer);
        let copied_parent = copy.parent().unwrap();
        let copied_private = copy.private_of().unwrap();
        assert!(Rc::ptr_eq(&copied_parent, &copied_private));
        assert!(!Rc::ptr_eq(&copied_parent, &shared));
        assert!(Rc::ptr_eq(&copied_parent.parent().unwrap(), &roots.private));
        assert_eq!(map.copies(), 2);
    }

    #[test]
    fn self_referencing_frame_copies_to_a_self_referencing_frame() {
        let roots = roots();
        let frame = Generator::frame(roots.private.clone());
        let mut map = CloneMap::seeded(&roots);
        let copy = map.generator(&frame);
        assert!(Rc::ptr_eq(&copy.private_of().unwrap(), &copy));
    }

    #[test]
    fn cloned_variables_stay_paired_and_independent() {
        let roots = roots();
        let (original, _) = counter_object();
        let mut map = CloneMap::seeded(&roots);
        let copy = AgoraObject::from_identity(map.identity(original.identity()));

        write(&copy, "count", 7);
        assert_eq!(read(&copy, "count"), 7);
        assert_eq!(read(&original, "count"), 1);

        write(&original, "count", 3);
        assert_eq!(read(&original, "count"), 3);
        assert_eq!(read(&copy, "count"), 7);
    }

    #[test]
    fn attributes_installed_twice_copy_to_one_attribute() {
        let roots = roots();
        let (original, frame) = counter_object();
        let mut map = CloneMap::seeded(&roots);
        let copy = map.identity(original.identity());
        let copied_frame = map.generator(&frame);
        let public_getter = copy
            .current_public()
            .lookup_local(&Pattern::unary("count"))
            .unwrap();
        let private_getter = copied_frame.lookup_local(&Pattern::unary("count")).unwrap();
        assert!(Rc::ptr_eq(&public_getter, &private_getter));
    }

    #[test]
    fn object_frames_share_their_lexical_scope() {
        let roots = roots();
        let scope = Generator::frame(roots.private.clone());
        let object_frame = Generator::object_frame(scope.clone());
        let mut map = CloneMap::seeded(&roots);
        let copy = map.generator(&object_frame);
        assert!(!Rc::ptr_eq(&copy, &object_frame));
        assert!(Rc::ptr_eq(&copy.parent().unwrap(), &scope));
        assert_eq!(map.copies(), 1);
    }
}
