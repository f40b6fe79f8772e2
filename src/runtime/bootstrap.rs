use crate::runtime::{
    generator::{Generator, GeneratorRef},
    identity::{IdentityGenerator, IdentityRef},
    primitives::PrimitiveTables,
    reifiers,
};
use std::rc::Rc;

/// The fixed points every chain bottoms out in.
pub struct Roots {
    /// The empty generator: understands nothing.
    pub parent: GeneratorRef,
    /// Frame holding the built-in reifiers. Every private chain ends here.
    pub private: GeneratorRef,
    /// Identity of the top-level object.
    pub identity: IdentityRef,
    pub primitives: PrimitiveTables,
}

impl Roots {
    fn bootstrap() -> Self {
        let parent = Generator::empty();
        let private = Generator::frame(parent.clone());
        if let Generator::Internal(internal) = &*private {
            for (pattern, attribute) in reifiers::builtins() {
                internal.methods().install(pattern, attribute);
            }
        }
        let identity = IdentityGenerator::user(Generator::layer(parent.clone(), private.clone()));
        let primitives = PrimitiveTables::build(&parent);
        Self {
            parent,
            private,
            identity,
            primitives,
        }
    }

    pub fn is_root_private(&self, generator: &GeneratorRef) -> bool {
        Rc::ptr_eq(generator, &self.private)
    }
}

thread_local! {
    static ROOTS: Rc<Roots> = Rc::new(Roots::bootstrap());
}

/// The roots of the current thread, built on first use.
pub fn roots() -> Rc<Roots> {
    ROOTS.with(Rc::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::pattern::Pattern;

    #[test]
    fn roots_are_shared_within_a_thread() {
        assert!(Rc::ptr_eq(&roots(), &roots()));
    }

    #[test]
    fn root_private_holds_the_builtin_reifiers() {
        let roots = roots();
        assert!(roots
            .private
            .lookup_local(&Pattern::keyword(["VARIABLE:"]).reifying())
            .is_some());
        assert!(roots
            .private
            .lookup_local(&Pattern::keyword(["VARIABLE:"]))
            .is_none());
        assert!(roots.parent.is_empty_generator());
        assert!(Rc::ptr_eq(
            &roots.identity.current_public().private_of().unwrap(),
            &roots.private
        ));
    }
}
