use crate::runtime::{
    bootstrap::roots,
    category::Category,
    generator::{Generator, GeneratorRef},
    identity::IdentityRef,
    object::AgoraObject,
    pattern::Pattern,
};
use std::fmt;
use std::rc::Rc;

/// One `TRY:` frame: the pattern it catches and the frame around it.
#[derive(Debug)]
pub struct HandlerFrame {
    pattern: Pattern,
    outer: Option<Rc<HandlerFrame>>,
}

impl HandlerFrame {
    pub fn push(pattern: Pattern, outer: Option<Rc<HandlerFrame>>) -> Rc<HandlerFrame> {
        Rc::new(HandlerFrame { pattern, outer })
    }

    pub fn handles(&self, pattern: &Pattern) -> bool {
        let mut frame = Some(self);
        while let Some(current) = frame {
            if &current.pattern == pattern {
                return true;
            }
            frame = current.outer.as_deref();
        }
        false
    }

    pub fn depth(&self) -> usize {
        1 + self.outer.as_ref().map_or(0, |outer| outer.depth())
    }
}

/// The environment a method body runs against.
///
/// Contexts are values: evaluation derives new ones with the `with_*`
/// methods. The `imp_set_*` methods mutate in place and are only used on a
/// context that has not been handed to anyone yet.
#[derive(Clone)]
pub struct Context {
    self_identity: IdentityRef,
    private: GeneratorRef,
    public: GeneratorRef,
    parent: GeneratorRef,
    category: Category,
    handler: Option<Rc<HandlerFrame>>,
}

impl Context {
    pub fn new(
        self_identity: IdentityRef,
        private: GeneratorRef,
        public: GeneratorRef,
        parent: GeneratorRef,
        category: Category,
        handler: Option<Rc<HandlerFrame>>,
    ) -> Self {
        Self {
            self_identity,
            private,
            public,
            parent,
            category,
            handler,
        }
    }

    /// Fresh top-level context: a new frame over the root private part and a
    /// calling layer over the root identity's public part. Nothing extends
    /// the root object here, so the category starts empty.
    pub fn top_level() -> Self {
        let roots = roots();
        let identity = roots.identity.clone();
        let root_public = identity.current_public();
        let private = Generator::frame(roots.private.clone());
        let public = Generator::layer(root_public.clone(), private.clone());
        Self::new(
            identity,
            private,
            public,
            root_public,
            Category::EMPTY,
            None,
        )
    }

    pub fn self_identity(&self) -> &IdentityRef {
        &self.self_identity
    }

    pub fn self_object(&self) -> AgoraObject {
        AgoraObject::from_identity(self.self_identity.clone())
    }

    pub fn private(&self) -> &GeneratorRef {
        &self.private
    }

    pub fn public(&self) -> &GeneratorRef {
        &self.public
    }

    pub fn parent(&self) -> &GeneratorRef {
        &self.parent
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn handler(&self) -> Option<&Rc<HandlerFrame>> {
        self.handler.as_ref()
    }

    pub fn is_reifying(&self) -> bool {
        self.category.contains(Category::FLAGS)
    }

    pub fn with_private(&self, private: GeneratorRef) -> Self {
        Self {
            private,
            ..self.clone()
        }
    }

    pub fn with_category(&self, category: Category) -> Self {
        Self {
            category,
            ..self.clone()
        }
    }

    pub fn with_handler(&self, handler: Rc<HandlerFrame>) -> Self {
        Self {
            handler: Some(handler),
            ..self.clone()
        }
    }

    pub fn imp_set_private(&mut self, private: GeneratorRef) {
        self.private = private;
    }

    pub fn imp_set_public(&mut self, public: GeneratorRef) {
        self.public = public;
    }

    pub fn imp_set_parent(&mut self, parent: GeneratorRef) {
        self.parent = parent;
    }

    pub fn imp_set_category(&mut self, category: Category) {
        self.category = category;
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("self", &Rc::as_ptr(&self.self_identity))
            .field("private", &Rc::as_ptr(&self.private))
            .field("public", &Rc::as_ptr(&self.public))
            .field("parent", &Rc::as_ptr(&self.parent))
            .field("category", &self.category)
            .field("handlers", &self.handler.as_ref().map_or(0, |h| h.depth()))
            .finish()
    }
}
