use crate::runtime::{
    client::Client,
    config::DepthGuard,
    error::AgoraResult,
    identity::IdentityRef,
    native::NativeValue,
    pattern::Pattern,
};
use std::fmt;
use std::rc::Rc;

/// The only handle user code ever holds. Cloning the handle aliases the same
/// identity; it never copies the object.
#[derive(Clone)]
pub struct AgoraObject {
    identity: IdentityRef,
}

impl AgoraObject {
    pub fn from_identity(identity: IdentityRef) -> Self {
        Self { identity }
    }

    pub fn send(&self, pattern: &Pattern, client: &Client) -> AgoraResult<AgoraObject> {
        let _depth = DepthGuard::enter()?;
        let context = client.make_context(&self.identity);
        self.identity
            .current_public()
            .delegate(pattern, client, &context)
    }

    /// The boxed host value, if this object wraps one. Pure user objects have
    /// no host-facing form and yield `None`.
    pub fn down(&self) -> Option<NativeValue> {
        self.identity.native().cloned()
    }

    pub(crate) fn identity(&self) -> &IdentityRef {
        &self.identity
    }

    pub(crate) fn same_identity(&self, other: &AgoraObject) -> bool {
        Rc::ptr_eq(&self.identity, &other.identity)
    }
}

impl fmt::Debug for AgoraObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.identity.native() {
            Some(native) => write!(f, "AgoraObject({native:?})"),
            None => write!(f, "AgoraObject({:p})", Rc::as_ptr(&self.identity)),
        }
    }
}

impl fmt::Display for AgoraObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.identity.native() {
            Some(native) => write!(f, "{native}"),
            None => write!(f, "<object>"),
        }
    }
}
