use crate::runtime::object::AgoraObject;
use std::cell::RefCell;
use std::fmt;

/// The one cell behind a declared variable. Its getter and setter attributes
/// hold the same `Rc<VariableContainer>`; nothing else aliases it.
pub struct VariableContainer {
    value: RefCell<AgoraObject>,
}

impl VariableContainer {
    pub fn new(value: AgoraObject) -> Self {
        Self {
            value: RefCell::new(value),
        }
    }

    pub fn read(&self) -> AgoraObject {
        self.value.borrow().clone()
    }

    pub fn write(&self, value: AgoraObject) {
        *self.value.borrow_mut() = value;
    }

    /// A fresh cell holding the same object; used by the clone map.
    pub fn duplicate(&self) -> Self {
        Self::new(self.read())
    }
}

impl fmt::Debug for VariableContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableContainer")
            .field("value", &*self.value.borrow())
            .finish()
    }
}
