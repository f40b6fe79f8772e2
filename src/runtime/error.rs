use crate::runtime::{client::Client, object::AgoraObject, pattern::Pattern};
use thiserror::Error;

pub type AgoraResult<T> = Result<T, AgoraError>;

/// Reserved pattern under which `TRY:CATCH:DO:` hands generic errors to user code.
pub const AGORA_ERROR_SELECTOR: &str = "agoraError:";

#[derive(Clone, Debug, Error)]
pub enum AgoraError {
    #[error("Message `{pattern}` not understood by {receiver}")]
    MessageNotUnderstood {
        pattern: Pattern,
        receiver: AgoraObject,
    },
    #[error("Reifier misused: {reason}")]
    ReifierMisused { reason: String },
    #[error("Program error: {reason}")]
    ProgramError { reason: String },
    #[error("Primitive `{origin}` failed: {cause}")]
    PrimException { cause: String, origin: String },
    #[error("Uncaught exception `{}`", .0.pattern)]
    Exception(AgoraException),
    #[error("Program halted")]
    Halt,
}

impl AgoraError {
    pub fn reifier_misused(reason: impl Into<String>) -> Self {
        AgoraError::ReifierMisused {
            reason: reason.into(),
        }
    }

    pub fn program(reason: impl Into<String>) -> Self {
        AgoraError::ProgramError {
            reason: reason.into(),
        }
    }

    pub fn primitive(origin: impl Into<String>, cause: impl Into<String>) -> Self {
        AgoraError::PrimException {
            cause: cause.into(),
            origin: origin.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AgoraError::MessageNotUnderstood { .. } => "MessageNotUnderstood",
            AgoraError::ReifierMisused { .. } => "ReifierMisused",
            AgoraError::ProgramError { .. } => "ProgramError",
            AgoraError::PrimException { .. } => "PrimException",
            AgoraError::Exception(_) => "AgoraException",
            AgoraError::Halt => "AgoraHalt",
        }
    }

    /// Whether an `agoraError:` handler may intercept this error.
    pub fn is_generic(&self) -> bool {
        !matches!(self, AgoraError::Exception(_) | AgoraError::Halt)
    }
}

/// A raised user exception: the pattern it was raised under and the client
/// carrying its evaluated arguments.
#[derive(Clone, Debug)]
pub struct AgoraException {
    pub pattern: Pattern,
    pub client: Client,
}

impl AgoraException {
    pub fn new(pattern: Pattern, client: Client) -> Self {
        Self { pattern, client }
    }

    pub fn matches(&self, pattern: &Pattern) -> bool {
        &self.pattern == pattern
    }
}
