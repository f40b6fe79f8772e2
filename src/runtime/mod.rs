pub mod attribute;
pub mod bootstrap;
pub mod category;
pub mod client;
pub mod clone_map;
pub mod config;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod generator;
pub mod identity;
pub mod native;
pub mod object;
pub mod pattern;
pub mod primitives;
pub mod reifiers;
pub mod variable;

pub use config::EngineConfig;
pub use context::Context;
pub use error::{AgoraError, AgoraResult};
pub use native::{up, NativeValue};
pub use object::AgoraObject;
