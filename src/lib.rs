pub mod diagnostics;
pub mod driver;
pub mod language;
pub mod runtime;

pub use driver::{evaluate, print_string, EvalFailure};

#[cfg(test)]
mod tests;
