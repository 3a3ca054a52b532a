//! CLI command implementations.

mod build;
mod inspect;

pub use build::build;
pub use inspect::inspect;
