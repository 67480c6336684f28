//! glcompat - Legacy fixed-function attribute compatibility for shaders
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use glcompat_ast as ast;
pub use glcompat_edit as edit;
pub use glcompat_lexer as lexer;
pub use glcompat_parser as parser;
pub use glcompat_transform as transform;
