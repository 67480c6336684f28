//! glcompat Edit - Identifier-indexed editing primitives over the shader AST
//!
//! Rewrite passes never touch the tree directly. They go through the
//! [`TreeEditor`] capability, which offers a handful of structural edits keyed
//! by identifier spelling. [`IndexedUnit`] implements it for a parsed
//! translation unit and keeps its identifier index in sync after every edit.

mod indexed;
mod template;

pub use indexed::*;
pub use template::*;

use glcompat_ast::NodeId;

/// Where injected external declarations are inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionPoint {
    /// After the leading `#version`/`#extension`/`#pragma`/`#line` lines
    BeforeDeclarations,
    /// Before the first function definition or prototype, else at the end.
    /// Never inside a conditional group.
    BeforeFunctions,
    /// After everything else
    End,
}

/// Structural editing capability over one translation unit.
///
/// Every query reflects the tree as of the last edit. Edits whose subject is
/// absent succeed and report zero changes.
pub trait TreeEditor {
    type Error;

    /// Whether the name occurs anywhere, in any role
    fn has_identifier(&self, name: &str) -> bool;

    /// Node ids of the sites where the name is read as an expression
    fn reference_sites(&self, name: &str) -> Vec<NodeId>;

    /// Rename every occurrence of `from`, in any role. Returns the number renamed.
    fn rename(&mut self, from: &str, to: &str) -> usize;

    /// Replace each listed reference expression with a fresh copy of `replacement`.
    /// Returns the number of sites replaced.
    fn replace_references(&mut self, sites: &[NodeId], replacement: &str) -> Result<usize, Self::Error>;

    /// Replace every reference expression of `name` with `replacement`
    fn replace_references_of(&mut self, name: &str, replacement: &str) -> Result<usize, Self::Error> {
        let sites = self.reference_sites(name);
        self.replace_references(&sites, replacement)
    }

    /// Parse `source` as external declarations and insert them at `point`.
    /// Returns the number of declarations inserted.
    fn inject(&mut self, point: InjectionPoint, source: &str) -> Result<usize, Self::Error>;

    /// Remove every external declaration structurally equal to `template`.
    /// `hint` names an identifier the template declares, used to skip units
    /// that cannot contain a match. Returns the number removed.
    fn detach_matching(&mut self, template: &str, hint: &str) -> Result<usize, Self::Error>;
}
