//! glcompat AST - Syntax tree for GLSL-style shader translation units
//!
//! This crate defines the AST node types, spans and node ids, the canonical
//! printer, tree visitors and the identifier index the rewrite passes query.

mod span;
mod types;
mod expr;
mod stmt;
mod decl;
mod printer;
mod visit;
mod index;

pub use span::*;
pub use types::*;
pub use expr::*;
pub use stmt::*;
pub use decl::*;
pub use printer::*;
pub use visit::*;
pub use index::*;

use serde::{Deserialize, Serialize};

/// A complete shader translation unit (one pipeline stage's source)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub declarations: Vec<ExternalDeclaration>,
    pub span: Span,
    /// Allocator for identifier node ids; nodes injected later draw from it
    pub ids: NodeIdGen,
}

impl TranslationUnit {
    /// Iterate over the function definitions in source order
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.declarations.iter().filter_map(|decl| match &decl.kind {
            ExternalDeclarationKind::Function(func) => Some(func),
            _ => None,
        })
    }

    /// Find a function definition by name
    pub fn function(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions().find(|func| func.prototype.name.name == name)
    }

    /// Index just past the leading `#version`/`#extension`/`#pragma`/`#line` run.
    ///
    /// Any other directive (`#ifdef`, `#define`, ...) ends the header.
    pub fn end_of_header(&self) -> usize {
        self.declarations
            .iter()
            .position(|decl| match &decl.kind {
                ExternalDeclarationKind::Directive(text) => !matches!(
                    directive_keyword(text),
                    "version" | "extension" | "pragma" | "line"
                ),
                _ => true,
            })
            .unwrap_or(self.declarations.len())
    }

    /// Index of the first function definition or prototype, or the end of the unit.
    ///
    /// A function inside a conditional group yields the index of the outermost
    /// `#if`/`#ifdef`/`#ifndef` opening that group, so an insertion there is
    /// never conditional.
    pub fn first_function(&self) -> usize {
        let mut depth = 0usize;
        let mut group_start = 0;
        for (i, decl) in self.declarations.iter().enumerate() {
            match &decl.kind {
                ExternalDeclarationKind::Directive(text) => match directive_keyword(text) {
                    "if" | "ifdef" | "ifndef" => {
                        if depth == 0 {
                            group_start = i;
                        }
                        depth += 1;
                    }
                    "endif" => depth = depth.saturating_sub(1),
                    _ => {}
                },
                _ if decl.is_function_like() => {
                    return if depth == 0 { i } else { group_start };
                }
                _ => {}
            }
        }
        self.declarations.len()
    }
}

/// Name of a preprocessor directive: `ifdef` for `#  ifdef FOO`
pub fn directive_keyword(text: &str) -> &str {
    let rest = text.trim_start().trim_start_matches('#').trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    &rest[..end]
}
