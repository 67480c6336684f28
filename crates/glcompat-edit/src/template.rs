//! Declaration templates for structural matching

use glcompat_ast::{ExternalDeclaration, NodeIdGen, ToGlsl};
use glcompat_parser::{parse_external_declarations, ParseError};

/// A declaration pattern such as `uniform vec4 entityColor;`.
///
/// Matching is structural: two declarations match when their canonical
/// printed forms are equal, so spacing, comments and redundant parentheses
/// in the source do not matter.
#[derive(Debug, Clone)]
pub struct DeclarationTemplate {
    canonical: String,
    hint: String,
}

impl DeclarationTemplate {
    /// Parse a template from source. The source must hold exactly one
    /// declaration; anything after it is an error.
    pub fn parse(source: &str, hint: impl Into<String>) -> Result<Self, ParseError> {
        // Template ids never reach the edited unit
        let mut ids = NodeIdGen::new();
        let mut decls = parse_external_declarations(source, &mut ids)?;
        if decls.len() != 1 {
            let span = decls
                .get(1)
                .map(|decl| decl.span)
                .unwrap_or_default();
            return Err(ParseError::TrailingInput {
                what: "declaration template",
                span,
            });
        }
        let decl = decls.remove(0);
        Ok(Self {
            canonical: decl.to_glsl(0),
            hint: hint.into(),
        })
    }

    /// Identifier every match must contain
    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn matches(&self, decl: &ExternalDeclaration) -> bool {
        decl.to_glsl(0) == self.canonical
    }
}
