//! Declaration AST nodes (top-level items and local declarations)

use serde::{Deserialize, Serialize};
use crate::{
    ArraySpecifier, Block, Expr, FullySpecifiedType, Identifier, MemberDeclaration,
    PrecisionQualifier, Span, TypeQualifier, TypeSpecifier,
};

/// A top-level item of a translation unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalDeclaration {
    pub kind: ExternalDeclarationKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExternalDeclarationKind {
    /// Preprocessor line, kept verbatim: `#version 120`, `#define FOO 1`
    Directive(String),

    /// Global declaration: `uniform vec4 entityColor;`
    Declaration(Declaration),

    /// Function definition: `void main() { ... }`
    Function(FunctionDefinition),

    /// Stray `;` at file scope
    Empty,
}

impl ExternalDeclaration {
    pub fn new(kind: ExternalDeclarationKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Function definitions and standalone prototypes
    pub fn is_function_like(&self) -> bool {
        match &self.kind {
            ExternalDeclarationKind::Function(_) => true,
            ExternalDeclarationKind::Declaration(decl) => {
                matches!(decl.kind, DeclarationKind::Prototype(_))
            }
            _ => false,
        }
    }
}

/// A declaration, global or local
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeclarationKind {
    /// Variables (or a bare struct): `const float x = 1.0, y;`
    Variables(VariableDeclaration),

    /// Function prototype: `vec3 shade(vec3 n);`
    Prototype(FunctionPrototype),

    /// Default precision: `precision mediump float;`
    Precision {
        precision: PrecisionQualifier,
        ty: TypeSpecifier,
    },

    /// Qualifier-only declaration: `layout(triangles) in;`
    Qualifiers(Vec<TypeQualifier>),

    /// Interface block: `out VertexData { vec4 color; } vd;`
    Block(InterfaceBlock),
}

/// Variable declaration with shared qualifiers and type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub qualifiers: Vec<TypeQualifier>,
    pub ty: TypeSpecifier,
    pub declarators: Vec<Declarator>,
    pub span: Span,
}

/// One declared name: `x`, `m[8] = ...`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declarator {
    pub name: Identifier,
    pub array: Option<ArraySpecifier>,
    pub initializer: Option<Expr>,
    pub span: Span,
}

/// Interface block declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceBlock {
    pub qualifiers: Vec<TypeQualifier>,
    pub name: String,
    pub members: Vec<MemberDeclaration>,
    pub instance: Option<Declarator>,
    pub span: Span,
}

/// Function prototype
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionPrototype {
    pub return_type: FullySpecifiedType,
    pub name: Identifier,
    pub params: Vec<ParameterDeclaration>,
    pub span: Span,
}

/// Function parameter; the name is optional in prototypes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub qualifiers: Vec<TypeQualifier>,
    pub ty: TypeSpecifier,
    pub name: Option<Identifier>,
    pub array: Option<ArraySpecifier>,
    pub span: Span,
}

/// Function definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub prototype: FunctionPrototype,
    pub body: Block,
    pub span: Span,
}
