//! Type specifiers and qualifiers

use serde::{Deserialize, Serialize};
use crate::{Declarator, Expr, Span};

/// A type specifier: `vec4`, `mat4[8]`, `MyStruct`, `struct { ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSpecifier {
    pub kind: TypeSpecifierKind,
    pub array: Option<ArraySpecifier>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeSpecifierKind {
    /// Builtin or user type name: `vec4`, `sampler2D`, `Light`
    Named(String),

    /// Inline struct specifier: `struct Light { vec3 color; }`
    Struct(StructSpecifier),
}

impl TypeSpecifier {
    pub fn named(name: impl Into<String>, span: Span) -> Self {
        Self {
            kind: TypeSpecifierKind::Named(name.into()),
            array: None,
            span,
        }
    }

    /// The type's name, if it is not an anonymous struct
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TypeSpecifierKind::Named(name) => Some(name),
            TypeSpecifierKind::Struct(spec) => spec.name.as_deref(),
        }
    }
}

/// Struct specifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructSpecifier {
    pub name: Option<String>,
    pub members: Vec<MemberDeclaration>,
    pub span: Span,
}

/// A member line inside a struct or interface block: `vec3 color, normal;`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDeclaration {
    pub qualifiers: Vec<TypeQualifier>,
    pub ty: TypeSpecifier,
    pub declarators: Vec<Declarator>,
    pub span: Span,
}

/// Array specifier: `[8]`, `[]`, `[2][3]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArraySpecifier {
    /// One entry per dimension; `None` for an unsized dimension
    pub dimensions: Vec<Option<Expr>>,
    pub span: Span,
}

/// A type qualifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeQualifier {
    Storage(StorageQualifier),
    Layout(Vec<LayoutQualifier>),
    Precision(PrecisionQualifier),
    Interpolation(InterpolationQualifier),
    Invariant,
    Precise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageQualifier {
    Const,
    In,
    Out,
    InOut,
    Attribute,
    Uniform,
    Varying,
    Buffer,
    Shared,
    Centroid,
    Patch,
    Sample,
}

impl StorageQualifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            StorageQualifier::Const => "const",
            StorageQualifier::In => "in",
            StorageQualifier::Out => "out",
            StorageQualifier::InOut => "inout",
            StorageQualifier::Attribute => "attribute",
            StorageQualifier::Uniform => "uniform",
            StorageQualifier::Varying => "varying",
            StorageQualifier::Buffer => "buffer",
            StorageQualifier::Shared => "shared",
            StorageQualifier::Centroid => "centroid",
            StorageQualifier::Patch => "patch",
            StorageQualifier::Sample => "sample",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecisionQualifier {
    High,
    Medium,
    Low,
}

impl PrecisionQualifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            PrecisionQualifier::High => "highp",
            PrecisionQualifier::Medium => "mediump",
            PrecisionQualifier::Low => "lowp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpolationQualifier {
    Smooth,
    Flat,
    NoPerspective,
}

impl InterpolationQualifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            InterpolationQualifier::Smooth => "smooth",
            InterpolationQualifier::Flat => "flat",
            InterpolationQualifier::NoPerspective => "noperspective",
        }
    }
}

/// One entry of a `layout(...)` list: `location = 0`, `triangles`, `shared`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutQualifier {
    pub name: String,
    pub value: Option<Expr>,
    pub span: Span,
}

/// Qualifiers plus type, as used by prototypes and parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullySpecifiedType {
    pub qualifiers: Vec<TypeQualifier>,
    pub ty: TypeSpecifier,
    pub span: Span,
}

impl FullySpecifiedType {
    pub fn has_storage(&self, storage: StorageQualifier) -> bool {
        has_storage(&self.qualifiers, storage)
    }
}

/// Whether a qualifier list contains the given storage qualifier
pub fn has_storage(qualifiers: &[TypeQualifier], storage: StorageQualifier) -> bool {
    qualifiers
        .iter()
        .any(|q| matches!(q, TypeQualifier::Storage(s) if *s == storage))
}

const SCALAR_TYPES: &[&str] = &["void", "bool", "int", "uint", "float", "double", "atomic_uint"];

const OPAQUE_PREFIXES: &[&str] = &["sampler", "isampler", "usampler", "image", "iimage", "uimage"];

/// Whether `name` is a builtin GLSL type name (scalars, vectors, matrices, opaque types)
pub fn is_builtin_type(name: &str) -> bool {
    if SCALAR_TYPES.contains(&name) {
        return true;
    }
    if OPAQUE_PREFIXES.iter().any(|prefix| {
        name.strip_prefix(prefix)
            .map_or(false, |rest| rest.starts_with(|c: char| c.is_ascii_digit() || c.is_ascii_uppercase()))
    }) {
        return true;
    }

    // vecN, bvecN, ivecN, uvecN, dvecN
    let vector = name
        .strip_prefix("vec")
        .or_else(|| name.strip_prefix("bvec"))
        .or_else(|| name.strip_prefix("ivec"))
        .or_else(|| name.strip_prefix("uvec"))
        .or_else(|| name.strip_prefix("dvec"));
    if let Some(n) = vector {
        return matches!(n, "2" | "3" | "4");
    }

    // matN, matNxM, dmatN, dmatNxM
    let matrix = name.strip_prefix("mat").or_else(|| name.strip_prefix("dmat"));
    if let Some(dims) = matrix {
        let dim = |s: &str| matches!(s, "2" | "3" | "4");
        return match dims.split_once('x') {
            Some((cols, rows)) => dim(cols) && dim(rows),
            None => dim(dims),
        };
    }

    false
}
