//! Statement AST nodes

use serde::{Deserialize, Serialize};
use crate::{Declaration, Expr, Span};

/// A braced block of statements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// A statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StatementKind {
    /// Local declaration: `vec4 color = vec4(1.0);`
    Declaration(Declaration),

    /// Expression statement: `gl_Position = ftransform();`
    Expr(Expr),

    /// Nested block: `{ ... }`
    Block(Block),

    /// `if (c) stmt else stmt`
    If {
        condition: Expr,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },

    /// `for (init; condition; step) body`
    For {
        init: Option<Box<Statement>>,
        condition: Option<Expr>,
        step: Option<Expr>,
        body: Box<Statement>,
    },

    /// `while (c) body`
    While {
        condition: Expr,
        body: Box<Statement>,
    },

    /// `do body while (c);`
    DoWhile {
        body: Box<Statement>,
        condition: Expr,
    },

    /// `switch (selector) { ... }`
    Switch {
        selector: Expr,
        body: Block,
    },

    /// `case value:`
    Case(Expr),

    /// `default:`
    Default,

    Return(Option<Expr>),
    Break,
    Continue,
    Discard,

    /// Preprocessor line inside a function body, kept verbatim
    Directive(String),

    /// Stray `;`
    Empty,
}
