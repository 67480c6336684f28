//! Parser error types

use glcompat_ast::Span;
use glcompat_lexer::TokenKind;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("unexpected end of file")]
    UnexpectedEof { span: Span },

    #[error("unrecognized character sequence")]
    InvalidToken { span: Span },

    #[error("invalid expression")]
    InvalidExpression { span: Span },

    #[error("invalid type")]
    InvalidType { span: Span },

    #[error("expected declaration")]
    ExpectedDeclaration { span: Span },

    #[error("function definitions are only allowed at file scope")]
    NestedFunction { span: Span },

    #[error("unexpected input after {what}")]
    TrailingInput { what: &'static str, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span } => *span,
            ParseError::InvalidToken { span } => *span,
            ParseError::InvalidExpression { span } => *span,
            ParseError::InvalidType { span } => *span,
            ParseError::ExpectedDeclaration { span } => *span,
            ParseError::NestedFunction { span } => *span,
            ParseError::TrailingInput { span, .. } => *span,
        }
    }

    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        match found {
            TokenKind::Eof => ParseError::UnexpectedEof { span },
            TokenKind::Error => ParseError::InvalidToken { span },
            _ => ParseError::UnexpectedToken {
                expected: expected.into(),
                found: found.describe().to_string(),
                span,
            },
        }
    }
}
