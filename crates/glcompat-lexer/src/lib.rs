//! glcompat Lexer - Tokenization using logos
//!
//! Differences from a full GLSL front end:
//! - Preprocessor lines are single opaque tokens (no macro expansion)
//! - Type names are plain identifiers; the parser recognizes builtin types

mod token;

pub use token::*;

use logos::Logos;
use glcompat_ast::Span;

/// Tokenize a source string into a vector of tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        let kind = match result {
            Ok(kind) => kind,
            Err(_) => TokenKind::Error,
        };
        tokens.push(Token { kind, span });
    }

    // Add EOF token
    let end = source.len();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
    });

    tokens
}

/// A token with its span
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_basic_declaration() {
        assert_eq!(
            kinds("uniform vec4 entityColor;"),
            vec![
                TokenKind::Uniform,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_directive_is_one_token() {
        let source = "#version 120\nvoid main() {}";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::Directive);
        assert_eq!(tokens[0].text(source), "#version 120");
        assert_eq!(tokens[1].kind, TokenKind::Ident);
    }

    #[test]
    fn test_numeric_literals() {
        let source = "240.0 0.00390625 8 0x1Fu 1e5 .5 2.0f";
        let tokens = tokenize(source);
        let pairs: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| (t.kind, t.text(source)))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (TokenKind::Float, "240.0"),
                (TokenKind::Float, "0.00390625"),
                (TokenKind::Int, "8"),
                (TokenKind::Int, "0x1Fu"),
                (TokenKind::Float, "1e5"),
                (TokenKind::Float, ".5"),
                (TokenKind::Float, "2.0f"),
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("a /* block\n comment */ b // line\n c"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn test_block_comment_shapes() {
        for source in [
            "/* a */ x",
            "/**/ x",
            "/*** stars ***/ x",
            "/* a * b / c */ x",
            "/* DRAWBUFFERS:0 */\nx",
            "/*\n * multi\n * line\n */ x",
        ] {
            assert_eq!(kinds(source), vec![TokenKind::Ident, TokenKind::Eof], "{:?}", source);
        }
    }

    #[test]
    fn test_adjacent_block_comments_do_not_merge() {
        assert_eq!(
            kinds("/* a */ x /* b */ * y"),
            vec![TokenKind::Ident, TokenKind::Star, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn test_compound_operators() {
        assert_eq!(
            kinds("x <<= 1; y ^^ z; i++"),
            vec![
                TokenKind::Ident,
                TokenKind::ShlEq,
                TokenKind::Int,
                TokenKind::Semicolon,
                TokenKind::Ident,
                TokenKind::CaretCaret,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Ident,
                TokenKind::PlusPlus,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("input"), vec![TokenKind::Ident, TokenKind::Eof]);
        assert_eq!(kinds("in"), vec![TokenKind::In, TokenKind::Eof]);
    }
}
