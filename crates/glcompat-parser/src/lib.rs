//! glcompat Parser - Recursive descent parser
//!
//! Parses shader source into a `TranslationUnit`.
//! Key parsing challenges:
//! - Type names are plain identifiers: `vec4 x;` vs `foo(x);` is decided by
//!   builtin type names and the `Ident Ident` shape of user-typed declarations
//! - Several qualifiers (`sample`, `patch`, ...) are only keywords in qualifier
//!   position and remain valid variable names elsewhere
//! - Fragments injected by rewrite passes must draw node ids from the unit
//!   they are inserted into

mod error;
mod parser;

pub use error::*;
pub use parser::*;

use glcompat_ast::{Expr, ExternalDeclaration, NodeIdGen, TranslationUnit};
use glcompat_lexer::tokenize;

/// Parse a source string into a TranslationUnit AST
pub fn parse(source: &str) -> Result<TranslationUnit, ParseError> {
    let tokens = tokenize(source);
    let mut parser = Parser::new(source, tokens);
    parser.parse_translation_unit()
}

/// Parse a fragment of external declarations, allocating ids from `ids`
pub fn parse_external_declarations(
    source: &str,
    ids: &mut NodeIdGen,
) -> Result<Vec<ExternalDeclaration>, ParseError> {
    let tokens = tokenize(source);
    let mut parser = Parser::with_ids(source, tokens, std::mem::take(ids));
    let result = parser.parse_external_declarations();
    *ids = parser.into_ids();
    result
}

/// Parse a single expression, allocating ids from `ids`
pub fn parse_expression(source: &str, ids: &mut NodeIdGen) -> Result<Expr, ParseError> {
    let tokens = tokenize(source);
    let mut parser = Parser::with_ids(source, tokens, std::mem::take(ids));
    let result = parser.parse_standalone_expression();
    *ids = parser.into_ids();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use glcompat_ast::{
        print_translation_unit, DeclarationKind, ExprKind, ExternalDeclarationKind,
        IdentifierIndex, OccurrenceKind, StatementKind, ToGlsl,
    };

    fn roundtrip(source: &str) -> String {
        let unit = parse(source).unwrap_or_else(|e| panic!("Failed to parse: {:?}", e));
        print_translation_unit(&unit)
    }

    #[test]
    fn test_parse_minimal_vertex_shader() {
        let source = r#"
            #version 120
            void main() {
                gl_Position = ftransform();
                gl_TexCoord[0] = gl_TextureMatrix[0] * gl_MultiTexCoord0;
            }
        "#;
        let result = parse(source);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
        let unit = result.unwrap();
        assert_eq!(unit.declarations.len(), 2);
        assert!(matches!(
            unit.declarations[0].kind,
            ExternalDeclarationKind::Directive(ref text) if text == "#version 120"
        ));
        assert!(unit.function("main").is_some());
    }

    #[test]
    fn test_canonical_print_is_stable() {
        let source = "uniform vec4 entityColor;\nvoid main() {\n  gl_FragColor = entityColor;\n}\n";
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn test_print_reparse_fixpoint() {
        let source = r#"
            #version 150
            layout(triangles) in;
            layout(triangle_strip, max_vertices = 3) out;
            in vec4 color[];
            struct Light { vec3 dir; float power; };
            uniform Light lights[4];
            float shade(in vec3 n, Light l);
            void main() {
                for (int i = 0; i < 3; i++) {
                    if (i == 1) continue; else gl_Position = gl_in[i].gl_Position;
                    EmitVertex();
                }
                EndPrimitive();
            }
        "#;
        let once = roundtrip(source);
        let twice = roundtrip(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_directive_inside_function() {
        let source = "void main() {\n#ifdef FOG\n  color = mix(color, fog, f);\n#endif\n}\n";
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn test_constructor_and_array_constructor() {
        let source = "mat4 m[8] = mat4[8](a, b, mat4(1.0), mat4(1.0), mat4(1.0), mat4(1.0), mat4(1.0), mat4(1.0));";
        let unit = parse(source).unwrap();
        assert_eq!(
            unit.declarations[0].to_glsl(0),
            "mat4 m[8] = mat4[8](a, b, mat4(1.0), mat4(1.0), mat4(1.0), mat4(1.0), mat4(1.0), mat4(1.0));"
        );
    }

    #[test]
    fn test_statement_disambiguation() {
        let source = r#"
            void main() {
                vec4 a = vec4(1.0);
                Light l;
                a = vec4(0.0);
                vec4(1.0);
                foo(a);
                float sample = 1.0;
                sample = 2.0;
            }
        "#;
        let unit = parse(source).unwrap();
        let body = &unit.function("main").unwrap().body.statements;
        let is_decl: Vec<bool> = body
            .iter()
            .map(|s| matches!(s.kind, StatementKind::Declaration(_)))
            .collect();
        assert_eq!(is_decl, vec![true, true, false, false, false, true, false]);
    }

    #[test]
    fn test_contextual_qualifier() {
        let unit = parse("centroid varying vec2 uv;\nsample in vec4 c;").unwrap();
        assert_eq!(roundtrip("centroid varying vec2 uv;"), "centroid varying vec2 uv;\n");
        assert_eq!(unit.declarations.len(), 2);
    }

    #[test]
    fn test_precedence_of_binary_operators() {
        let mut ids = NodeIdGen::new();
        let expr = parse_expression("a + b * c - d", &mut ids).unwrap();
        assert_eq!(expr.to_glsl(0), "a + b * c - d");
        let ExprKind::Binary { left, .. } = &expr.kind else {
            panic!("expected binary expression");
        };
        assert_eq!(left.to_glsl(0), "a + b * c");
    }

    #[test]
    fn test_ternary_and_assignment_are_right_associative() {
        let mut ids = NodeIdGen::new();
        let expr = parse_expression("x = y = c ? 1.0 : d ? 2.0 : 3.0", &mut ids).unwrap();
        assert_eq!(expr.to_glsl(0), "x = y = c ? 1.0 : d ? 2.0 : 3.0");
    }

    #[test]
    fn test_interface_block() {
        let unit = parse("out VertexData {\n  vec4 color;\n} vd;").unwrap();
        let ExternalDeclarationKind::Declaration(decl) = &unit.declarations[0].kind else {
            panic!("expected declaration");
        };
        assert!(matches!(decl.kind, DeclarationKind::Block(_)));
        assert_eq!(print_translation_unit(&unit), "out VertexData {\n  vec4 color;\n} vd;\n");
    }

    #[test]
    fn test_fragment_ids_continue_from_generator() {
        let mut unit = parse("uniform vec4 a;").unwrap();
        let before = unit.ids.allocated();
        let decls = parse_external_declarations("in vec4 b;\nin vec4 c;", &mut unit.ids).unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(unit.ids.allocated(), before + 2);

        unit.declarations.extend(decls);
        let index = IdentifierIndex::build(&unit);
        let ids: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|name| index.occurrences(name)[0].id)
            .collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn test_occurrence_kinds() {
        let unit = parse("vec4 f(vec4 p) { return p; }\nvoid main() { vec4 x = f(x); }").unwrap();
        let index = IdentifierIndex::build(&unit);
        let kinds: Vec<_> = index.occurrences("f").iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![OccurrenceKind::Function, OccurrenceKind::Call]);
        let kinds: Vec<_> = index.occurrences("p").iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![OccurrenceKind::Parameter, OccurrenceKind::Reference]);
        assert_eq!(index.references("x").count(), 1);
    }

    #[test]
    fn test_declared_and_builtin_names() {
        let unit = parse("uniform mat4 proj;\nvoid main() { gl_Position = proj * gl_Vertex; }").unwrap();
        let index = IdentifierIndex::build(&unit);
        assert!(index.is_declared("proj"));
        assert!(index.is_declared("main"));
        assert!(!index.is_declared("gl_Position"));
        assert!(!index.is_declared("missing"));
        assert_eq!(
            index.occurrences_of_kind("proj", OccurrenceKind::Reference).count(),
            1
        );
        let names: Vec<_> = index.names().collect();
        assert_eq!(names, vec!["gl_Position", "gl_Vertex", "main", "proj"]);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_error_missing_semicolon() {
        let err = parse("uniform vec4 a\nvoid main() {}").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }), "{:?}", err);
    }

    #[test]
    fn test_error_unexpected_eof() {
        let err = parse("void main() {").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }), "{:?}", err);
    }

    #[test]
    fn test_error_nested_function() {
        let err = parse("void main() { void f() {} }").unwrap_err();
        assert!(matches!(err, ParseError::NestedFunction { .. }), "{:?}", err);
    }

    #[test]
    fn test_error_trailing_expression_input() {
        let mut ids = NodeIdGen::new();
        let err = parse_expression("a b", &mut ids).unwrap_err();
        assert!(matches!(err, ParseError::TrailingInput { .. }), "{:?}", err);
    }
}
