//! Recursive descent parser implementation

use glcompat_ast::*;
use glcompat_lexer::{Token, TokenKind};

use crate::ParseError;

/// Identifiers that act as qualifiers only when a declaration follows them.
/// Older shaders use several of these (`sample`, `patch`, ...) as variable names.
const CONTEXTUAL_QUALIFIERS: &[&str] = &[
    "centroid",
    "sample",
    "patch",
    "buffer",
    "shared",
    "precise",
    "noperspective",
];

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    ids: NodeIdGen,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self::with_ids(source, tokens, NodeIdGen::new())
    }

    /// Create a parser that allocates identifier ids from an existing generator
    pub fn with_ids(source: &'a str, tokens: Vec<Token>, ids: NodeIdGen) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            ids,
        }
    }

    /// Hand the id generator back, e.g. to the translation unit being edited
    pub fn into_ids(self) -> NodeIdGen {
        self.ids
    }

    // === Utilities ===

    fn current(&self) -> Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .copied()
            .unwrap_or(Token {
                kind: TokenKind::Eof,
                span: Span::new(self.source.len(), self.source.len()),
            })
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_ahead(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn text_ahead(&self, n: usize) -> &'a str {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.text(self.source))
            .unwrap_or("")
    }

    fn advance(&mut self) -> Token {
        let token = self.current();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(
                kind.describe(),
                self.peek(),
                self.current().span,
            ))
        }
    }

    fn text(&self, token: Token) -> &'a str {
        token.text(self.source)
    }

    fn span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token
    fn prev_span(&self) -> Span {
        if self.pos == 0 {
            return self.span();
        }
        self.tokens[self.pos - 1].span
    }

    fn ident(&mut self) -> Result<Identifier, ParseError> {
        let token = self.consume(TokenKind::Ident)?;
        let name = self.text(token);
        Ok(Identifier::new(name, self.ids.fresh(), token.span))
    }

    // === Translation unit ===

    pub fn parse_translation_unit(&mut self) -> Result<TranslationUnit, ParseError> {
        let start = self.span();
        let declarations = self.parse_external_declarations()?;
        let end = self.span();
        Ok(TranslationUnit {
            declarations,
            span: start.merge(end),
            ids: std::mem::take(&mut self.ids),
        })
    }

    /// Parse external declarations until end of input
    pub fn parse_external_declarations(&mut self) -> Result<Vec<ExternalDeclaration>, ParseError> {
        let mut declarations = Vec::new();
        while !self.at(TokenKind::Eof) {
            declarations.push(self.parse_external_declaration()?);
        }
        Ok(declarations)
    }

    /// Parse a single expression spanning the entire input
    pub fn parse_standalone_expression(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        if !self.at(TokenKind::Eof) {
            return Err(ParseError::TrailingInput {
                what: "expression",
                span: self.span(),
            });
        }
        Ok(expr)
    }

    fn parse_external_declaration(&mut self) -> Result<ExternalDeclaration, ParseError> {
        let start = self.span();

        let kind = match self.peek() {
            TokenKind::Directive => {
                let token = self.advance();
                ExternalDeclarationKind::Directive(self.text(token).trim_end().to_string())
            }
            TokenKind::Semicolon => {
                self.advance();
                ExternalDeclarationKind::Empty
            }
            _ => self.parse_declaration_or_function(true)?,
        };

        Ok(ExternalDeclaration {
            kind,
            span: start.merge(self.prev_span()),
        })
    }

    // === Declarations ===

    fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        match self.parse_declaration_or_function(false)? {
            ExternalDeclarationKind::Declaration(decl) => Ok(decl),
            _ => Err(ParseError::ExpectedDeclaration { span: self.prev_span() }),
        }
    }

    fn parse_declaration_or_function(
        &mut self,
        allow_function: bool,
    ) -> Result<ExternalDeclarationKind, ParseError> {
        let start = self.span();

        if self.at(TokenKind::Precision) {
            self.advance();
            let precision = match self.peek() {
                TokenKind::HighP => PrecisionQualifier::High,
                TokenKind::MediumP => PrecisionQualifier::Medium,
                TokenKind::LowP => PrecisionQualifier::Low,
                found => {
                    return Err(ParseError::unexpected("precision qualifier", found, self.span()))
                }
            };
            self.advance();
            let ty = self.parse_type_specifier()?;
            self.consume(TokenKind::Semicolon)?;
            return Ok(self.declaration(DeclarationKind::Precision { precision, ty }, start));
        }

        let qualifiers = self.parse_qualifiers()?;

        // `layout(triangles) in;`
        if !qualifiers.is_empty() && self.eat(TokenKind::Semicolon) {
            return Ok(self.declaration(DeclarationKind::Qualifiers(qualifiers), start));
        }

        // `out VertexData { ... } vd;`
        if !qualifiers.is_empty()
            && self.at(TokenKind::Ident)
            && self.peek_ahead(1) == TokenKind::LBrace
        {
            let block = self.parse_interface_block(qualifiers, start)?;
            return Ok(self.declaration(DeclarationKind::Block(block), start));
        }

        if !self.at(TokenKind::Ident) && !self.at(TokenKind::Struct) {
            return Err(ParseError::ExpectedDeclaration { span: self.span() });
        }
        let ty = self.parse_type_specifier()?;

        // `struct Light { ... };`
        if self.eat(TokenKind::Semicolon) {
            let vars = VariableDeclaration {
                qualifiers,
                ty,
                declarators: vec![],
                span: start.merge(self.prev_span()),
            };
            return Ok(self.declaration(DeclarationKind::Variables(vars), start));
        }

        let name = self.ident()?;

        if self.at(TokenKind::LParen) {
            let return_type = FullySpecifiedType {
                span: start.merge(ty.span),
                qualifiers,
                ty,
            };
            let prototype = self.parse_prototype_rest(return_type, name, start)?;

            if self.at(TokenKind::LBrace) {
                if !allow_function {
                    return Err(ParseError::NestedFunction { span: self.span() });
                }
                let body = self.parse_block()?;
                return Ok(ExternalDeclarationKind::Function(FunctionDefinition {
                    prototype,
                    body,
                    span: start.merge(self.prev_span()),
                }));
            }

            self.consume(TokenKind::Semicolon)?;
            return Ok(self.declaration(DeclarationKind::Prototype(prototype), start));
        }

        let mut declarators = vec![self.finish_declarator(name, true)?];
        while self.eat(TokenKind::Comma) {
            let name = self.ident()?;
            declarators.push(self.finish_declarator(name, true)?);
        }
        self.consume(TokenKind::Semicolon)?;

        let vars = VariableDeclaration {
            qualifiers,
            ty,
            declarators,
            span: start.merge(self.prev_span()),
        };
        Ok(self.declaration(DeclarationKind::Variables(vars), start))
    }

    fn declaration(&self, kind: DeclarationKind, start: Span) -> ExternalDeclarationKind {
        ExternalDeclarationKind::Declaration(Declaration {
            kind,
            span: start.merge(self.prev_span()),
        })
    }

    fn finish_declarator(
        &mut self,
        name: Identifier,
        allow_initializer: bool,
    ) -> Result<Declarator, ParseError> {
        let start = name.span;
        let array = self.parse_array_specifier()?;
        let initializer = if allow_initializer && self.eat(TokenKind::Eq) {
            Some(self.parse_assignment()?)
        } else {
            None
        };
        Ok(Declarator {
            name,
            array,
            initializer,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_prototype_rest(
        &mut self,
        return_type: FullySpecifiedType,
        name: Identifier,
        start: Span,
    ) -> Result<FunctionPrototype, ParseError> {
        self.consume(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                params.push(self.parse_parameter()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen)?;

        Ok(FunctionPrototype {
            return_type,
            name,
            params,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_parameter(&mut self) -> Result<ParameterDeclaration, ParseError> {
        let start = self.span();
        let qualifiers = self.parse_qualifiers()?;
        let ty = self.parse_type_specifier()?;
        let name = if self.at(TokenKind::Ident) {
            Some(self.ident()?)
        } else {
            None
        };
        let array = if name.is_some() {
            self.parse_array_specifier()?
        } else {
            None
        };
        Ok(ParameterDeclaration {
            qualifiers,
            ty,
            name,
            array,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_interface_block(
        &mut self,
        qualifiers: Vec<TypeQualifier>,
        start: Span,
    ) -> Result<InterfaceBlock, ParseError> {
        let name_token = self.consume(TokenKind::Ident)?;
        let name = self.text(name_token).to_string();
        let members = self.parse_member_block()?;
        let instance = if self.at(TokenKind::Ident) {
            let ident = self.ident()?;
            Some(self.finish_declarator(ident, false)?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon)?;

        Ok(InterfaceBlock {
            qualifiers,
            name,
            members,
            instance,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_member_block(&mut self) -> Result<Vec<MemberDeclaration>, ParseError> {
        self.consume(TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let start = self.span();
            let qualifiers = self.parse_qualifiers()?;
            let ty = self.parse_type_specifier()?;
            let mut declarators = Vec::new();
            loop {
                let name = self.ident()?;
                declarators.push(self.finish_declarator(name, false)?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.consume(TokenKind::Semicolon)?;
            members.push(MemberDeclaration {
                qualifiers,
                ty,
                declarators,
                span: start.merge(self.prev_span()),
            });
        }
        self.consume(TokenKind::RBrace)?;
        Ok(members)
    }

    // === Types and qualifiers ===

    fn parse_qualifiers(&mut self) -> Result<Vec<TypeQualifier>, ParseError> {
        let mut qualifiers = Vec::new();
        loop {
            let qualifier = match self.peek() {
                TokenKind::Const => TypeQualifier::Storage(StorageQualifier::Const),
                TokenKind::In => TypeQualifier::Storage(StorageQualifier::In),
                TokenKind::Out => TypeQualifier::Storage(StorageQualifier::Out),
                TokenKind::InOut => TypeQualifier::Storage(StorageQualifier::InOut),
                TokenKind::Attribute => TypeQualifier::Storage(StorageQualifier::Attribute),
                TokenKind::Uniform => TypeQualifier::Storage(StorageQualifier::Uniform),
                TokenKind::Varying => TypeQualifier::Storage(StorageQualifier::Varying),
                TokenKind::Invariant => TypeQualifier::Invariant,
                TokenKind::Flat => TypeQualifier::Interpolation(InterpolationQualifier::Flat),
                TokenKind::Smooth => TypeQualifier::Interpolation(InterpolationQualifier::Smooth),
                TokenKind::HighP => TypeQualifier::Precision(PrecisionQualifier::High),
                TokenKind::MediumP => TypeQualifier::Precision(PrecisionQualifier::Medium),
                TokenKind::LowP => TypeQualifier::Precision(PrecisionQualifier::Low),
                TokenKind::Layout => {
                    qualifiers.push(self.parse_layout()?);
                    continue;
                }
                TokenKind::Ident if self.contextual_qualifier_at(0) => {
                    match self.text_ahead(0) {
                        "centroid" => TypeQualifier::Storage(StorageQualifier::Centroid),
                        "sample" => TypeQualifier::Storage(StorageQualifier::Sample),
                        "patch" => TypeQualifier::Storage(StorageQualifier::Patch),
                        "buffer" => TypeQualifier::Storage(StorageQualifier::Buffer),
                        "shared" => TypeQualifier::Storage(StorageQualifier::Shared),
                        "precise" => TypeQualifier::Precise,
                        _ => TypeQualifier::Interpolation(InterpolationQualifier::NoPerspective),
                    }
                }
                _ => break,
            };
            self.advance();
            qualifiers.push(qualifier);
        }
        Ok(qualifiers)
    }

    /// Whether the identifier `n` tokens ahead is a contextual qualifier in qualifier position
    fn contextual_qualifier_at(&self, n: usize) -> bool {
        if self.peek_ahead(n) != TokenKind::Ident
            || !CONTEXTUAL_QUALIFIERS.contains(&self.text_ahead(n))
        {
            return false;
        }
        let next = self.peek_ahead(n + 1);
        next.is_qualifier() || next == TokenKind::Ident || next == TokenKind::Struct
    }

    fn parse_layout(&mut self) -> Result<TypeQualifier, ParseError> {
        self.consume(TokenKind::Layout)?;
        self.consume(TokenKind::LParen)?;
        let mut items = Vec::new();
        loop {
            let token = self.consume(TokenKind::Ident)?;
            let name = self.text(token).to_string();
            let value = if self.eat(TokenKind::Eq) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            items.push(LayoutQualifier {
                name,
                value,
                span: token.span.merge(self.prev_span()),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.consume(TokenKind::RParen)?;
        Ok(TypeQualifier::Layout(items))
    }

    fn parse_type_specifier(&mut self) -> Result<TypeSpecifier, ParseError> {
        let start = self.span();
        let kind = match self.peek() {
            TokenKind::Ident => {
                let token = self.advance();
                TypeSpecifierKind::Named(self.text(token).to_string())
            }
            TokenKind::Struct => TypeSpecifierKind::Struct(self.parse_struct_specifier()?),
            _ => return Err(ParseError::InvalidType { span: start }),
        };
        let array = self.parse_array_specifier()?;
        Ok(TypeSpecifier {
            kind,
            array,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_struct_specifier(&mut self) -> Result<StructSpecifier, ParseError> {
        let start = self.span();
        self.consume(TokenKind::Struct)?;
        let name = if self.at(TokenKind::Ident) {
            let token = self.advance();
            Some(self.text(token).to_string())
        } else {
            None
        };
        let members = self.parse_member_block()?;
        Ok(StructSpecifier {
            name,
            members,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_array_specifier(&mut self) -> Result<Option<ArraySpecifier>, ParseError> {
        if !self.at(TokenKind::LBracket) {
            return Ok(None);
        }
        let start = self.span();
        let mut dimensions = Vec::new();
        while self.eat(TokenKind::LBracket) {
            if self.eat(TokenKind::RBracket) {
                dimensions.push(None);
            } else {
                dimensions.push(Some(self.parse_assignment()?));
                self.consume(TokenKind::RBracket)?;
            }
        }
        Ok(Some(ArraySpecifier {
            dimensions,
            span: start.merge(self.prev_span()),
        }))
    }

    // === Statements ===

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let start = self.span();
        self.consume(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        self.consume(TokenKind::RBrace)?;
        Ok(Block {
            statements,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.span();

        let kind = match self.peek() {
            TokenKind::LBrace => StatementKind::Block(self.parse_block()?),
            TokenKind::If => {
                self.advance();
                self.consume(TokenKind::LParen)?;
                let condition = self.parse_expr()?;
                self.consume(TokenKind::RParen)?;
                let then_branch = Box::new(self.parse_statement()?);
                let else_branch = if self.eat(TokenKind::Else) {
                    Some(Box::new(self.parse_statement()?))
                } else {
                    None
                };
                StatementKind::If {
                    condition,
                    then_branch,
                    else_branch,
                }
            }
            TokenKind::For => self.parse_for()?,
            TokenKind::While => {
                self.advance();
                self.consume(TokenKind::LParen)?;
                let condition = self.parse_expr()?;
                self.consume(TokenKind::RParen)?;
                let body = Box::new(self.parse_statement()?);
                StatementKind::While { condition, body }
            }
            TokenKind::Do => {
                self.advance();
                let body = Box::new(self.parse_statement()?);
                self.consume(TokenKind::While)?;
                self.consume(TokenKind::LParen)?;
                let condition = self.parse_expr()?;
                self.consume(TokenKind::RParen)?;
                self.consume(TokenKind::Semicolon)?;
                StatementKind::DoWhile { body, condition }
            }
            TokenKind::Switch => {
                self.advance();
                self.consume(TokenKind::LParen)?;
                let selector = self.parse_expr()?;
                self.consume(TokenKind::RParen)?;
                let body = self.parse_block()?;
                StatementKind::Switch { selector, body }
            }
            TokenKind::Case => {
                self.advance();
                let value = self.parse_expr()?;
                self.consume(TokenKind::Colon)?;
                StatementKind::Case(value)
            }
            TokenKind::Default => {
                self.advance();
                self.consume(TokenKind::Colon)?;
                StatementKind::Default
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.at(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.consume(TokenKind::Semicolon)?;
                StatementKind::Return(value)
            }
            TokenKind::Break => self.keyword_statement(StatementKind::Break)?,
            TokenKind::Continue => self.keyword_statement(StatementKind::Continue)?,
            TokenKind::Discard => self.keyword_statement(StatementKind::Discard)?,
            TokenKind::Semicolon => {
                self.advance();
                StatementKind::Empty
            }
            TokenKind::Directive => {
                let token = self.advance();
                StatementKind::Directive(self.text(token).trim_end().to_string())
            }
            _ => return self.parse_simple_statement(),
        };

        Ok(Statement {
            kind,
            span: start.merge(self.prev_span()),
        })
    }

    fn keyword_statement(&mut self, kind: StatementKind) -> Result<StatementKind, ParseError> {
        self.advance();
        self.consume(TokenKind::Semicolon)?;
        Ok(kind)
    }

    /// Declaration or expression statement, including the trailing `;`
    fn parse_simple_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.span();
        let kind = if self.is_declaration_start() {
            StatementKind::Declaration(self.parse_declaration()?)
        } else {
            let expr = self.parse_expr()?;
            self.consume(TokenKind::Semicolon)?;
            StatementKind::Expr(expr)
        };
        Ok(Statement {
            kind,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_for(&mut self) -> Result<StatementKind, ParseError> {
        self.consume(TokenKind::For)?;
        self.consume(TokenKind::LParen)?;

        let init = if self.eat(TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_simple_statement()?))
        };
        let condition = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume(TokenKind::Semicolon)?;
        let step = if self.at(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume(TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);

        Ok(StatementKind::For {
            init,
            condition,
            step,
            body,
        })
    }

    /// Decide whether the statement at the cursor is a declaration.
    ///
    /// Declarations start with a qualifier, `struct`, `precision`, a builtin
    /// type followed by a declarator, or a user type name followed by a name.
    fn is_declaration_start(&self) -> bool {
        match self.peek() {
            kind if kind.is_qualifier() => true,
            TokenKind::Struct | TokenKind::Precision => true,
            TokenKind::Ident => {
                if self.contextual_qualifier_at(0) {
                    return true;
                }
                if is_builtin_type(self.text_ahead(0)) {
                    return self.declarator_follows(1);
                }
                self.peek_ahead(1) == TokenKind::Ident
            }
            _ => false,
        }
    }

    /// Whether a declarator name follows at `n`, skipping an array specifier
    fn declarator_follows(&self, mut n: usize) -> bool {
        let mut depth = 0usize;
        loop {
            match self.peek_ahead(n) {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket if depth > 0 => depth -= 1,
                TokenKind::Eof => return false,
                TokenKind::Ident if depth == 0 => return true,
                _ if depth == 0 => return false,
                _ => {}
            }
            n += 1;
        }
    }

    // === Expressions ===

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.span();
        let first = self.parse_assignment()?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(TokenKind::Comma) {
            items.push(self.parse_assignment()?);
        }
        Ok(Expr::new(ExprKind::Sequence(items), start.merge(self.prev_span())))
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let start = self.span();
        let target = self.parse_ternary()?;

        let op = match self.peek() {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Mod,
            TokenKind::ShlEq => AssignOp::Shl,
            TokenKind::ShrEq => AssignOp::Shr,
            TokenKind::AmpEq => AssignOp::BitAnd,
            TokenKind::PipeEq => AssignOp::BitOr,
            TokenKind::CaretEq => AssignOp::BitXor,
            _ => return Ok(target),
        };
        self.advance();
        let value = self.parse_assignment()?;

        Ok(Expr::new(
            ExprKind::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            start.merge(self.prev_span()),
        ))
    }

    fn parse_ternary(&mut self) -> Result<Expr, ParseError> {
        let start = self.span();
        let condition = self.parse_binary(Precedence::LogicalOr)?;
        if !self.eat(TokenKind::Question) {
            return Ok(condition);
        }
        let then_expr = self.parse_expr()?;
        self.consume(TokenKind::Colon)?;
        let else_expr = self.parse_assignment()?;

        Ok(Expr::new(
            ExprKind::Ternary {
                condition: Box::new(condition),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            start.merge(self.prev_span()),
        ))
    }

    /// Precedence climbing over the left-associative binary operators
    fn parse_binary(&mut self, min: Precedence) -> Result<Expr, ParseError> {
        let start = self.span();
        let mut left = self.parse_unary()?;

        while let Some(op) = binary_op(self.peek()) {
            let prec = op.precedence();
            if prec < min {
                break;
            }
            self.advance();
            let right = self.parse_binary(prec.tighter())?;
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                start.merge(self.prev_span()),
            );
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let start = self.span();
        let op = match self.peek() {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::PlusPlus => UnaryOp::PreInc,
            TokenKind::MinusMinus => UnaryOp::PreDec,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            start.merge(self.prev_span()),
        ))
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let start = self.span();
        let mut expr = self.parse_primary()?;

        loop {
            let kind = match self.peek() {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.consume(TokenKind::RBracket)?;
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                TokenKind::Dot => {
                    self.advance();
                    let token = self.consume(TokenKind::Ident)?;
                    ExprKind::Member {
                        object: Box::new(expr),
                        field: self.text(token).to_string(),
                    }
                }
                TokenKind::PlusPlus => {
                    self.advance();
                    ExprKind::Postfix {
                        op: PostfixOp::Inc,
                        operand: Box::new(expr),
                    }
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    ExprKind::Postfix {
                        op: PostfixOp::Dec,
                        operand: Box::new(expr),
                    }
                }
                _ => break,
            };
            expr = Expr::new(kind, start.merge(self.prev_span()));
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.span();

        let kind = match self.peek() {
            TokenKind::Int => {
                let token = self.advance();
                ExprKind::Literal(Literal::Int(self.text(token).to_string()))
            }
            TokenKind::Float => {
                let token = self.advance();
                ExprKind::Literal(Literal::Float(self.text(token).to_string()))
            }
            TokenKind::True => {
                self.advance();
                ExprKind::Literal(Literal::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Literal(Literal::Bool(false))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.consume(TokenKind::RParen)?;
                ExprKind::Group(Box::new(inner))
            }
            TokenKind::Ident if is_builtin_type(self.text_ahead(0)) => {
                // Constructor: `vec4(...)`, `mat4[8](...)`
                let ty = self.parse_type_specifier()?;
                let args = self.parse_call_args()?;
                ExprKind::Call {
                    callee: Callee::Constructor(ty),
                    args,
                }
            }
            TokenKind::Ident => {
                let ident = self.ident()?;
                if self.at(TokenKind::LParen) {
                    let args = self.parse_call_args()?;
                    ExprKind::Call {
                        callee: Callee::Function(ident),
                        args,
                    }
                } else {
                    ExprKind::Ident(ident)
                }
            }
            TokenKind::Error => return Err(ParseError::InvalidToken { span: start }),
            TokenKind::Eof => return Err(ParseError::UnexpectedEof { span: start }),
            _ => return Err(ParseError::InvalidExpression { span: start }),
        };

        Ok(Expr::new(kind, start.merge(self.prev_span())))
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.consume(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                args.push(self.parse_assignment()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen)?;
        Ok(args)
    }
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::Ne => BinaryOp::Ne,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Le => BinaryOp::Le,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::Ge => BinaryOp::Ge,
        TokenKind::AndAnd => BinaryOp::And,
        TokenKind::OrOr => BinaryOp::Or,
        TokenKind::CaretCaret => BinaryOp::Xor,
        _ => return None,
    };
    Some(op)
}
