//! Canonical text printer for the shader AST
//!
//! Serializes the tree back to GLSL source. Uses two-space indentation, one
//! external declaration per line, and inserts parentheses only where operator
//! precedence requires them (explicit groups from the source are kept).

use crate::{
    ArraySpecifier, Block, Callee, Declaration, DeclarationKind, Declarator, Expr, ExprKind,
    ExternalDeclaration, ExternalDeclarationKind, FullySpecifiedType, FunctionDefinition,
    FunctionPrototype, InterfaceBlock, LayoutQualifier, Literal, MemberDeclaration,
    ParameterDeclaration, Precedence, Statement, StatementKind, StructSpecifier,
    TranslationUnit, TypeQualifier, TypeSpecifier, TypeSpecifierKind, UnaryOp,
    VariableDeclaration,
};

/// Trait for converting AST nodes to shader source text.
pub trait ToGlsl {
    /// Convert to source text with the given indentation level.
    fn to_glsl(&self, indent: usize) -> String;
}

/// Helper to generate indentation string (two spaces per level).
fn indent_str(level: usize) -> String {
    "  ".repeat(level)
}

/// Print a whole translation unit, terminated by a newline
pub fn print_translation_unit(unit: &TranslationUnit) -> String {
    let mut out = unit.to_glsl(0);
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

// ===== Translation unit =====

impl ToGlsl for TranslationUnit {
    fn to_glsl(&self, indent: usize) -> String {
        self.declarations
            .iter()
            .map(|decl| decl.to_glsl(indent))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ToGlsl for ExternalDeclaration {
    fn to_glsl(&self, indent: usize) -> String {
        match &self.kind {
            ExternalDeclarationKind::Directive(text) => text.clone(),
            ExternalDeclarationKind::Declaration(decl) => {
                format!("{}{}", indent_str(indent), decl.to_glsl(indent))
            }
            ExternalDeclarationKind::Function(func) => {
                format!("{}{}", indent_str(indent), func.to_glsl(indent))
            }
            ExternalDeclarationKind::Empty => format!("{};", indent_str(indent)),
        }
    }
}

// ===== Declarations =====

// Declarations print without leading indentation; the enclosing node supplies it.
impl ToGlsl for Declaration {
    fn to_glsl(&self, indent: usize) -> String {
        match &self.kind {
            DeclarationKind::Variables(vars) => format!("{};", vars.to_glsl(indent)),
            DeclarationKind::Prototype(proto) => format!("{};", proto.to_glsl(indent)),
            DeclarationKind::Precision { precision, ty } => {
                format!("precision {} {};", precision.keyword(), ty.to_glsl(indent))
            }
            DeclarationKind::Qualifiers(qualifiers) => format!("{};", qualifier_list(qualifiers)),
            DeclarationKind::Block(block) => format!("{};", block.to_glsl(indent)),
        }
    }
}

impl ToGlsl for VariableDeclaration {
    fn to_glsl(&self, indent: usize) -> String {
        let mut out = with_qualifiers(&self.qualifiers, self.ty.to_glsl(indent));
        if !self.declarators.is_empty() {
            out.push(' ');
            out.push_str(&declarator_list(&self.declarators, indent));
        }
        out
    }
}

impl ToGlsl for Declarator {
    fn to_glsl(&self, indent: usize) -> String {
        let mut out = self.name.name.clone();
        if let Some(array) = &self.array {
            out.push_str(&array.to_glsl(indent));
        }
        if let Some(init) = &self.initializer {
            out.push_str(" = ");
            out.push_str(&print_expr(init, Precedence::Assignment));
        }
        out
    }
}

impl ToGlsl for InterfaceBlock {
    fn to_glsl(&self, indent: usize) -> String {
        let mut out = with_qualifiers(&self.qualifiers, self.name.clone());
        out.push_str(&member_block(&self.members, indent));
        if let Some(instance) = &self.instance {
            out.push(' ');
            out.push_str(&instance.to_glsl(indent));
        }
        out
    }
}

impl ToGlsl for FunctionPrototype {
    fn to_glsl(&self, indent: usize) -> String {
        let params = self
            .params
            .iter()
            .map(|p| p.to_glsl(indent))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} {}({})", self.return_type.to_glsl(indent), self.name.name, params)
    }
}

impl ToGlsl for ParameterDeclaration {
    fn to_glsl(&self, indent: usize) -> String {
        let mut out = with_qualifiers(&self.qualifiers, self.ty.to_glsl(indent));
        if let Some(name) = &self.name {
            out.push(' ');
            out.push_str(&name.name);
        }
        if let Some(array) = &self.array {
            out.push_str(&array.to_glsl(indent));
        }
        out
    }
}

impl ToGlsl for FunctionDefinition {
    fn to_glsl(&self, indent: usize) -> String {
        format!("{} {}", self.prototype.to_glsl(indent), self.body.to_glsl(indent))
    }
}

// ===== Types =====

impl ToGlsl for FullySpecifiedType {
    fn to_glsl(&self, indent: usize) -> String {
        with_qualifiers(&self.qualifiers, self.ty.to_glsl(indent))
    }
}

impl ToGlsl for TypeSpecifier {
    fn to_glsl(&self, indent: usize) -> String {
        let mut out = match &self.kind {
            TypeSpecifierKind::Named(name) => name.clone(),
            TypeSpecifierKind::Struct(spec) => spec.to_glsl(indent),
        };
        if let Some(array) = &self.array {
            out.push_str(&array.to_glsl(indent));
        }
        out
    }
}

impl ToGlsl for StructSpecifier {
    fn to_glsl(&self, indent: usize) -> String {
        let head = match &self.name {
            Some(name) => format!("struct {}", name),
            None => "struct".to_string(),
        };
        format!("{}{}", head, member_block(&self.members, indent))
    }
}

impl ToGlsl for MemberDeclaration {
    fn to_glsl(&self, indent: usize) -> String {
        let ty = with_qualifiers(&self.qualifiers, self.ty.to_glsl(indent));
        format!("{} {};", ty, declarator_list(&self.declarators, indent))
    }
}

impl ToGlsl for ArraySpecifier {
    fn to_glsl(&self, _indent: usize) -> String {
        self.dimensions
            .iter()
            .map(|dim| match dim {
                Some(size) => format!("[{}]", print_expr(size, Precedence::Assignment)),
                None => "[]".to_string(),
            })
            .collect()
    }
}

impl ToGlsl for TypeQualifier {
    fn to_glsl(&self, _indent: usize) -> String {
        match self {
            TypeQualifier::Storage(storage) => storage.keyword().to_string(),
            TypeQualifier::Layout(items) => format!(
                "layout({})",
                items.iter().map(layout_item).collect::<Vec<_>>().join(", ")
            ),
            TypeQualifier::Precision(precision) => precision.keyword().to_string(),
            TypeQualifier::Interpolation(interp) => interp.keyword().to_string(),
            TypeQualifier::Invariant => "invariant".to_string(),
            TypeQualifier::Precise => "precise".to_string(),
        }
    }
}

fn layout_item(item: &LayoutQualifier) -> String {
    match &item.value {
        Some(value) => format!("{} = {}", item.name, print_expr(value, Precedence::Assignment)),
        None => item.name.clone(),
    }
}

fn qualifier_list(qualifiers: &[TypeQualifier]) -> String {
    qualifiers
        .iter()
        .map(|q| q.to_glsl(0))
        .collect::<Vec<_>>()
        .join(" ")
}

fn with_qualifiers(qualifiers: &[TypeQualifier], rest: String) -> String {
    if qualifiers.is_empty() {
        rest
    } else {
        format!("{} {}", qualifier_list(qualifiers), rest)
    }
}

fn declarator_list(declarators: &[Declarator], indent: usize) -> String {
    declarators
        .iter()
        .map(|d| d.to_glsl(indent))
        .collect::<Vec<_>>()
        .join(", ")
}

fn member_block(members: &[MemberDeclaration], indent: usize) -> String {
    let mut lines = vec![" {".to_string()];
    for member in members {
        lines.push(format!("{}{}", indent_str(indent + 1), member.to_glsl(indent + 1)));
    }
    lines.push(format!("{}}}", indent_str(indent)));
    lines.join("\n")
}

// ===== Statements =====

impl ToGlsl for Block {
    fn to_glsl(&self, indent: usize) -> String {
        let mut lines = vec!["{".to_string()];
        for stmt in &self.statements {
            lines.push(stmt.to_glsl(indent + 1));
        }
        lines.push(format!("{}}}", indent_str(indent)));
        lines.join("\n")
    }
}

impl ToGlsl for Statement {
    fn to_glsl(&self, indent: usize) -> String {
        let ind = indent_str(indent);
        match &self.kind {
            StatementKind::Declaration(decl) => format!("{}{}", ind, decl.to_glsl(indent)),
            StatementKind::Expr(expr) => format!("{}{};", ind, print_expr(expr, Precedence::Sequence)),
            StatementKind::Block(block) => format!("{}{}", ind, block.to_glsl(indent)),
            StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut out = format!(
                    "{}if ({}){}",
                    ind,
                    print_expr(condition, Precedence::Sequence),
                    branch(then_branch, indent)
                );
                if let Some(else_branch) = else_branch {
                    // Keep `else if` chains flat
                    if matches!(then_branch.kind, StatementKind::Block(_)) {
                        out.push_str(" else");
                    } else {
                        out.push_str(&format!("\n{}else", ind));
                    }
                    if matches!(else_branch.kind, StatementKind::If { .. }) {
                        out.push(' ');
                        out.push_str(else_branch.to_glsl(indent).trim_start());
                    } else {
                        out.push_str(&branch(else_branch, indent));
                    }
                }
                out
            }
            StatementKind::For {
                init,
                condition,
                step,
                body,
            } => {
                let init = match init {
                    Some(init) => init.to_glsl(0),
                    None => ";".to_string(),
                };
                let condition = condition
                    .as_ref()
                    .map(|c| print_expr(c, Precedence::Sequence))
                    .unwrap_or_default();
                let step = step
                    .as_ref()
                    .map(|s| format!(" {}", print_expr(s, Precedence::Sequence)))
                    .unwrap_or_default();
                format!("{}for ({} {};{}){}", ind, init, condition, step, branch(body, indent))
            }
            StatementKind::While { condition, body } => format!(
                "{}while ({}){}",
                ind,
                print_expr(condition, Precedence::Sequence),
                branch(body, indent)
            ),
            StatementKind::DoWhile { body, condition } => format!(
                "{}do{}{}while ({});",
                ind,
                branch(body, indent),
                if matches!(body.kind, StatementKind::Block(_)) {
                    " ".to_string()
                } else {
                    format!("\n{}", ind)
                },
                print_expr(condition, Precedence::Sequence)
            ),
            StatementKind::Switch { selector, body } => format!(
                "{}switch ({}) {}",
                ind,
                print_expr(selector, Precedence::Sequence),
                body.to_glsl(indent)
            ),
            StatementKind::Case(value) => {
                format!("{}case {}:", ind, print_expr(value, Precedence::Sequence))
            }
            StatementKind::Default => format!("{}default:", ind),
            StatementKind::Return(Some(value)) => {
                format!("{}return {};", ind, print_expr(value, Precedence::Sequence))
            }
            StatementKind::Return(None) => format!("{}return;", ind),
            StatementKind::Break => format!("{}break;", ind),
            StatementKind::Continue => format!("{}continue;", ind),
            StatementKind::Discard => format!("{}discard;", ind),
            StatementKind::Empty => format!("{};", ind),
            // Preprocessor lines start at column 0
            StatementKind::Directive(text) => text.clone(),
        }
    }
}

/// Body of a control-flow statement: braces stay on the header line
fn branch(stmt: &Statement, indent: usize) -> String {
    match &stmt.kind {
        StatementKind::Block(block) => format!(" {}", block.to_glsl(indent)),
        _ => format!("\n{}", stmt.to_glsl(indent + 1)),
    }
}

// ===== Expressions =====

impl ToGlsl for Expr {
    fn to_glsl(&self, _indent: usize) -> String {
        print_expr(self, Precedence::Sequence)
    }
}

/// Print an expression, parenthesizing it if it binds looser than `min`
pub fn print_expr(expr: &Expr, min: Precedence) -> String {
    let text = match &expr.kind {
        ExprKind::Literal(lit) => match lit {
            Literal::Int(text) | Literal::Float(text) => text.clone(),
            Literal::Bool(value) => value.to_string(),
        },
        ExprKind::Ident(ident) => ident.name.clone(),
        ExprKind::Group(inner) => format!("({})", print_expr(inner, Precedence::Sequence)),
        ExprKind::Binary { op, left, right } => {
            let prec = op.precedence();
            format!(
                "{} {} {}",
                print_expr(left, prec),
                op.symbol(),
                print_expr(right, prec.tighter())
            )
        }
        ExprKind::Unary { op, operand } => {
            let inner = print_expr(operand, Precedence::Unary);
            // `- -x` must not collapse into a decrement
            let needs_space = matches!(op, UnaryOp::Neg | UnaryOp::Plus | UnaryOp::PreInc | UnaryOp::PreDec)
                && (inner.starts_with('-') || inner.starts_with('+'));
            if needs_space {
                format!("{} {}", op.symbol(), inner)
            } else {
                format!("{}{}", op.symbol(), inner)
            }
        }
        ExprKind::Postfix { op, operand } => {
            format!("{}{}", print_expr(operand, Precedence::Postfix), op.symbol())
        }
        ExprKind::Assign { op, target, value } => format!(
            "{} {} {}",
            print_expr(target, Precedence::Unary),
            op.symbol(),
            print_expr(value, Precedence::Assignment)
        ),
        ExprKind::Ternary {
            condition,
            then_expr,
            else_expr,
        } => format!(
            "{} ? {} : {}",
            print_expr(condition, Precedence::LogicalOr),
            print_expr(then_expr, Precedence::Sequence),
            print_expr(else_expr, Precedence::Assignment)
        ),
        ExprKind::Call { callee, args } => {
            let callee = match callee {
                Callee::Function(ident) => ident.name.clone(),
                Callee::Constructor(ty) => ty.to_glsl(0),
            };
            let args = args
                .iter()
                .map(|a| print_expr(a, Precedence::Assignment))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}({})", callee, args)
        }
        ExprKind::Member { object, field } => {
            format!("{}.{}", print_expr(object, Precedence::Postfix), field)
        }
        ExprKind::Index { object, index } => format!(
            "{}[{}]",
            print_expr(object, Precedence::Postfix),
            print_expr(index, Precedence::Sequence)
        ),
        ExprKind::Sequence(items) => items
            .iter()
            .map(|e| print_expr(e, Precedence::Assignment))
            .collect::<Vec<_>>()
            .join(", "),
    };

    if expr.kind.precedence() < min {
        format!("({})", text)
    } else {
        text
    }
}
