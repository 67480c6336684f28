//! Tree traversal
//!
//! [`Visit`] walks the tree read-only and reports every identifier together
//! with the role it plays at that site. [`VisitMut`] walks it mutably; its
//! expression hook runs before an expression's children so a visitor can
//! replace the node and stop descent into the replacement.

use serde::{Deserialize, Serialize};

use crate::{
    ArraySpecifier, Block, Callee, Declaration, DeclarationKind, Declarator, Expr, ExprKind,
    ExternalDeclarationKind, FunctionPrototype, Identifier, MemberDeclaration, Statement,
    StatementKind, TranslationUnit, TypeQualifier, TypeSpecifier, TypeSpecifierKind,
};

/// The role an identifier plays at one occurrence site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccurrenceKind {
    /// Used as an expression: `x` in `y = x + 1`
    Reference,
    /// Declared variable name
    Declaration,
    /// Struct or interface block member name
    Member,
    /// Function prototype or definition name
    Function,
    /// Function parameter name
    Parameter,
    /// Callee of a function call
    Call,
}

impl OccurrenceKind {
    pub fn describe(&self) -> &'static str {
        match self {
            OccurrenceKind::Reference => "reference",
            OccurrenceKind::Declaration => "declaration",
            OccurrenceKind::Member => "member",
            OccurrenceKind::Function => "function",
            OccurrenceKind::Parameter => "parameter",
            OccurrenceKind::Call => "call",
        }
    }
}

/// Read-only visitor
pub trait Visit {
    fn visit_identifier(&mut self, _ident: &Identifier, _kind: OccurrenceKind) {}

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }
}

/// Whether a mutable walk should descend into an expression's children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    Continue,
    Skip,
}

/// Mutable visitor
pub trait VisitMut {
    fn visit_identifier_mut(&mut self, _ident: &mut Identifier, _kind: OccurrenceKind) {}

    /// Called before the expression's children are walked
    fn visit_expr_mut(&mut self, _expr: &mut Expr) -> Descend {
        Descend::Continue
    }
}

// ===== Read-only walk =====

pub fn walk_translation_unit<V: Visit + ?Sized>(v: &mut V, unit: &TranslationUnit) {
    for decl in &unit.declarations {
        match &decl.kind {
            ExternalDeclarationKind::Declaration(decl) => walk_declaration(v, decl),
            ExternalDeclarationKind::Function(func) => {
                walk_prototype(v, &func.prototype);
                walk_block(v, &func.body);
            }
            ExternalDeclarationKind::Directive(_) | ExternalDeclarationKind::Empty => {}
        }
    }
}

pub fn walk_declaration<V: Visit + ?Sized>(v: &mut V, decl: &Declaration) {
    match &decl.kind {
        DeclarationKind::Variables(vars) => {
            walk_qualifiers(v, &vars.qualifiers);
            walk_type(v, &vars.ty);
            for declarator in &vars.declarators {
                walk_declarator(v, declarator, OccurrenceKind::Declaration);
            }
        }
        DeclarationKind::Prototype(proto) => walk_prototype(v, proto),
        DeclarationKind::Precision { ty, .. } => walk_type(v, ty),
        DeclarationKind::Qualifiers(qualifiers) => walk_qualifiers(v, qualifiers),
        DeclarationKind::Block(block) => {
            walk_qualifiers(v, &block.qualifiers);
            walk_members(v, &block.members);
            if let Some(instance) = &block.instance {
                walk_declarator(v, instance, OccurrenceKind::Declaration);
            }
        }
    }
}

fn walk_prototype<V: Visit + ?Sized>(v: &mut V, proto: &FunctionPrototype) {
    walk_qualifiers(v, &proto.return_type.qualifiers);
    walk_type(v, &proto.return_type.ty);
    v.visit_identifier(&proto.name, OccurrenceKind::Function);
    for param in &proto.params {
        walk_qualifiers(v, &param.qualifiers);
        walk_type(v, &param.ty);
        if let Some(name) = &param.name {
            v.visit_identifier(name, OccurrenceKind::Parameter);
        }
        if let Some(array) = &param.array {
            walk_array(v, array);
        }
    }
}

fn walk_declarator<V: Visit + ?Sized>(v: &mut V, declarator: &Declarator, kind: OccurrenceKind) {
    v.visit_identifier(&declarator.name, kind);
    if let Some(array) = &declarator.array {
        walk_array(v, array);
    }
    if let Some(init) = &declarator.initializer {
        v.visit_expr(init);
    }
}

fn walk_members<V: Visit + ?Sized>(v: &mut V, members: &[MemberDeclaration]) {
    for member in members {
        walk_qualifiers(v, &member.qualifiers);
        walk_type(v, &member.ty);
        for declarator in &member.declarators {
            walk_declarator(v, declarator, OccurrenceKind::Member);
        }
    }
}

fn walk_type<V: Visit + ?Sized>(v: &mut V, ty: &TypeSpecifier) {
    if let TypeSpecifierKind::Struct(spec) = &ty.kind {
        walk_members(v, &spec.members);
    }
    if let Some(array) = &ty.array {
        walk_array(v, array);
    }
}

fn walk_array<V: Visit + ?Sized>(v: &mut V, array: &ArraySpecifier) {
    for size in array.dimensions.iter().flatten() {
        v.visit_expr(size);
    }
}

fn walk_qualifiers<V: Visit + ?Sized>(v: &mut V, qualifiers: &[TypeQualifier]) {
    for qualifier in qualifiers {
        if let TypeQualifier::Layout(items) = qualifier {
            for value in items.iter().filter_map(|item| item.value.as_ref()) {
                v.visit_expr(value);
            }
        }
    }
}

pub fn walk_block<V: Visit + ?Sized>(v: &mut V, block: &Block) {
    for stmt in &block.statements {
        walk_statement(v, stmt);
    }
}

pub fn walk_statement<V: Visit + ?Sized>(v: &mut V, stmt: &Statement) {
    match &stmt.kind {
        StatementKind::Declaration(decl) => walk_declaration(v, decl),
        StatementKind::Expr(expr) | StatementKind::Case(expr) => v.visit_expr(expr),
        StatementKind::Block(block) => walk_block(v, block),
        StatementKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            v.visit_expr(condition);
            walk_statement(v, then_branch);
            if let Some(else_branch) = else_branch {
                walk_statement(v, else_branch);
            }
        }
        StatementKind::For {
            init,
            condition,
            step,
            body,
        } => {
            if let Some(init) = init {
                walk_statement(v, init);
            }
            if let Some(condition) = condition {
                v.visit_expr(condition);
            }
            if let Some(step) = step {
                v.visit_expr(step);
            }
            walk_statement(v, body);
        }
        StatementKind::While { condition, body } => {
            v.visit_expr(condition);
            walk_statement(v, body);
        }
        StatementKind::DoWhile { body, condition } => {
            walk_statement(v, body);
            v.visit_expr(condition);
        }
        StatementKind::Switch { selector, body } => {
            v.visit_expr(selector);
            walk_block(v, body);
        }
        StatementKind::Return(Some(value)) => v.visit_expr(value),
        StatementKind::Return(None)
        | StatementKind::Default
        | StatementKind::Break
        | StatementKind::Continue
        | StatementKind::Discard
        | StatementKind::Directive(_)
        | StatementKind::Empty => {}
    }
}

pub fn walk_expr<V: Visit + ?Sized>(v: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Literal(_) => {}
        ExprKind::Ident(ident) => v.visit_identifier(ident, OccurrenceKind::Reference),
        ExprKind::Group(inner) => v.visit_expr(inner),
        ExprKind::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        ExprKind::Unary { operand, .. } | ExprKind::Postfix { operand, .. } => v.visit_expr(operand),
        ExprKind::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        ExprKind::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            v.visit_expr(condition);
            v.visit_expr(then_expr);
            v.visit_expr(else_expr);
        }
        ExprKind::Call { callee, args } => {
            match callee {
                Callee::Function(ident) => v.visit_identifier(ident, OccurrenceKind::Call),
                Callee::Constructor(ty) => walk_type(v, ty),
            }
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::Member { object, .. } => v.visit_expr(object),
        ExprKind::Index { object, index } => {
            v.visit_expr(object);
            v.visit_expr(index);
        }
        ExprKind::Sequence(items) => {
            for item in items {
                v.visit_expr(item);
            }
        }
    }
}

// ===== Mutable walk =====

pub fn walk_translation_unit_mut<V: VisitMut + ?Sized>(v: &mut V, unit: &mut TranslationUnit) {
    for decl in &mut unit.declarations {
        match &mut decl.kind {
            ExternalDeclarationKind::Declaration(decl) => walk_declaration_mut(v, decl),
            ExternalDeclarationKind::Function(func) => {
                walk_prototype_mut(v, &mut func.prototype);
                walk_block_mut(v, &mut func.body);
            }
            ExternalDeclarationKind::Directive(_) | ExternalDeclarationKind::Empty => {}
        }
    }
}

pub fn walk_declaration_mut<V: VisitMut + ?Sized>(v: &mut V, decl: &mut Declaration) {
    match &mut decl.kind {
        DeclarationKind::Variables(vars) => {
            walk_qualifiers_mut(v, &mut vars.qualifiers);
            walk_type_mut(v, &mut vars.ty);
            for declarator in &mut vars.declarators {
                walk_declarator_mut(v, declarator, OccurrenceKind::Declaration);
            }
        }
        DeclarationKind::Prototype(proto) => walk_prototype_mut(v, proto),
        DeclarationKind::Precision { ty, .. } => walk_type_mut(v, ty),
        DeclarationKind::Qualifiers(qualifiers) => walk_qualifiers_mut(v, qualifiers),
        DeclarationKind::Block(block) => {
            walk_qualifiers_mut(v, &mut block.qualifiers);
            walk_members_mut(v, &mut block.members);
            if let Some(instance) = &mut block.instance {
                walk_declarator_mut(v, instance, OccurrenceKind::Declaration);
            }
        }
    }
}

fn walk_prototype_mut<V: VisitMut + ?Sized>(v: &mut V, proto: &mut FunctionPrototype) {
    walk_qualifiers_mut(v, &mut proto.return_type.qualifiers);
    walk_type_mut(v, &mut proto.return_type.ty);
    v.visit_identifier_mut(&mut proto.name, OccurrenceKind::Function);
    for param in &mut proto.params {
        walk_qualifiers_mut(v, &mut param.qualifiers);
        walk_type_mut(v, &mut param.ty);
        if let Some(name) = &mut param.name {
            v.visit_identifier_mut(name, OccurrenceKind::Parameter);
        }
        if let Some(array) = &mut param.array {
            walk_array_mut(v, array);
        }
    }
}

fn walk_declarator_mut<V: VisitMut + ?Sized>(
    v: &mut V,
    declarator: &mut Declarator,
    kind: OccurrenceKind,
) {
    v.visit_identifier_mut(&mut declarator.name, kind);
    if let Some(array) = &mut declarator.array {
        walk_array_mut(v, array);
    }
    if let Some(init) = &mut declarator.initializer {
        walk_expr_mut(v, init);
    }
}

fn walk_members_mut<V: VisitMut + ?Sized>(v: &mut V, members: &mut [MemberDeclaration]) {
    for member in members {
        walk_qualifiers_mut(v, &mut member.qualifiers);
        walk_type_mut(v, &mut member.ty);
        for declarator in &mut member.declarators {
            walk_declarator_mut(v, declarator, OccurrenceKind::Member);
        }
    }
}

fn walk_type_mut<V: VisitMut + ?Sized>(v: &mut V, ty: &mut TypeSpecifier) {
    if let TypeSpecifierKind::Struct(spec) = &mut ty.kind {
        walk_members_mut(v, &mut spec.members);
    }
    if let Some(array) = &mut ty.array {
        walk_array_mut(v, array);
    }
}

fn walk_array_mut<V: VisitMut + ?Sized>(v: &mut V, array: &mut ArraySpecifier) {
    for size in array.dimensions.iter_mut().flatten() {
        walk_expr_mut(v, size);
    }
}

fn walk_qualifiers_mut<V: VisitMut + ?Sized>(v: &mut V, qualifiers: &mut [TypeQualifier]) {
    for qualifier in qualifiers {
        if let TypeQualifier::Layout(items) = qualifier {
            for value in items.iter_mut().filter_map(|item| item.value.as_mut()) {
                walk_expr_mut(v, value);
            }
        }
    }
}

pub fn walk_block_mut<V: VisitMut + ?Sized>(v: &mut V, block: &mut Block) {
    for stmt in &mut block.statements {
        walk_statement_mut(v, stmt);
    }
}

pub fn walk_statement_mut<V: VisitMut + ?Sized>(v: &mut V, stmt: &mut Statement) {
    match &mut stmt.kind {
        StatementKind::Declaration(decl) => walk_declaration_mut(v, decl),
        StatementKind::Expr(expr) | StatementKind::Case(expr) => walk_expr_mut(v, expr),
        StatementKind::Block(block) => walk_block_mut(v, block),
        StatementKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            walk_expr_mut(v, condition);
            walk_statement_mut(v, then_branch);
            if let Some(else_branch) = else_branch {
                walk_statement_mut(v, else_branch);
            }
        }
        StatementKind::For {
            init,
            condition,
            step,
            body,
        } => {
            if let Some(init) = init {
                walk_statement_mut(v, init);
            }
            if let Some(condition) = condition {
                walk_expr_mut(v, condition);
            }
            if let Some(step) = step {
                walk_expr_mut(v, step);
            }
            walk_statement_mut(v, body);
        }
        StatementKind::While { condition, body } => {
            walk_expr_mut(v, condition);
            walk_statement_mut(v, body);
        }
        StatementKind::DoWhile { body, condition } => {
            walk_statement_mut(v, body);
            walk_expr_mut(v, condition);
        }
        StatementKind::Switch { selector, body } => {
            walk_expr_mut(v, selector);
            walk_block_mut(v, body);
        }
        StatementKind::Return(Some(value)) => walk_expr_mut(v, value),
        StatementKind::Return(None)
        | StatementKind::Default
        | StatementKind::Break
        | StatementKind::Continue
        | StatementKind::Discard
        | StatementKind::Directive(_)
        | StatementKind::Empty => {}
    }
}

pub fn walk_expr_mut<V: VisitMut + ?Sized>(v: &mut V, expr: &mut Expr) {
    if v.visit_expr_mut(expr) == Descend::Skip {
        return;
    }
    match &mut expr.kind {
        ExprKind::Literal(_) => {}
        ExprKind::Ident(ident) => v.visit_identifier_mut(ident, OccurrenceKind::Reference),
        ExprKind::Group(inner) => walk_expr_mut(v, inner),
        ExprKind::Binary { left, right, .. } => {
            walk_expr_mut(v, left);
            walk_expr_mut(v, right);
        }
        ExprKind::Unary { operand, .. } | ExprKind::Postfix { operand, .. } => {
            walk_expr_mut(v, operand)
        }
        ExprKind::Assign { target, value, .. } => {
            walk_expr_mut(v, target);
            walk_expr_mut(v, value);
        }
        ExprKind::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            walk_expr_mut(v, condition);
            walk_expr_mut(v, then_expr);
            walk_expr_mut(v, else_expr);
        }
        ExprKind::Call { callee, args } => {
            match callee {
                Callee::Function(ident) => v.visit_identifier_mut(ident, OccurrenceKind::Call),
                Callee::Constructor(ty) => walk_type_mut(v, ty),
            }
            for arg in args {
                walk_expr_mut(v, arg);
            }
        }
        ExprKind::Member { object, .. } => walk_expr_mut(v, object),
        ExprKind::Index { object, index } => {
            walk_expr_mut(v, object);
            walk_expr_mut(v, index);
        }
        ExprKind::Sequence(items) => {
            for item in items {
                walk_expr_mut(v, item);
            }
        }
    }
}
