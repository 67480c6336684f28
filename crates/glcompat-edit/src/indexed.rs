//! Translation unit paired with its identifier index

use std::collections::HashMap;

use glcompat_ast::{
    walk_translation_unit_mut, Descend, Expr, ExprKind, Identifier, IdentifierIndex, NodeId,
    OccurrenceKind, TranslationUnit, VisitMut,
};
use glcompat_parser::{parse, parse_expression, parse_external_declarations, ParseError};
use tracing::trace;

use crate::{DeclarationTemplate, InjectionPoint, TreeEditor};

/// A translation unit whose identifier index is rebuilt after every edit
#[derive(Debug, Clone)]
pub struct IndexedUnit {
    unit: TranslationUnit,
    index: IdentifierIndex,
}

impl IndexedUnit {
    pub fn new(unit: TranslationUnit) -> Self {
        let index = IdentifierIndex::build(&unit);
        Self { unit, index }
    }

    /// Parse source and index it
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Ok(Self::new(parse(source)?))
    }

    pub fn unit(&self) -> &TranslationUnit {
        &self.unit
    }

    pub fn index(&self) -> &IdentifierIndex {
        &self.index
    }

    pub fn into_inner(self) -> TranslationUnit {
        self.unit
    }

    fn reindex(&mut self) {
        self.index = IdentifierIndex::build(&self.unit);
    }

    fn injection_position(&self, point: InjectionPoint) -> usize {
        match point {
            InjectionPoint::BeforeDeclarations => self.unit.end_of_header(),
            InjectionPoint::BeforeFunctions => self.unit.first_function(),
            InjectionPoint::End => self.unit.declarations.len(),
        }
    }
}

impl TreeEditor for IndexedUnit {
    type Error = ParseError;

    fn has_identifier(&self, name: &str) -> bool {
        self.index.has(name)
    }

    fn reference_sites(&self, name: &str) -> Vec<NodeId> {
        self.index.references(name).collect()
    }

    fn rename(&mut self, from: &str, to: &str) -> usize {
        if !self.index.has(from) {
            return 0;
        }
        let mut renamer = Renamer { from, to, renamed: 0 };
        walk_translation_unit_mut(&mut renamer, &mut self.unit);
        self.reindex();
        trace!(from, to, count = renamer.renamed, "renamed identifier");
        renamer.renamed
    }

    fn replace_references(&mut self, sites: &[NodeId], replacement: &str) -> Result<usize, ParseError> {
        if sites.is_empty() {
            return Ok(0);
        }

        // One independently parsed copy per site keeps node ids unique
        let mut replacements = HashMap::with_capacity(sites.len());
        for &site in sites {
            let expr = parse_expression(replacement, &mut self.unit.ids)?;
            replacements.insert(site, expr);
        }

        let mut replacer = Replacer {
            replacements,
            replaced: 0,
        };
        walk_translation_unit_mut(&mut replacer, &mut self.unit);
        self.reindex();
        trace!(replacement, count = replacer.replaced, "replaced references");
        Ok(replacer.replaced)
    }

    fn inject(&mut self, point: InjectionPoint, source: &str) -> Result<usize, ParseError> {
        let decls = parse_external_declarations(source, &mut self.unit.ids)?;
        let count = decls.len();
        let at = self.injection_position(point);
        self.unit.declarations.splice(at..at, decls);
        self.reindex();
        trace!(?point, at, count, "injected declarations");
        Ok(count)
    }

    fn detach_matching(&mut self, template: &str, hint: &str) -> Result<usize, ParseError> {
        let template = DeclarationTemplate::parse(template, hint)?;
        if !self.index.has(template.hint()) {
            return Ok(0);
        }
        let before = self.unit.declarations.len();
        self.unit.declarations.retain(|decl| !template.matches(decl));
        let removed = before - self.unit.declarations.len();
        if removed > 0 {
            self.reindex();
        }
        trace!(template = template.canonical(), removed, "detached declarations");
        Ok(removed)
    }
}

/// Renames every identifier spelled `from`
struct Renamer<'a> {
    from: &'a str,
    to: &'a str,
    renamed: usize,
}

impl VisitMut for Renamer<'_> {
    fn visit_identifier_mut(&mut self, ident: &mut Identifier, _kind: OccurrenceKind) {
        if ident.name == self.from {
            ident.name = self.to.to_string();
            self.renamed += 1;
        }
    }
}

/// Swaps reference expressions with prepared replacements
struct Replacer {
    replacements: HashMap<NodeId, Expr>,
    replaced: usize,
}

impl VisitMut for Replacer {
    fn visit_expr_mut(&mut self, expr: &mut Expr) -> Descend {
        let ExprKind::Ident(ident) = &expr.kind else {
            return Descend::Continue;
        };
        match self.replacements.remove(&ident.id) {
            Some(mut replacement) => {
                replacement.span = expr.span;
                *expr = replacement;
                self.replaced += 1;
                // The replacement may mention the replaced name again
                Descend::Skip
            }
            None => Descend::Continue,
        }
    }
}
