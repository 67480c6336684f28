//! Identifier index: spelling -> occurrence sites
//!
//! The index is a snapshot of one translation unit. Any structural edit can
//! add or remove occurrences, so callers rebuild it after editing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{walk_translation_unit, Identifier, NodeId, OccurrenceKind, Span, TranslationUnit, Visit};

/// One occurrence of an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub id: NodeId,
    pub kind: OccurrenceKind,
    pub span: Span,
}

/// Map from identifier name to its occurrences, in source order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentifierIndex {
    by_name: BTreeMap<String, Vec<Occurrence>>,
}

impl IdentifierIndex {
    /// Build the index for a translation unit
    pub fn build(unit: &TranslationUnit) -> Self {
        let mut builder = IndexBuilder::default();
        walk_translation_unit(&mut builder, unit);
        Self {
            by_name: builder.by_name,
        }
    }

    /// Whether the name occurs anywhere in the unit
    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All occurrences of a name
    pub fn occurrences(&self, name: &str) -> &[Occurrence] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Node ids of the sites where the name is used as an expression
    pub fn references(&self, name: &str) -> impl Iterator<Item = NodeId> + '_ {
        self.occurrences_of_kind(name, OccurrenceKind::Reference)
            .map(|occ| occ.id)
    }

    /// Occurrences of a name with a particular role
    pub fn occurrences_of_kind(
        &self,
        name: &str,
        kind: OccurrenceKind,
    ) -> impl Iterator<Item = &Occurrence> + '_ {
        self.occurrences(name)
            .iter()
            .filter(move |occ| occ.kind == kind)
    }

    /// Whether the name is declared as a variable, member, parameter or function
    pub fn is_declared(&self, name: &str) -> bool {
        self.occurrences(name)
            .iter()
            .any(|occ| !matches!(occ.kind, OccurrenceKind::Reference | OccurrenceKind::Call))
    }

    /// All indexed names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[derive(Default)]
struct IndexBuilder {
    by_name: BTreeMap<String, Vec<Occurrence>>,
}

impl Visit for IndexBuilder {
    fn visit_identifier(&mut self, ident: &Identifier, kind: OccurrenceKind) {
        self.by_name
            .entry(ident.name.clone())
            .or_default()
            .push(Occurrence {
                id: ident.id,
                kind,
                span: ident.span,
            });
    }
}
