//! Edit plans: rule effects as data, executed against a [`TreeEditor`]

use glcompat_edit::{InjectionPoint, TreeEditor};
use tracing::trace;

/// One primitive edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Rename {
        from: &'static str,
        to: &'static str,
    },
    ReplaceReferences {
        name: &'static str,
        replacement: &'static str,
    },
    Inject {
        point: InjectionPoint,
        source: &'static str,
    },
    Detach {
        template: &'static str,
        hint: &'static str,
    },
}

impl Edit {
    /// Apply the edit, returning how many tree sites it changed
    pub fn apply<E: TreeEditor>(&self, editor: &mut E) -> Result<usize, E::Error> {
        let changed = match *self {
            Edit::Rename { from, to } => editor.rename(from, to),
            Edit::ReplaceReferences { name, replacement } => {
                editor.replace_references_of(name, replacement)?
            }
            Edit::Inject { point, source } => editor.inject(point, source)?,
            Edit::Detach { template, hint } => editor.detach_matching(template, hint)?,
        };
        trace!(edit = ?self, changed, "applied edit");
        Ok(changed)
    }
}

/// Apply edits in order, returning the total number of sites changed
pub fn apply_plan<E: TreeEditor>(editor: &mut E, plan: &[Edit]) -> Result<usize, E::Error> {
    let mut total = 0;
    for edit in plan {
        total += edit.apply(editor)?;
    }
    Ok(total)
}
