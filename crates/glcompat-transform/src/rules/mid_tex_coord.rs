//! Legacy mid-texture-coordinate aliasing
//!
//! Very old shader packs read the sprite-center coordinate from
//! `gl_MultiTexCoord3`; the renderer supplies it as the `mc_midTexCoord`
//! attribute. The alias is only installed when `mc_midTexCoord` is unused,
//! because the type of an existing declaration is not known here.

use glcompat_edit::{InjectionPoint, TreeEditor};

use crate::names::{MID_TEX_COORD, MULTI_TEX_COORD_3};
use crate::plan::{apply_plan, Edit};
use crate::rules::{AttributeRule, RuleOutcome, SkipReason};
use crate::{AttributeParameters, ShaderType};

pub struct MidTexCoordAlias;

impl<E: TreeEditor> AttributeRule<E> for MidTexCoordAlias {
    fn name(&self) -> &'static str {
        "mid-tex-coord"
    }

    fn apply(&self, editor: &mut E, params: &AttributeParameters) -> Result<RuleOutcome, E::Error> {
        if params.stage != ShaderType::Vertex {
            return Ok(RuleOutcome::Skipped(SkipReason::NotVertexStage));
        }
        if !editor.has_identifier(MULTI_TEX_COORD_3) {
            return Ok(RuleOutcome::Skipped(SkipReason::NoOccurrences));
        }
        if editor.has_identifier(MID_TEX_COORD) {
            return Ok(RuleOutcome::Skipped(SkipReason::AlreadyDeclared));
        }

        let plan = [
            Edit::Rename {
                from: MULTI_TEX_COORD_3,
                to: MID_TEX_COORD,
            },
            Edit::Inject {
                point: InjectionPoint::BeforeFunctions,
                source: "attribute vec4 mc_midTexCoord;",
            },
        ];
        let edits = apply_plan(editor, &plan)?;
        Ok(RuleOutcome::Applied { edits })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InputAvailability;
    use glcompat_ast::print_translation_unit;
    use glcompat_edit::IndexedUnit;

    fn params(stage: ShaderType) -> AttributeParameters {
        AttributeParameters::new(stage, InputAvailability::default(), false)
    }

    #[test]
    fn test_aliases_channel_three() {
        let mut unit = IndexedUnit::parse("varying vec2 mid;\nvoid main() {\n  mid = gl_MultiTexCoord3.st;\n}\n").unwrap();
        let outcome = MidTexCoordAlias.apply(&mut unit, &params(ShaderType::Vertex)).unwrap();
        assert_eq!(outcome, RuleOutcome::Applied { edits: 2 });
        assert_eq!(
            print_translation_unit(unit.unit()),
            "varying vec2 mid;\nattribute vec4 mc_midTexCoord;\nvoid main() {\n  mid = mc_midTexCoord.st;\n}\n"
        );
    }

    #[test]
    fn test_existing_mid_tex_coord_blocks_alias() {
        let source = "attribute vec2 mc_midTexCoord;\nvoid main() {\n  vec4 a = gl_MultiTexCoord3;\n}\n";
        let mut unit = IndexedUnit::parse(source).unwrap();
        let outcome = MidTexCoordAlias.apply(&mut unit, &params(ShaderType::Vertex)).unwrap();
        assert_eq!(outcome, RuleOutcome::Skipped(SkipReason::AlreadyDeclared));
        assert_eq!(print_translation_unit(unit.unit()), source);
    }

    #[test]
    fn test_any_occurrence_counts_as_taken() {
        // A bare read with no declaration still blocks the alias
        let source = "void main() {\n  vec4 a = gl_MultiTexCoord3 + mc_midTexCoord;\n}\n";
        let mut unit = IndexedUnit::parse(source).unwrap();
        let outcome = MidTexCoordAlias.apply(&mut unit, &params(ShaderType::Vertex)).unwrap();
        assert_eq!(outcome, RuleOutcome::Skipped(SkipReason::AlreadyDeclared));
    }

    #[test]
    fn test_only_vertex_stage() {
        let mut unit = IndexedUnit::parse("void main() { vec4 a = gl_MultiTexCoord3; }").unwrap();
        let outcome = MidTexCoordAlias.apply(&mut unit, &params(ShaderType::Fragment)).unwrap();
        assert_eq!(outcome, RuleOutcome::Skipped(SkipReason::NotVertexStage));
        assert!(unit.has_identifier("gl_MultiTexCoord3"));
    }

    #[test]
    fn test_absent_channel() {
        let mut unit = IndexedUnit::parse("void main() {}").unwrap();
        let outcome = MidTexCoordAlias.apply(&mut unit, &params(ShaderType::Vertex)).unwrap();
        assert_eq!(outcome, RuleOutcome::Skipped(SkipReason::NoOccurrences));
    }
}
