//! Lightmap channel aliasing
//!
//! `gl_MultiTexCoord1` and `gl_MultiTexCoord2` both name the lightmap
//! coordinate in shader packs. Only channel 2 is bound, so channel 1 is
//! renamed onto it.

use glcompat_edit::TreeEditor;

use crate::names::{MULTI_TEX_COORD_1, MULTI_TEX_COORD_2};
use crate::rules::{AttributeRule, RuleOutcome, SkipReason};
use crate::AttributeParameters;

pub struct LightmapAlias;

impl<E: TreeEditor> AttributeRule<E> for LightmapAlias {
    fn name(&self) -> &'static str {
        "lightmap-alias"
    }

    fn apply(&self, editor: &mut E, params: &AttributeParameters) -> Result<RuleOutcome, E::Error> {
        if !params.inputs.lightmap {
            return Ok(RuleOutcome::Skipped(SkipReason::LightmapDisabled));
        }
        let renamed = editor.rename(MULTI_TEX_COORD_1, MULTI_TEX_COORD_2);
        Ok(RuleOutcome::from_edits(renamed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputAvailability, ShaderType};
    use glcompat_ast::print_translation_unit;
    use glcompat_edit::IndexedUnit;

    fn params(lightmap: bool) -> AttributeParameters {
        AttributeParameters::new(
            ShaderType::Vertex,
            InputAvailability {
                lightmap,
                ..Default::default()
            },
            false,
        )
    }

    #[test]
    fn test_renames_channel_one() {
        let mut unit = IndexedUnit::parse("void main() { vec4 lm = gl_MultiTexCoord1 + gl_MultiTexCoord2; }").unwrap();
        let outcome = LightmapAlias.apply(&mut unit, &params(true)).unwrap();
        assert_eq!(outcome, RuleOutcome::Applied { edits: 1 });
        assert!(!unit.has_identifier("gl_MultiTexCoord1"));
        assert_eq!(unit.reference_sites("gl_MultiTexCoord2").len(), 2);
        assert!(print_translation_unit(unit.unit()).contains("gl_MultiTexCoord2 + gl_MultiTexCoord2"));
    }

    #[test]
    fn test_disabled_lightmap_leaves_tree() {
        let mut unit = IndexedUnit::parse("void main() { vec4 lm = gl_MultiTexCoord1; }").unwrap();
        let outcome = LightmapAlias.apply(&mut unit, &params(false)).unwrap();
        assert_eq!(outcome, RuleOutcome::Skipped(SkipReason::LightmapDisabled));
        assert!(unit.has_identifier("gl_MultiTexCoord1"));
    }

    #[test]
    fn test_no_occurrences() {
        let mut unit = IndexedUnit::parse("void main() {}").unwrap();
        let outcome = LightmapAlias.apply(&mut unit, &params(true)).unwrap();
        assert_eq!(outcome, RuleOutcome::Skipped(SkipReason::NoOccurrences));
    }
}
