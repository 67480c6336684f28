//! Dead coordinate channel neutralization
//!
//! Reads of a coordinate channel the renderer does not supply are replaced
//! with a constant so the shader still links. Declarations are left alone.

use glcompat_edit::TreeEditor;
use tracing::debug;

use crate::names::{DEAD_CHANNEL_SENTINEL, MULTI_TEX_COORD_0, MULTI_TEX_COORD_1, MULTI_TEX_COORD_2};
use crate::rules::{AttributeRule, RuleOutcome, SkipReason};
use crate::{AttributeParameters, InputAvailability};

pub struct DeadChannels;

/// Channels whose inputs are disabled, in replacement order
pub fn dead_channels(inputs: &InputAvailability) -> Vec<&'static str> {
    let mut channels = Vec::new();
    if !inputs.lightmap {
        channels.push(MULTI_TEX_COORD_1);
        channels.push(MULTI_TEX_COORD_2);
    }
    if !inputs.texture {
        channels.push(MULTI_TEX_COORD_0);
    }
    channels
}

impl<E: TreeEditor> AttributeRule<E> for DeadChannels {
    fn name(&self) -> &'static str {
        "dead-channels"
    }

    fn apply(&self, editor: &mut E, params: &AttributeParameters) -> Result<RuleOutcome, E::Error> {
        let channels = dead_channels(&params.inputs);
        if channels.is_empty() {
            return Ok(RuleOutcome::Skipped(SkipReason::AllChannelsEnabled));
        }

        let sites: Vec<_> = channels
            .iter()
            .flat_map(|channel| editor.reference_sites(channel))
            .collect();
        if sites.is_empty() {
            return Ok(RuleOutcome::Skipped(SkipReason::NoOccurrences));
        }

        debug!(?channels, sites = sites.len(), "neutralizing dead channels");
        let replaced = editor.replace_references(&sites, DEAD_CHANNEL_SENTINEL)?;
        Ok(RuleOutcome::from_edits(replaced))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShaderType;
    use glcompat_ast::print_translation_unit;
    use glcompat_edit::IndexedUnit;

    fn params(lightmap: bool, texture: bool) -> AttributeParameters {
        AttributeParameters::new(
            ShaderType::Vertex,
            InputAvailability {
                lightmap,
                texture,
                overlay: false,
            },
            false,
        )
    }

    const SOURCE: &str = "attribute vec4 gl_MultiTexCoord1;\nvoid main() {\n  vec4 a = gl_MultiTexCoord0;\n  vec4 b = gl_MultiTexCoord1;\n  vec4 c = gl_MultiTexCoord2.xyzw;\n}\n";

    #[test]
    fn test_channel_order() {
        assert_eq!(
            dead_channels(&InputAvailability::default()),
            vec!["gl_MultiTexCoord1", "gl_MultiTexCoord2", "gl_MultiTexCoord0"]
        );
        assert_eq!(
            dead_channels(&InputAvailability {
                lightmap: true,
                texture: false,
                overlay: false
            }),
            vec!["gl_MultiTexCoord0"]
        );
    }

    #[test]
    fn test_all_enabled_skips() {
        let mut unit = IndexedUnit::parse(SOURCE).unwrap();
        let outcome = DeadChannels.apply(&mut unit, &params(true, true)).unwrap();
        assert_eq!(outcome, RuleOutcome::Skipped(SkipReason::AllChannelsEnabled));
    }

    #[test]
    fn test_lightmap_disabled_replaces_reads_only() {
        let mut unit = IndexedUnit::parse(SOURCE).unwrap();
        let outcome = DeadChannels.apply(&mut unit, &params(false, true)).unwrap();
        assert_eq!(outcome, RuleOutcome::Applied { edits: 2 });
        let printed = print_translation_unit(unit.unit());
        assert!(printed.contains("attribute vec4 gl_MultiTexCoord1;"));
        assert!(printed.contains("vec4 b = vec4(240.0, 240.0, 0.0, 1.0);"));
        assert!(printed.contains("vec4 c = vec4(240.0, 240.0, 0.0, 1.0).xyzw;"));
        assert!(printed.contains("vec4 a = gl_MultiTexCoord0;"));
    }

    #[test]
    fn test_everything_disabled() {
        let mut unit = IndexedUnit::parse(SOURCE).unwrap();
        let outcome = DeadChannels.apply(&mut unit, &params(false, false)).unwrap();
        assert_eq!(outcome, RuleOutcome::Applied { edits: 3 });
        assert!(unit.reference_sites("gl_MultiTexCoord0").is_empty());
        assert!(unit.reference_sites("gl_MultiTexCoord1").is_empty());
        assert!(unit.reference_sites("gl_MultiTexCoord2").is_empty());
    }

    #[test]
    fn test_disabled_but_unused() {
        let mut unit = IndexedUnit::parse("void main() { gl_Position = ftransform(); }").unwrap();
        let outcome = DeadChannels.apply(&mut unit, &params(false, false)).unwrap();
        assert_eq!(outcome, RuleOutcome::Skipped(SkipReason::NoOccurrences));
    }
}
