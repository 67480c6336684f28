//! Overlay color passthrough
//!
//! The entity overlay color used to be a uniform. It now comes from a
//! texture sampled per vertex, so the vertex stage samples it and forwards
//! it (with the vertex color) through the geometry stage, if any, to the
//! fragment stage. The original `main` of the vertex and geometry stages is
//! renamed and called from a new `main` that does the forwarding.

use glcompat_edit::{InjectionPoint, TreeEditor};
use tracing::debug;

use crate::names::{
    ENTITY_COLOR, ENTITY_COLOR_GS, GEOMETRY_WRAPPED_MAIN, MAIN, VERTEX_COLOR, VERTEX_COLOR_GS,
    VERTEX_WRAPPED_MAIN,
};
use crate::plan::{apply_plan, Edit};
use crate::rules::{AttributeRule, RuleOutcome, SkipReason};
use crate::{AttributeParameters, ShaderType};

const ENTITY_COLOR_UNIFORM: &str = "uniform vec4 entityColor;";

const VERTEX_DECLARATIONS: &str = "uniform sampler2D iris_overlay;\n\
                                   out vec4 entityColor;\n\
                                   out vec4 iris_vertexColor;\n\
                                   in ivec2 iris_UV1;";

const VERTEX_MAIN: &str = "void main() {\n\
                           vec4 overlayColor = texelFetch(iris_overlay, iris_UV1, 0);\n\
                           entityColor = vec4(overlayColor.rgb, 1.0 - overlayColor.a);\n\
                           iris_vertexColor = iris_Color;\n\
                           irisMain_overlayColor();\n\
                           }";

const GEOMETRY_DECLARATIONS: &str = "out vec4 entityColorGS;\n\
                                     in vec4 entityColor[];\n\
                                     out vec4 iris_vertexColorGS;\n\
                                     in vec4 iris_vertexColor[];";

const GEOMETRY_MAIN: &str = "void main() {\n\
                             entityColorGS = entityColor[0];\n\
                             iris_vertexColorGS = iris_vertexColor[0];\n\
                             irisMain();\n\
                             }";

const FRAGMENT_DECLARATIONS: &str = "in vec4 entityColor;\n\
                                     in vec4 iris_vertexColor;";

pub struct OverlayPassthrough;

/// Edits that thread the overlay color through `stage`.
///
/// The uniform is always detached first. Renames of `main` come before the
/// wrapper that calls the renamed function is injected.
pub fn overlay_plan(stage: ShaderType, has_geometry: bool) -> Vec<Edit> {
    let mut plan = vec![Edit::Detach {
        template: ENTITY_COLOR_UNIFORM,
        hint: ENTITY_COLOR,
    }];

    match stage {
        ShaderType::Vertex => plan.extend([
            Edit::Inject {
                point: InjectionPoint::BeforeDeclarations,
                source: VERTEX_DECLARATIONS,
            },
            Edit::Rename {
                from: MAIN,
                to: VERTEX_WRAPPED_MAIN,
            },
            Edit::Inject {
                point: InjectionPoint::End,
                source: VERTEX_MAIN,
            },
        ]),
        ShaderType::Geometry => plan.extend([
            // Read the color of the first vertex of the primitive; runs before
            // the wrapper's own `entityColor[0]` reads exist
            Edit::ReplaceReferences {
                name: ENTITY_COLOR,
                replacement: "entityColor[0]",
            },
            Edit::Inject {
                point: InjectionPoint::BeforeDeclarations,
                source: GEOMETRY_DECLARATIONS,
            },
            Edit::Rename {
                from: MAIN,
                to: GEOMETRY_WRAPPED_MAIN,
            },
            Edit::Inject {
                point: InjectionPoint::End,
                source: GEOMETRY_MAIN,
            },
        ]),
        ShaderType::Fragment => {
            plan.push(Edit::Inject {
                point: InjectionPoint::BeforeDeclarations,
                source: FRAGMENT_DECLARATIONS,
            });
            // The geometry stage forwards under different names
            if has_geometry {
                plan.push(Edit::Rename {
                    from: ENTITY_COLOR,
                    to: ENTITY_COLOR_GS,
                });
                plan.push(Edit::Rename {
                    from: VERTEX_COLOR,
                    to: VERTEX_COLOR_GS,
                });
            }
        }
        ShaderType::Compute | ShaderType::TessControl | ShaderType::TessEval => {}
    }

    plan
}

impl<E: TreeEditor> AttributeRule<E> for OverlayPassthrough {
    fn name(&self) -> &'static str {
        "overlay-passthrough"
    }

    fn apply(&self, editor: &mut E, params: &AttributeParameters) -> Result<RuleOutcome, E::Error> {
        if !params.inputs.overlay {
            return Ok(RuleOutcome::Skipped(SkipReason::OverlayDisabled));
        }
        let plan = overlay_plan(params.stage, params.has_geometry);
        debug!(stage = %params.stage, edits = plan.len(), "threading overlay color");
        let edits = apply_plan(editor, &plan)?;
        Ok(RuleOutcome::from_edits(edits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InputAvailability;
    use glcompat_ast::print_translation_unit;
    use glcompat_edit::IndexedUnit;

    fn params(stage: ShaderType, overlay: bool, has_geometry: bool) -> AttributeParameters {
        AttributeParameters::new(
            stage,
            InputAvailability {
                overlay,
                ..Default::default()
            },
            has_geometry,
        )
    }

    fn run(source: &str, params: &AttributeParameters) -> (RuleOutcome, String) {
        let mut unit = IndexedUnit::parse(source).unwrap();
        let outcome = OverlayPassthrough.apply(&mut unit, params).unwrap();
        (outcome, print_translation_unit(unit.unit()))
    }

    #[test]
    fn test_detach_runs_first_for_every_stage() {
        for stage in [ShaderType::Vertex, ShaderType::Geometry, ShaderType::Fragment] {
            for has_geometry in [false, true] {
                let plan = overlay_plan(stage, has_geometry);
                assert!(matches!(plan[0], Edit::Detach { .. }));
                assert!(plan[1..].iter().all(|edit| !matches!(edit, Edit::Detach { .. })));
            }
        }
    }

    #[test]
    fn test_main_renamed_before_wrapper_injected() {
        for stage in [ShaderType::Vertex, ShaderType::Geometry] {
            let plan = overlay_plan(stage, false);
            let rename = plan
                .iter()
                .position(|edit| matches!(edit, Edit::Rename { from: "main", .. }))
                .unwrap();
            let wrapper = plan
                .iter()
                .position(|edit| matches!(edit, Edit::Inject { point: InjectionPoint::End, .. }))
                .unwrap();
            assert!(rename < wrapper);
        }
    }

    #[test]
    fn test_fragment_plan_depends_on_geometry() {
        assert_eq!(overlay_plan(ShaderType::Fragment, false).len(), 2);
        assert_eq!(overlay_plan(ShaderType::Fragment, true).len(), 4);
    }

    #[test]
    fn test_disabled() {
        let (outcome, printed) = run(
            "uniform vec4 entityColor;\nvoid main() {}",
            &params(ShaderType::Vertex, false, false),
        );
        assert_eq!(outcome, RuleOutcome::Skipped(SkipReason::OverlayDisabled));
        assert!(printed.starts_with("uniform vec4 entityColor;"));
    }

    #[test]
    fn test_vertex_wraps_main() {
        let source = "#version 120\nuniform vec4 entityColor;\nvarying vec4 tint;\nvoid main() {\n  tint = entityColor;\n  gl_Position = ftransform();\n}\n";
        let (outcome, printed) = run(source, &params(ShaderType::Vertex, true, false));
        assert!(outcome.is_applied());
        assert_eq!(
            printed,
            "#version 120\n\
             uniform sampler2D iris_overlay;\n\
             out vec4 entityColor;\n\
             out vec4 iris_vertexColor;\n\
             in ivec2 iris_UV1;\n\
             varying vec4 tint;\n\
             void irisMain_overlayColor() {\n  tint = entityColor;\n  gl_Position = ftransform();\n}\n\
             void main() {\n\
             \x20 vec4 overlayColor = texelFetch(iris_overlay, iris_UV1, 0);\n\
             \x20 entityColor = vec4(overlayColor.rgb, 1.0 - overlayColor.a);\n\
             \x20 iris_vertexColor = iris_Color;\n\
             \x20 irisMain_overlayColor();\n\
             }\n"
        );
    }

    #[test]
    fn test_geometry_reads_first_vertex() {
        let source = "#version 150\nlayout(triangles) in;\nlayout(triangle_strip, max_vertices = 3) out;\nuniform vec4 entityColor;\nout vec4 tint;\nvoid main() {\n  tint = entityColor;\n}\n";
        let (_, printed) = run(source, &params(ShaderType::Geometry, true, false));
        assert!(!printed.contains("uniform vec4 entityColor;"));
        assert!(printed.contains("void irisMain() {\n  tint = entityColor[0];\n}"));
        assert!(printed.contains("in vec4 entityColor[];"));
        // The wrapper's own read is not indexed twice
        assert!(printed.contains("  entityColorGS = entityColor[0];\n"));
        assert!(!printed.contains("entityColor[0][0]"));
        assert!(printed.ends_with("  irisMain();\n}\n"));
        // Injected after the leading directive, ahead of the layout declarations
        assert!(printed.starts_with("#version 150\nout vec4 entityColorGS;\n"));
    }

    #[test]
    fn test_fragment_with_geometry_renames_inputs() {
        let source = "uniform vec4 entityColor;\nvarying vec4 color;\nvoid main() {\n  gl_FragColor = mix(color, entityColor, entityColor.a);\n}\n";
        let (_, printed) = run(source, &params(ShaderType::Fragment, true, true));
        assert_eq!(
            printed,
            "in vec4 entityColorGS;\n\
             in vec4 iris_vertexColorGS;\n\
             varying vec4 color;\n\
             void main() {\n  gl_FragColor = mix(color, entityColorGS, entityColorGS.a);\n}\n"
        );
    }

    #[test]
    fn test_fragment_without_geometry() {
        let source = "void main() {\n  gl_FragColor = entityColor;\n}\n";
        let (outcome, printed) = run(source, &params(ShaderType::Fragment, true, false));
        // Nothing detached; two inputs injected
        assert_eq!(outcome, RuleOutcome::Applied { edits: 2 });
        assert!(printed.starts_with("in vec4 entityColor;\nin vec4 iris_vertexColor;\n"));
    }
}
