//! Texture matrix reconstruction
//!
//! Core profiles have no `gl_TextureMatrix` array. Shaders get an
//! `iris_TextureMatrix[8]` instead: slot 0 is the real texture matrix, slot 1
//! the lightmap matrix, the rest identity. Without a lightmap input, slot 1 is
//! the fixed matrix mapping packed lightmap coordinates (0..240) to 0..1.

use glcompat_edit::{InjectionPoint, TreeEditor};

use crate::names::{IRIS_TEXTURE_MATRIX, TEXTURE_MATRIX};
use crate::plan::{apply_plan, Edit};
use crate::rules::{AttributeRule, RuleOutcome};
use crate::AttributeParameters;

const SCALE_CONSTANTS: &str = "const float iris_ONE_OVER_256 = 0.00390625;\n\
                               const float iris_ONE_OVER_32 = iris_ONE_OVER_256 * 8;";

// Injected after the rename, so the built-in it reads keeps its name
const LIGHTMAP_FROM_BUILTIN: &str = "mat4 iris_LightmapTextureMatrix = gl_TextureMatrix[2];";

const LIGHTMAP_FIXED: &str = "mat4 iris_LightmapTextureMatrix = mat4(\n\
                              iris_ONE_OVER_256, 0.0, 0.0, 0.0,\n\
                              0.0, iris_ONE_OVER_256, 0.0, 0.0,\n\
                              0.0, 0.0, iris_ONE_OVER_256, 0.0,\n\
                              iris_ONE_OVER_32, iris_ONE_OVER_32, iris_ONE_OVER_32, iris_ONE_OVER_256);";

// Column major
const TEXTURE_MATRIX_ARRAY: &str = "mat4 iris_TextureMatrix[8] = mat4[8](\n\
                                    gl_TextureMatrix[0],\n\
                                    iris_LightmapTextureMatrix,\n\
                                    mat4(1.0), mat4(1.0), mat4(1.0),\n\
                                    mat4(1.0), mat4(1.0), mat4(1.0));";

pub struct TextureMatrix;

/// Edits that rebuild the texture matrix array
pub fn texture_matrix_plan(lightmap: bool) -> Vec<Edit> {
    let lightmap_matrix = if lightmap {
        LIGHTMAP_FROM_BUILTIN
    } else {
        LIGHTMAP_FIXED
    };

    vec![
        Edit::Rename {
            from: TEXTURE_MATRIX,
            to: IRIS_TEXTURE_MATRIX,
        },
        Edit::Inject {
            point: InjectionPoint::BeforeFunctions,
            source: SCALE_CONSTANTS,
        },
        Edit::Inject {
            point: InjectionPoint::BeforeFunctions,
            source: lightmap_matrix,
        },
        Edit::Inject {
            point: InjectionPoint::BeforeFunctions,
            source: TEXTURE_MATRIX_ARRAY,
        },
    ]
}

impl<E: TreeEditor> AttributeRule<E> for TextureMatrix {
    fn name(&self) -> &'static str {
        "texture-matrix"
    }

    fn apply(&self, editor: &mut E, params: &AttributeParameters) -> Result<RuleOutcome, E::Error> {
        let edits = apply_plan(editor, &texture_matrix_plan(params.inputs.lightmap))?;
        Ok(RuleOutcome::Applied { edits })
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

    const SOURCE: &str = "#version 120\nvarying vec2 lmcoord;\nvoid main() {\n  lmcoord = (gl_TextureMatrix[1] * gl_MultiTexCoord1).xy;\n}\n";

    #[test]
    fn test_plan_order() {
        let plan = texture_matrix_plan(true);
        assert_eq!(plan.len(), 4);
        assert_eq!(
            plan[0],
            Edit::Rename {
                from: "gl_TextureMatrix",
                to: "iris_TextureMatrix"
            }
        );
        assert!(matches!(plan[2], Edit::Inject { source, .. } if source.contains("gl_TextureMatrix[2]")));
        assert!(matches!(plan[3], Edit::Inject { source, .. } if source.starts_with("mat4 iris_TextureMatrix[8]")));
    }

    #[test]
    fn test_reconstruction_with_lightmap() {
        let mut unit = IndexedUnit::parse(SOURCE).unwrap();
        let outcome = TextureMatrix.apply(&mut unit, &params(true)).unwrap();
        // One rename plus four injected declarations
        assert_eq!(outcome, RuleOutcome::Applied { edits: 5 });

        let printed = print_translation_unit(unit.unit());
        assert_eq!(
            printed,
            "#version 120\n\
             varying vec2 lmcoord;\n\
             const float iris_ONE_OVER_256 = 0.00390625;\n\
             const float iris_ONE_OVER_32 = iris_ONE_OVER_256 * 8;\n\
             mat4 iris_LightmapTextureMatrix = gl_TextureMatrix[2];\n\
             mat4 iris_TextureMatrix[8] = mat4[8](gl_TextureMatrix[0], iris_LightmapTextureMatrix, mat4(1.0), mat4(1.0), mat4(1.0), mat4(1.0), mat4(1.0), mat4(1.0));\n\
             void main() {\n  lmcoord = (iris_TextureMatrix[1] * gl_MultiTexCoord1).xy;\n}\n"
        );
    }

    #[test]
    fn test_builtin_only_survives_in_injected_declarations() {
        let mut unit = IndexedUnit::parse(SOURCE).unwrap();
        TextureMatrix.apply(&mut unit, &params(true)).unwrap();
        // [2] in the lightmap matrix and [0] in the array
        assert_eq!(unit.reference_sites("gl_TextureMatrix").len(), 2);

        let mut unit = IndexedUnit::parse(SOURCE).unwrap();
        TextureMatrix.apply(&mut unit, &params(false)).unwrap();
        assert_eq!(unit.reference_sites("gl_TextureMatrix").len(), 1);
    }

    #[test]
    fn test_fixed_lightmap_matrix() {
        let mut unit = IndexedUnit::parse("void main() {}").unwrap();
        TextureMatrix.apply(&mut unit, &params(false)).unwrap();
        let printed = print_translation_unit(unit.unit());
        assert!(printed.contains(
            "mat4 iris_LightmapTextureMatrix = mat4(iris_ONE_OVER_256, 0.0, 0.0, 0.0, 0.0, iris_ONE_OVER_256, 0.0, 0.0, 0.0, 0.0, iris_ONE_OVER_256, 0.0, iris_ONE_OVER_32, iris_ONE_OVER_32, iris_ONE_OVER_32, iris_ONE_OVER_256);"
        ));
        assert!(printed.ends_with("void main() {\n}\n"));
    }
}
