//! Identifier spellings shared with the rest of the shader pipeline.
//!
//! These names appear in shader packs and in the uniforms/attributes the
//! renderer binds, so they must be kept exactly.

pub const MULTI_TEX_COORD_0: &str = "gl_MultiTexCoord0";
pub const MULTI_TEX_COORD_1: &str = "gl_MultiTexCoord1";
pub const MULTI_TEX_COORD_2: &str = "gl_MultiTexCoord2";
pub const MULTI_TEX_COORD_3: &str = "gl_MultiTexCoord3";
pub const MID_TEX_COORD: &str = "mc_midTexCoord";

pub const TEXTURE_MATRIX: &str = "gl_TextureMatrix";
pub const IRIS_TEXTURE_MATRIX: &str = "iris_TextureMatrix";
pub const ONE_OVER_256: &str = "iris_ONE_OVER_256";
pub const ONE_OVER_32: &str = "iris_ONE_OVER_32";
pub const LIGHTMAP_TEXTURE_MATRIX: &str = "iris_LightmapTextureMatrix";

pub const ENTITY_COLOR: &str = "entityColor";
pub const ENTITY_COLOR_GS: &str = "entityColorGS";
pub const OVERLAY_SAMPLER: &str = "iris_overlay";
pub const VERTEX_COLOR: &str = "iris_vertexColor";
pub const VERTEX_COLOR_GS: &str = "iris_vertexColorGS";
pub const COLOR: &str = "iris_Color";
pub const UV1: &str = "iris_UV1";

pub const MAIN: &str = "main";
pub const VERTEX_WRAPPED_MAIN: &str = "irisMain_overlayColor";
pub const GEOMETRY_WRAPPED_MAIN: &str = "irisMain";

/// Constant read in place of a disabled coordinate channel: full-bright lightmap
pub const DEAD_CHANNEL_SENTINEL: &str = "vec4(240.0, 240.0, 0.0, 1.0)";
