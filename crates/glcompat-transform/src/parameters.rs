//! Per-stage configuration for the attribute rewrite

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Pipeline stage a translation unit is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderType {
    Vertex,
    Geometry,
    Fragment,
    Compute,
    TessControl,
    TessEval,
}

impl ShaderType {
    /// Infer the stage from a shader file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "vsh" | "vert" => Some(ShaderType::Vertex),
            "gsh" | "geom" => Some(ShaderType::Geometry),
            "fsh" | "frag" => Some(ShaderType::Fragment),
            "csh" | "comp" => Some(ShaderType::Compute),
            "tcs" => Some(ShaderType::TessControl),
            "tes" => Some(ShaderType::TessEval),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Stages the attribute rewrite knows how to patch
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            ShaderType::Vertex | ShaderType::Geometry | ShaderType::Fragment
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShaderType::Vertex => "vertex",
            ShaderType::Geometry => "geometry",
            ShaderType::Fragment => "fragment",
            ShaderType::Compute => "compute",
            ShaderType::TessControl => "tess_control",
            ShaderType::TessEval => "tess_eval",
        }
    }
}

impl std::str::FromStr for ShaderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertex" => Ok(ShaderType::Vertex),
            "geometry" => Ok(ShaderType::Geometry),
            "fragment" => Ok(ShaderType::Fragment),
            "compute" => Ok(ShaderType::Compute),
            "tess_control" => Ok(ShaderType::TessControl),
            "tess_eval" => Ok(ShaderType::TessEval),
            other => Err(format!("unknown shader stage '{}'", other)),
        }
    }
}

impl std::fmt::Display for ShaderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which legacy fixed-function inputs the rendering context supplies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputAvailability {
    /// Lightmap coordinates (`gl_MultiTexCoord1` / `gl_MultiTexCoord2`)
    pub lightmap: bool,
    /// Primary texture coordinates (`gl_MultiTexCoord0`)
    pub texture: bool,
    /// Entity overlay color
    pub overlay: bool,
}

/// Everything the rewrite needs to know about one stage compile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeParameters {
    pub stage: ShaderType,
    #[serde(default)]
    pub inputs: InputAvailability,
    /// Whether the program has a geometry stage between vertex and fragment
    #[serde(default)]
    pub has_geometry: bool,
}

impl AttributeParameters {
    pub fn new(stage: ShaderType, inputs: InputAvailability, has_geometry: bool) -> Self {
        Self {
            stage,
            inputs,
            has_geometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_extension() {
        assert_eq!(ShaderType::from_path(Path::new("gbuffers_entities.vsh")), Some(ShaderType::Vertex));
        assert_eq!(ShaderType::from_path(Path::new("shadow.gsh")), Some(ShaderType::Geometry));
        assert_eq!(ShaderType::from_path(Path::new("final.frag")), Some(ShaderType::Fragment));
        assert_eq!(ShaderType::from_path(Path::new("shaders.properties")), None);
        assert_eq!(ShaderType::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_stage_name_roundtrip() {
        for stage in [
            ShaderType::Vertex,
            ShaderType::Geometry,
            ShaderType::Fragment,
            ShaderType::Compute,
            ShaderType::TessControl,
            ShaderType::TessEval,
        ] {
            assert_eq!(stage.name().parse::<ShaderType>(), Ok(stage));
        }
    }

    #[test]
    fn test_parameters_from_json_with_defaults() {
        let params: AttributeParameters =
            serde_json::from_str(r#"{"stage": "geometry", "inputs": {"overlay": true}}"#).unwrap();
        assert_eq!(params.stage, ShaderType::Geometry);
        assert!(params.inputs.overlay);
        assert!(!params.inputs.lightmap);
        assert!(!params.has_geometry);
    }

    #[test]
    fn test_unknown_stage_rejected() {
        let result: Result<AttributeParameters, _> = serde_json::from_str(r#"{"stage": "mesh"}"#);
        assert!(result.is_err());
    }
}
