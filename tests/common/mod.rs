//! Shared helpers for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use glcompat::ast::print_translation_unit;
use glcompat::edit::IndexedUnit;
use glcompat::transform::{transform, AttributeParameters, InputAvailability, ShaderType, TransformReport};

/// Directory holding the shader fixtures
pub fn shaders_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders")
}

/// Discover every shader fixture whose stage can be inferred from its extension
pub fn discover_shaders() -> Vec<PathBuf> {
    let mut paths: Vec<_> = fs::read_dir(shaders_dir())
        .expect("Failed to read shaders directory")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| ShaderType::from_path(path).is_some())
        .collect();
    paths.sort();
    paths
}

/// Load a shader fixture by file name
pub fn load_shader(name: &str) -> String {
    let path = shaders_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load shader {}: {}", name, e))
}

/// Parameters builder for the common cases
pub fn params(stage: ShaderType, lightmap: bool, texture: bool, overlay: bool, has_geometry: bool) -> AttributeParameters {
    AttributeParameters::new(
        stage,
        InputAvailability {
            lightmap,
            texture,
            overlay,
        },
        has_geometry,
    )
}

/// Parse, rewrite and print a shader
pub fn patch(source: &str, params: &AttributeParameters) -> (String, TransformReport) {
    let mut unit = IndexedUnit::parse(source).unwrap_or_else(|e| panic!("Failed to parse: {:?}", e));
    let report = transform(&mut unit, params).unwrap_or_else(|e| panic!("Rewrite failed: {:?}", e));
    (print_translation_unit(&unit.into_inner()), report)
}

/// Assert that printed output parses again
pub fn assert_reparses(source: &str) {
    if let Err(e) = glcompat::parser::parse(source) {
        panic!("Output does not parse: {:?}\n{}", e, source);
    }
}

/// Number of non-overlapping occurrences of `needle`
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Byte position of `needle`, panicking with the text when absent
pub fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("expected {:?} in:\n{}", needle, haystack))
}

/// Number of `#if*` groups still open at byte `pos` of printed source
pub fn conditional_depth(source: &str, pos: usize) -> usize {
    let mut depth = 0usize;
    for line in source[..pos].lines() {
        match glcompat::ast::directive_keyword(line) {
            _ if !line.trim_start().starts_with('#') => {}
            "if" | "ifdef" | "ifndef" => depth += 1,
            "endif" => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth
}
