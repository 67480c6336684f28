//! Legacy attribute compatibility rewrite
//!
//! Rewrites a shader written against the fixed-function attribute model so it
//! runs on a pipeline that no longer provides those built-ins.
//!
//! # Rules
//!
//! Run in this order, each at most once:
//!
//! - **Lightmap alias**: `gl_MultiTexCoord1` becomes `gl_MultiTexCoord2`
//! - **Dead channels**: reads of disabled coordinate channels become a constant
//! - **Texture matrix**: `gl_TextureMatrix` is rebuilt as `iris_TextureMatrix[8]`
//! - **Overlay passthrough**: the overlay color is sampled and forwarded between stages
//! - **Mid-texture coordinate**: `gl_MultiTexCoord3` becomes `mc_midTexCoord`
//!
//! # Usage
//!
//! ```ignore
//! use glcompat_edit::IndexedUnit;
//! use glcompat_transform::{transform, AttributeParameters, InputAvailability, ShaderType};
//!
//! let mut unit = IndexedUnit::parse(&source)?;
//! let params = AttributeParameters::new(ShaderType::Vertex, InputAvailability::default(), false);
//! let report = transform(&mut unit, &params)?;
//! for rule in &report.rules {
//!     println!("{}: {}", rule.rule, rule.outcome);
//! }
//! ```

pub mod names;
pub mod parameters;
pub mod plan;
pub mod rules;

pub use parameters::{AttributeParameters, InputAvailability, ShaderType};
pub use plan::{apply_plan, Edit};
pub use rules::{overlay_plan, texture_matrix_plan, AttributeRule, RuleOutcome, SkipReason};

use glcompat_edit::TreeEditor;
use serde::Serialize;
use tracing::debug;

/// Outcome of one rule
#[derive(Debug, Clone, Serialize)]
pub struct RuleReport {
    pub rule: &'static str,
    pub outcome: RuleOutcome,
}

/// Result of running every rule on one translation unit
#[derive(Debug, Clone, Serialize)]
pub struct TransformReport {
    pub stage: ShaderType,
    /// One entry per rule, in the order the rules ran
    pub rules: Vec<RuleReport>,
}

impl TransformReport {
    /// Whether any rule changed the tree
    pub fn modified(&self) -> bool {
        self.rules.iter().any(|r| r.outcome.is_applied())
    }

    pub fn total_edits(&self) -> usize {
        self.rules.iter().map(|r| r.outcome.edits()).sum()
    }

    /// Outcome of the rule with the given name
    pub fn outcome(&self, rule: &str) -> Option<RuleOutcome> {
        self.rules.iter().find(|r| r.rule == rule).map(|r| r.outcome)
    }
}

/// Run all rules on the unit behind `editor`.
///
/// Stages other than vertex, geometry and fragment are left untouched and
/// every rule reports [`SkipReason::UnsupportedStage`]. Parse errors in
/// injected fragments are returned as the editor's error.
pub fn transform<E: TreeEditor>(
    editor: &mut E,
    params: &AttributeParameters,
) -> Result<TransformReport, E::Error> {
    let mut report = TransformReport {
        stage: params.stage,
        rules: Vec::new(),
    };

    for rule in rules::rules::<E>() {
        let outcome = if params.stage.is_supported() {
            rule.apply(editor, params)?
        } else {
            RuleOutcome::Skipped(SkipReason::UnsupportedStage)
        };
        debug!(rule = rule.name(), stage = %params.stage, %outcome, "rule finished");
        report.rules.push(RuleReport {
            rule: rule.name(),
            outcome,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glcompat_ast::print_translation_unit;
    use glcompat_edit::IndexedUnit;

    const VERTEX: &str = "#version 120\nvoid main() {\n  gl_TexCoord[0] = gl_TextureMatrix[0] * gl_MultiTexCoord0;\n  gl_TexCoord[1] = gl_TextureMatrix[1] * gl_MultiTexCoord1;\n}\n";

    #[test]
    fn test_rule_order_in_report() {
        let mut unit = IndexedUnit::parse(VERTEX).unwrap();
        let params = AttributeParameters::new(ShaderType::Vertex, InputAvailability::default(), false);
        let report = transform(&mut unit, &params).unwrap();
        let names: Vec<_> = report.rules.iter().map(|r| r.rule).collect();
        assert_eq!(
            names,
            vec![
                "lightmap-alias",
                "dead-channels",
                "texture-matrix",
                "overlay-passthrough",
                "mid-tex-coord"
            ]
        );
        assert_eq!(
            report.outcome("lightmap-alias"),
            Some(RuleOutcome::Skipped(SkipReason::LightmapDisabled))
        );
        assert_eq!(report.outcome("dead-channels"), Some(RuleOutcome::Applied { edits: 2 }));
        assert_eq!(
            report.outcome("overlay-passthrough"),
            Some(RuleOutcome::Skipped(SkipReason::OverlayDisabled))
        );
        assert!(report.modified());
    }

    #[test]
    fn test_unsupported_stage_passes_through() {
        let mut unit = IndexedUnit::parse(VERTEX).unwrap();
        let params = AttributeParameters::new(
            ShaderType::TessEval,
            InputAvailability {
                lightmap: true,
                texture: true,
                overlay: true,
            },
            true,
        );
        let report = transform(&mut unit, &params).unwrap();
        assert!(report
            .rules
            .iter()
            .all(|r| r.outcome == RuleOutcome::Skipped(SkipReason::UnsupportedStage)));
        assert!(!report.modified());
        assert_eq!(print_translation_unit(unit.unit()), VERTEX);
    }

    #[test]
    fn test_lightmap_enabled_keeps_channel_two_reads() {
        let mut unit = IndexedUnit::parse(VERTEX).unwrap();
        let params = AttributeParameters::new(
            ShaderType::Vertex,
            InputAvailability {
                lightmap: true,
                texture: true,
                overlay: false,
            },
            false,
        );
        let report = transform(&mut unit, &params).unwrap();
        assert_eq!(report.outcome("lightmap-alias"), Some(RuleOutcome::Applied { edits: 1 }));
        assert_eq!(
            report.outcome("dead-channels"),
            Some(RuleOutcome::Skipped(SkipReason::AllChannelsEnabled))
        );
        let printed = print_translation_unit(unit.unit());
        assert!(printed.contains("gl_TexCoord[1] = iris_TextureMatrix[1] * gl_MultiTexCoord2;"));
        assert!(!printed.contains("240.0"));
    }

    #[test]
    fn test_report_serializes() {
        let mut unit = IndexedUnit::parse("void main() {}").unwrap();
        let params = AttributeParameters::new(ShaderType::Fragment, InputAvailability::default(), false);
        let report = transform(&mut unit, &params).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stage"], "fragment");
        assert_eq!(json["rules"][4]["outcome"]["skipped"], "not_vertex_stage");
        assert_eq!(json["rules"][2]["outcome"]["applied"]["edits"], 4);
    }
}
