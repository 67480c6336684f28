//! glcompat CLI - Command line interface for the legacy attribute rewriter

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use glcompat_ast::print_translation_unit;
use glcompat_edit::IndexedUnit;
use glcompat_parser::{parse, ParseError};
use glcompat_transform::{transform, AttributeParameters, InputAvailability, ShaderType};

#[derive(Parser)]
#[command(name = "glcompat")]
#[command(about = "Rewrite legacy fixed-function shader attributes for core pipelines", long_about = None)]
struct Cli {
    /// Log rule decisions to stderr (repeat for edit-level tracing)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a shader and output the AST as JSON
    Parse {
        /// Input file
        file: PathBuf,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Apply the attribute compatibility rewrite and print the result
    Patch {
        /// Input file
        file: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the per-rule report as JSON to stderr
        #[arg(long)]
        report: bool,
    },
    /// List identifiers and how often each occurs in each role
    Index {
        /// Input file
        file: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct ParamArgs {
    /// Shader stage (vertex, geometry, fragment, compute, tess_control, tess_eval);
    /// inferred from the file extension when omitted
    #[arg(long)]
    stage: Option<ShaderType>,
    /// Lightmap coordinates are supplied
    #[arg(long)]
    lightmap: bool,
    /// Primary texture coordinates are supplied
    #[arg(long)]
    texture: bool,
    /// Overlay color is supplied
    #[arg(long)]
    overlay: bool,
    /// The program has a geometry stage
    #[arg(long)]
    geometry: bool,
    /// JSON file with attribute parameters; flags override its values
    #[arg(long)]
    params: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse { file, pretty } => cmd_parse(&file, pretty),
        Commands::Patch {
            file,
            params,
            output,
            report,
        } => cmd_patch(&file, &params, output, report),
        Commands::Index { file } => cmd_index(&file),
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        // Targets match by prefix, so this covers every glcompat_* crate
        0 => "glcompat=warn",
        1 => "glcompat=debug",
        _ => "glcompat=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(file: &Path) -> String {
    match fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            std::process::exit(1);
        }
    }
}

fn cmd_parse(file: &Path, pretty: bool) {
    let source = read_source(file);

    match parse(&source) {
        Ok(unit) => {
            let json = if pretty {
                serde_json::to_string_pretty(&unit)
            } else {
                serde_json::to_string(&unit)
            };
            match json {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing AST: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            report_parse_error(&source, file, &e);
            std::process::exit(1);
        }
    }
}

fn cmd_patch(file: &Path, args: &ParamArgs, output: Option<PathBuf>, print_report: bool) {
    let params = match build_params(file, args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    debug!(?params, "attribute parameters");

    let source = read_source(file);
    let mut unit = match IndexedUnit::parse(&source) {
        Ok(u) => u,
        Err(e) => {
            report_parse_error(&source, file, &e);
            std::process::exit(1);
        }
    };

    let report = match transform(&mut unit, &params) {
        Ok(r) => r,
        Err(e) => {
            // Injected fragments are fixed text; a failure here is an internal bug
            eprintln!("Internal error while rewriting {}: {}", file.display(), e);
            std::process::exit(1);
        }
    };
    info!(
        file = %file.display(),
        stage = %params.stage,
        edits = report.total_edits(),
        "rewrite finished"
    );

    if print_report {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => eprintln!("Error serializing report: {}", e),
        }
    }

    let patched = print_translation_unit(&unit.into_inner());
    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &patched) {
                eprintln!("Error writing {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => print!("{}", patched),
    }
}

fn cmd_index(file: &Path) {
    let source = read_source(file);
    let unit = match IndexedUnit::parse(&source) {
        Ok(u) => u,
        Err(e) => {
            report_parse_error(&source, file, &e);
            std::process::exit(1);
        }
    };

    let index = unit.index();
    for name in index.names() {
        // Names never declared in the unit are built-ins or come from elsewhere
        let marker = if index.is_declared(name) { "" } else { " (undeclared)" };
        println!("{}: {}{}", name, describe_occurrences(index.occurrences(name)), marker);
    }
    info!(identifiers = index.len(), "indexed {}", file.display());
}

/// `2 reference, 1 declaration` style summary, in a stable order
fn describe_occurrences(occurrences: &[glcompat_ast::Occurrence]) -> String {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for occ in occurrences {
        *counts.entry(occ.kind.describe()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(kind, count)| format!("{} {}", count, kind))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Combine the parameters file, the stage inferred from the path, and flags
fn build_params(file: &Path, args: &ParamArgs) -> Result<AttributeParameters, String> {
    let mut params = match &args.params {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("reading {}: {}", path.display(), e))?;
            serde_json::from_str::<AttributeParameters>(&text)
                .map_err(|e| format!("parsing {}: {}", path.display(), e))?
        }
        None => {
            let stage = match args.stage {
                Some(stage) => stage,
                None => ShaderType::from_path(file).ok_or_else(|| {
                    format!(
                        "cannot infer the shader stage of {}; pass --stage",
                        file.display()
                    )
                })?,
            };
            AttributeParameters::new(stage, InputAvailability::default(), false)
        }
    };

    if let Some(stage) = args.stage {
        params.stage = stage;
    }
    params.inputs.lightmap |= args.lightmap;
    params.inputs.texture |= args.texture;
    params.inputs.overlay |= args.overlay;
    params.has_geometry |= args.geometry;

    Ok(params)
}

fn report_parse_error(source: &str, file: &Path, error: &ParseError) {
    let span = error.span();
    let name = file.to_string_lossy().to_string();
    let printed = Report::build(ReportKind::Error, name.clone(), span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((name.clone(), span.start..span.end))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((name, Source::from(source)));
    if let Err(e) = printed {
        eprintln!("{}: {}", file.display(), error);
        debug!("failed to render diagnostic: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_extension() {
        let params = build_params(Path::new("gbuffers_basic.fsh"), &ParamArgs::default()).unwrap();
        assert_eq!(params.stage, ShaderType::Fragment);
        assert_eq!(params.inputs, InputAvailability::default());
        assert!(!params.has_geometry);
    }

    #[test]
    fn test_flags_set_inputs_and_stage() {
        let args = ParamArgs {
            stage: Some(ShaderType::Geometry),
            lightmap: true,
            overlay: true,
            ..Default::default()
        };
        let params = build_params(Path::new("shader.glsl"), &args).unwrap();
        assert_eq!(params.stage, ShaderType::Geometry);
        assert!(params.inputs.lightmap);
        assert!(!params.inputs.texture);
        assert!(params.inputs.overlay);
    }

    #[test]
    fn test_unknown_extension_requires_stage() {
        let err = build_params(Path::new("shader.glsl"), &ParamArgs::default()).unwrap_err();
        assert!(err.contains("--stage"));
    }

    #[test]
    fn test_flags_override_params_file() {
        let path = std::env::temp_dir().join(format!("glcompat-params-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{"stage": "vertex", "inputs": {"texture": true}, "has_geometry": false}"#,
        )
        .unwrap();
        let args = ParamArgs {
            stage: Some(ShaderType::Fragment),
            geometry: true,
            params: Some(path.clone()),
            ..Default::default()
        };
        let params = build_params(Path::new("x.vsh"), &args).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(params.stage, ShaderType::Fragment);
        assert!(params.inputs.texture);
        assert!(params.has_geometry);
    }

    #[test]
    fn test_describe_occurrences() {
        let unit = IndexedUnit::parse("in vec4 a;\nvoid main() { a = a * 2.0; }").unwrap();
        assert_eq!(
            describe_occurrences(unit.index().occurrences("a")),
            "1 declaration, 2 reference"
        );
    }
}
