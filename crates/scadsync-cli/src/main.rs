use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use scadsync_core::analysis::inspect_scene;
use scadsync_core::model::{EditorParameters, OutputStyle, ShapeRecord, Unit};
use scadsync_core::stl::{export_scene_stl, StlFormat, StlOptions, EXPORT_FILE_NAME};
use scadsync_core::{generate_scad, parse_script, scan_shapes};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "scadsync")]
#[command(about = "Primitive-solid scenes <-> OpenSCAD-subset scripts, and STL export.")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the script for a scene file.
    Generate {
        scene: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        overrides: ParamOverrides,
    },
    /// Read a script back into a scene file (placement and colour reset).
    Parse {
        script: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Use the statement parser, which reads shell blocks as one shape.
        #[arg(long)]
        structured: bool,
        #[arg(long, default_value_t = Unit::Millimeters)]
        unit: Unit,
    },
    /// Tessellate a scene file into an STL mesh.
    ExportStl {
        scene: PathBuf,
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        out: PathBuf,
        #[arg(long)]
        ascii: bool,
        #[arg(long, default_value_t = 32)]
        segments: u32,
    },
    /// Summarize a scene file as a JSON report.
    Inspect {
        scene: PathBuf,
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

/// Flags that override the parameters stored in a scene file.
#[derive(Debug, Args)]
struct ParamOverrides {
    #[arg(long)]
    unit: Option<Unit>,
    #[arg(long)]
    wall_thickness: Option<f64>,
    #[arg(long)]
    resolution: Option<u32>,
    #[arg(long)]
    style: Option<OutputStyle>,
}

impl ParamOverrides {
    fn apply(&self, params: &mut EditorParameters) {
        if let Some(unit) = self.unit {
            params.unit = unit;
        }
        if let Some(w) = self.wall_thickness {
            params.wall_thickness = w;
        }
        if let Some(n) = self.resolution {
            params.resolution = n;
        }
        if let Some(style) = self.style {
            params.style = style;
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SceneFile {
    #[serde(default)]
    parameters: EditorParameters,
    #[serde(default)]
    shapes: Vec<ShapeRecord>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scadsync=info,scadsync_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate {
            scene,
            out,
            overrides,
        } => generate(&scene, out.as_deref(), &overrides),
        Command::Parse {
            script,
            out,
            structured,
            unit,
        } => parse(&script, out.as_deref(), structured, unit),
        Command::ExportStl {
            scene,
            out,
            ascii,
            segments,
        } => export_stl(&scene, &out, ascii, segments),
        Command::Inspect { scene, report } => inspect(&scene, report.as_deref()),
    }
}

fn generate(scene: &Path, out: Option<&Path>, overrides: &ParamOverrides) -> Result<()> {
    let mut file = read_scene(scene)?;
    overrides.apply(&mut file.parameters);

    let report = inspect_scene(&file.shapes, &file.parameters);
    for warning in &report.warnings {
        tracing::warn!(code = %warning.code, "{}", warning.message);
    }

    let text = generate_scad(&file.shapes, &file.parameters);
    emit_text(out, &text, "script")
}

fn parse(script: &Path, out: Option<&Path>, structured: bool, unit: Unit) -> Result<()> {
    ensure_input_file(script, "script")?;
    let text =
        std::fs::read_to_string(script).with_context(|| format!("read script: {script:?}"))?;

    let parsed = if structured {
        parse_script(&text, unit)
    } else {
        scan_shapes(&text)
    };
    if parsed.is_empty() {
        tracing::warn!("no shapes recognized in {script:?}");
    }

    let parameters = EditorParameters {
        unit,
        style: if structured {
            OutputStyle::Shell
        } else {
            OutputStyle::Solid
        },
        ..EditorParameters::default()
    };
    let file = SceneFile {
        parameters,
        shapes: parsed.into_iter().map(|p| p.into_record()).collect(),
    };
    let json = serde_json::to_string_pretty(&file).context("serialize scene")?;
    emit_text(out, &json, "scene")
}

fn export_stl(scene: &Path, out: &Path, ascii: bool, segments: u32) -> Result<()> {
    let file = read_scene(scene)?;
    if file.shapes.is_empty() {
        bail!("scene has no shapes to export: {scene:?}");
    }
    let options = StlOptions {
        segments,
        format: if ascii {
            StlFormat::Ascii
        } else {
            StlFormat::Binary
        },
    };
    let bytes = export_scene_stl(&file.shapes, &options);
    create_parent(out);
    std::fs::write(out, &bytes).with_context(|| format!("write stl: {out:?}"))?;
    tracing::info!("wrote {} bytes to {out:?}", bytes.len());
    Ok(())
}

fn inspect(scene: &Path, report: Option<&Path>) -> Result<()> {
    let file = read_scene(scene)?;
    let report_data = inspect_scene(&file.shapes, &file.parameters);
    let json = serde_json::to_string_pretty(&report_data).context("serialize report")?;
    emit_text(report, &json, "report")
}

fn read_scene(path: &Path) -> Result<SceneFile> {
    ensure_input_file(path, "scene")?;
    let json = std::fs::read_to_string(path).with_context(|| format!("read scene: {path:?}"))?;
    let file: SceneFile =
        serde_json::from_str(&json).with_context(|| format!("parse scene JSON: {path:?}"))?;
    for (i, shape) in file.shapes.iter().enumerate() {
        if !shape.scale.is_finite() || shape.scale <= 0.0 {
            bail!(
                "shape #{} in {path:?} has invalid scale {}; scale must be positive",
                i + 1,
                shape.scale
            );
        }
    }
    Ok(file)
}

fn emit_text(out: Option<&Path>, text: &str, what: &str) -> Result<()> {
    if let Some(path) = out {
        create_parent(path);
        std::fs::write(path, text).with_context(|| format!("write {what}: {path:?}"))?;
    } else {
        println!("{text}");
    }
    Ok(())
}

fn create_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
}

/// Fail early with a readable message when `input` is missing or not a file.
/// `what` names the expected input ("scene" or "script").
fn ensure_input_file(input: &Path, what: &str) -> Result<()> {
    let meta = match std::fs::metadata(input) {
        Ok(meta) => meta,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            let mut message = format!("{what} file not found: {input:?} (cwd: {cwd:?})");
            if let Some(root) = find_workspace_root(&cwd) {
                message.push_str(&format!(
                    "\nHint: relative {what} paths resolve against the cwd; run from {root:?} or pass an absolute path."
                ));
            }
            bail!(message);
        }
        Err(err) => return Err(err).with_context(|| format!("stat {what} file: {input:?}")),
    };
    if !meta.is_file() {
        bail!("{what} path is not a file: {input:?}");
    }
    Ok(())
}

/// Nearest ancestor holding a `Cargo.toml` with a `[workspace]` table.
fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| {
            std::fs::read_to_string(dir.join("Cargo.toml"))
                .is_ok_and(|manifest| manifest.contains("[workspace]"))
        })
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::{ensure_input_file, find_workspace_root};
    use std::path::Path;

    #[test]
    fn missing_input_names_its_kind() {
        let path = Path::new("no-such-dir-for-scadsync/scene.json");
        let err = ensure_input_file(path, "scene").expect_err("missing file");
        assert!(err.to_string().starts_with("scene file not found"), "{err}");
    }

    #[test]
    fn directory_is_not_an_input_file() {
        let dir = std::env::temp_dir();
        let err = ensure_input_file(&dir, "script").expect_err("directory");
        assert!(err.to_string().starts_with("script path is not a file"), "{err}");
    }

    #[test]
    fn workspace_root_is_found_from_the_crate_dir() {
        let crate_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let root = find_workspace_root(crate_dir).expect("workspace root");
        assert!(root.join("crates").is_dir());
    }
}
