use std::path::{Path, PathBuf};

use edgesplit_core::{
    load_obj, load_scene, make_quad_grid, save_scene, write_obj, EdgeSplit, IoError,
    MeshDocument, SceneFile, SplitMode, SplitParams, UvTag,
};
use tracing_subscriber::filter::LevelFilter;

use crate::logging::parse_level;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CliArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub edges: Option<Vec<usize>>,
    pub shift: bool,
    pub print: bool,
    pub undo: bool,
    pub help: bool,
    pub log_level: LevelFilter,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            edges: None,
            shift: false,
            print: false,
            undo: false,
            help: false,
            log_level: LevelFilter::INFO,
        }
    }
}

pub(crate) fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    // The first entry is the program name.
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--input" | "-i" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--input requires a path".to_string())?;
                parsed.input = Some(PathBuf::from(value));
            }
            "--output" | "-o" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--output requires a path".to_string())?;
                parsed.output = Some(PathBuf::from(value));
            }
            "--edges" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--edges requires a list of indices".to_string())?;
                parsed.edges = Some(parse_edge_list(value)?);
            }
            "--shift" | "--triangles" => parsed.shift = true,
            "--print" => parsed.print = true,
            "--undo" => parsed.undo = true,
            "--log-level" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--log-level requires a level".to_string())?;
                parsed.log_level = parse_level(value)?;
            }
            "--help" | "-h" => parsed.help = true,
            other => return Err(format!("unknown argument '{other}'")),
        }
    }

    Ok(parsed)
}

fn parse_edge_list(value: &str) -> Result<Vec<usize>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<usize>()
                .map_err(|_| format!("invalid edge index '{item}'"))
        })
        .collect()
}

pub(crate) fn print_help() {
    println!(
        "edgesplit: split selected edges of a quad mesh\n\n\
         Options:\n  \
         --input <path>        .json scene or .obj mesh (default: demo grid)\n  \
         --output <path>       write the result as .json or .obj\n  \
         --edges <i,j,..>      raw edge indices to split (polygon * 4 + edge)\n  \
         --shift | --triangles split into triangles only\n  \
         --print               print the split report as JSON\n  \
         --undo                undo the split after applying it\n  \
         --log-level <level>   off, error, warn, info, debug or trace\n  \
         --help"
    );
}

pub(crate) fn run(args: &CliArgs) -> Result<(), String> {
    let (mut document, scene_params) = match &args.input {
        Some(path) => load_document(path)?,
        None => (demo_document()?, SplitParams::default()),
    };

    if let Some(edges) = &args.edges {
        document.select_edges(edges).map_err(|err| err.to_string())?;
    }

    let params = if args.shift {
        SplitParams::with_mode(SplitMode::from_modifier(true))
    } else {
        scene_params
    };

    let report = EdgeSplit::new(params.clone())
        .apply(&mut document)
        .map_err(|err| format!("edge split failed: {err}"))?;

    if args.print {
        let json = serde_json::to_string_pretty(&report).map_err(|err| err.to_string())?;
        println!("{json}");
    }

    if args.undo {
        if document.undo() {
            tracing::info!("cli: split undone");
        } else {
            tracing::warn!("cli: nothing to undo");
        }
    }

    if let Some(path) = &args.output {
        save_document(path, &document, params)?;
        tracing::info!("cli: saved {:?}", path);
    }

    tracing::info!("cli: completed");
    Ok(())
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

fn load_document(path: &Path) -> Result<(MeshDocument, SplitParams), String> {
    match extension(path).as_str() {
        "json" => {
            let scene = load_scene(path).map_err(|err| err.to_string())?;
            let params = scene.split.clone();
            let document = scene.into_document().map_err(|err| err.to_string())?;
            Ok((document, params))
        }
        "obj" => {
            let document = load_obj(path).map_err(|err| err.to_string())?;
            Ok((document, SplitParams::default()))
        }
        other => Err(IoError::UnsupportedFormat(other.to_string()).to_string()),
    }
}

fn save_document(path: &Path, document: &MeshDocument, params: SplitParams) -> Result<(), String> {
    match extension(path).as_str() {
        "json" => save_scene(path, &SceneFile::from_document(document, params))
            .map_err(|err| err.to_string()),
        "obj" => write_obj(path, document).map_err(|err| err.to_string()),
        other => Err(IoError::UnsupportedFormat(other.to_string()).to_string()),
    }
}

/// A 2x2 grid with a weight map, planar UVs and one edge selected on each of
/// the first two polygons.
pub(crate) fn demo_document() -> Result<MeshDocument, String> {
    let mesh = make_quad_grid([2.0, 2.0], [2, 2]);
    let bounds = mesh.bounds();
    let weights: Vec<f32> = mesh.points.iter().map(|p| p[0] * 0.5 + 0.5).collect();
    let uv_rows = mesh
        .polygons
        .iter()
        .map(|poly| {
            poly.corners().map(|index| {
                let p = mesh.points[index as usize];
                match bounds {
                    Some(b) => [
                        (p[0] - b.min[0]) / (b.max[0] - b.min[0]).max(f32::EPSILON),
                        (p[2] - b.min[2]) / (b.max[2] - b.min[2]).max(f32::EPSILON),
                    ],
                    None => [0.0, 0.0],
                }
            })
        })
        .collect();

    let mut document = MeshDocument::new(mesh);
    document
        .add_weight_map("height", weights)
        .map_err(|err| err.to_string())?;
    document
        .set_uv(UvTag::new(uv_rows))
        .map_err(|err| err.to_string())?;
    document
        .select_edges(&[1, 7])
        .map_err(|err| err.to_string())?;
    Ok(document)
}
