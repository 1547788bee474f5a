pub mod cli;
pub mod legacy;
pub mod model;
pub mod script;
pub mod serialization;
pub mod writer;

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use cli::InputKind;
use model::{Mesh, SystemMemoryBufferManager};
use serialization::MeshReader;

/// Reads a `.mesh` file into a mesh named after the file.
pub fn load_mesh(path: &Path) -> anyhow::Result<Mesh> {
    let file = File::open(path).with_context(|| format!("Opening {}", path.display()))?;
    let mut stream = BufReader::new(file);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut mesh = Mesh::new(name);

    MeshReader::new(&mut stream, &SystemMemoryBufferManager)
        .import(&mut mesh)
        .with_context(|| format!("Importing mesh {}", path.display()))?;
    Ok(mesh)
}

/// Every normalized line of a line-per-directive script.
pub fn load_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("Opening {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut lines = Vec::new();
    while let Some(line) = legacy::read_line(&mut reader)
        .with_context(|| format!("Reading {}", path.display()))?
    {
        lines.push(line);
    }
    Ok(lines)
}

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    if let Err(e) = env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .try_init()
    {
        eprintln!("Warning: Could not initialize logger: {}", e);
    }

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    // ── Load and write ───────────────────────────────────────────────
    match args.kind.resolve(&args.input) {
        InputKind::Mesh => {
            let mesh = load_mesh(&args.input)?;
            writer::json::emit_mesh(&mesh, &mut out, args.pretty)
                .with_context(|| "Writing mesh summary")?;
        }
        InputKind::Lines => {
            let lines = load_lines(&args.input)?;
            writer::json::emit_lines(&lines, &mut out, args.pretty)
                .with_context(|| "Writing lines")?;
        }
        InputKind::Script | InputKind::Auto => {
            let source = std::fs::read_to_string(&args.input)
                .with_context(|| format!("Reading {}", args.input.display()))?;
            let file = args.input.display().to_string();
            let tree = script::compile(&source, &file)
                .with_context(|| format!("Parsing script {file}"))?;
            writer::json::emit_tree(&tree, &mut out, args.pretty)
                .with_context(|| "Writing concrete tree")?;
        }
    }

    out.flush().with_context(|| "Flushing output")?;
    Ok(())
}
