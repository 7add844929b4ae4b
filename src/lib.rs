//! Trellis — an interactive node-diagram engine.
//!
//! Users place boxed text nodes, connect them as a directed parent→child
//! graph, and move, rotate, and duplicate subtrees; nodes auto-size to
//! their text and push each other apart on overlap. This crate provides:
//!
//! - **Geometry**: vectors, segments, rectangles ([`geometry`] module)
//! - **Nodes**: the diagram box entity with stable identities ([`node`] module)
//! - **Manager**: ownership of the node set, cursor navigation, staged
//!   growth, collision propagation, subtree transforms, and snapshot
//!   (de)serialization ([`manager`] module)
//! - **Settings**: the persisted flat key/value user settings ([`settings`] module)
//! - **Draw/Export**: the one-way paint contract and an SVG backend
//!   ([`draw`] and [`export`] modules)
//!
//! The bundled CLI loads a snapshot file and re-emits it as normalized JSON
//! or as an SVG rendering.

pub mod color;
pub mod draw;
pub mod error;
pub mod export;
pub mod geometry;
pub mod manager;
pub mod node;
pub mod settings;
pub mod snapshot;

use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

pub use error::TrellisError;
pub use manager::{Direction, EngineConfig, NodeManager};

use settings::Settings;
use snapshot::Snapshot;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input snapshot file
    #[arg(help = "Path to the input snapshot file")]
    pub input: String,

    /// Path to the output file; a .svg extension selects SVG rendering,
    /// anything else re-emits normalized snapshot JSON
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to the settings file (defaults to the per-user location)
    #[arg(short, long)]
    pub settings: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

pub fn run(args: &Args) -> Result<(), TrellisError> {
    // Resolve and load the user settings
    let settings = match args
        .settings
        .as_ref()
        .map(PathBuf::from)
        .or_else(Settings::default_path)
    {
        Some(path) => {
            info!(path = path.display().to_string(); "Loading settings");
            Settings::load(&path)?
        }
        None => {
            warn!("No per-user settings location available, using defaults");
            Settings::default()
        }
    };

    let mut manager = NodeManager::new(EngineConfig::from(&settings));

    // Load the snapshot
    info!(input = args.input; "Loading snapshot");
    let loaded = Snapshot::read_from(&args.input)?;
    manager.load(&loaded)?;
    info!(
        nodes = manager.node_count(),
        edges = manager.edge_count();
        "Snapshot loaded",
    );

    // Emit the requested output
    if args.output.ends_with(".svg") {
        info!(output = args.output; "Exporting diagram to SVG");
        export::svg::Svg::new(&args.output).export(&manager)?;
    } else {
        info!(output = args.output; "Writing normalized snapshot");
        manager.dump().write_to(&args.output)?;
    }

    Ok(())
}
