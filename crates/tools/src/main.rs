use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tools::{Scene, parse_rect, scene_bounding_box, tessellate_scene};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Project and tessellate map geometry for a viewport")]
struct Args {
    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tessellate every line of a scene into screen polygons
    Tessellate {
        /// Scene file (JSON)
        #[arg(long)]
        scene: PathBuf,
    },

    /// Geographic box visible on screen or inside a screen rectangle
    Bbox {
        /// Scene file (JSON)
        #[arg(long)]
        scene: PathBuf,

        /// Screen rectangle: left,top,width,height (default: whole screen)
        #[arg(long)]
        rect: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<(), String> {
    match args.command {
        Command::Tessellate { scene } => {
            let scene = load(&scene)?;
            print_json(&tessellate_scene(&scene), args.pretty)
        }
        Command::Bbox { scene, rect } => {
            let scene = load(&scene)?;
            let rect = rect.as_deref().map(parse_rect).transpose()?;
            match scene_bounding_box(&scene, rect) {
                Some(report) => print_json(&report, args.pretty),
                None => Err("rectangle does not touch the map".to_string()),
            }
        }
    }
}

fn load(path: &Path) -> Result<Scene, String> {
    Scene::load(path).map_err(|e| format!("load {path:?}: {e}"))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| format!("serialize: {e}"))?;
    println!("{text}");
    Ok(())
}
