//! Example: outline a row of member boxes around a blocking obstacle.
//!
//! Members are laid out on a line with one non-member in the middle, so the
//! virtual edge through the middle has to detour. The resulting path is
//! printed as SVG path data; `--json` prints the full outline instead.
//!
//! Run from the workspace root:
//!   cargo run -p bubblesets --example outline -- --help
//!   cargo run -p bubblesets --example outline -- --members 5 --smooth 6

use anyhow::{Result, bail};
use bubblesets::{OutlineConfig, PathConfig, Shape, try_create_outline};
use clap::Parser;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "Compute a bubble set outline for a generated scene")]
struct Args {
    /// Number of member boxes
    #[arg(long, default_value_t = 4)]
    members: usize,

    /// Horizontal spacing between members
    #[arg(long, default_value_t = 90.0)]
    spacing: f32,

    /// B-spline samples per control-point span (0 disables smoothing)
    #[arg(long, default_value_t = 0)]
    smooth: usize,

    /// Simplification tolerance (0 disables simplification)
    #[arg(long, default_value_t = 0.0)]
    simplify: f32,

    /// Print the outline as JSON instead of SVG path data
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    status: &'a str,
    iterations: usize,
    threshold: f32,
    virtual_edges: usize,
    rerouted: usize,
    points: usize,
    svg: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.members == 0 {
        bail!("--members must be at least 1");
    }

    let members: Vec<Shape> = (0..args.members)
        .map(|i| Shape::rect(i as f32 * args.spacing, 0.0, 30.0, 20.0))
        .collect();
    let mid = (args.members as f32 - 1.0) * args.spacing * 0.5;
    let obstacle = Shape::rect(mid - 5.0, -25.0, 40.0, 70.0);

    let outline = try_create_outline(&members, &[obstacle], &[], &OutlineConfig::default())?;
    let path = outline.post_process(&PathConfig {
        simplify_tolerance: (args.simplify > 0.0).then_some(args.simplify),
        smooth_granularity: (args.smooth > 0).then_some(args.smooth),
    });

    if args.json {
        let summary = Summary {
            status: outline.outcome.status(),
            iterations: outline.stats.state.iterations,
            threshold: outline.stats.state.threshold,
            virtual_edges: outline.virtual_edges.len(),
            rerouted: outline
                .virtual_edges
                .iter()
                .filter(|e| e.is_rerouted())
                .count(),
            points: path.len(),
            svg: path.to_svg_path(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if path.is_empty() {
        println!("no outline: {}", outline.outcome.status());
    } else {
        println!("{}", path.to_svg_path());
    }

    Ok(())
}
