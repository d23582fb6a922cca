use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bubblesets::{
    FieldSnapshot, Outline, OutlineConfig, OutlineStats, PathConfig, Point2f, PointPath, Segment,
    Shape, SnapshotSink, create_outline_with_sink,
};
use clap::{Args, Parser, Subcommand};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

const MAX_RENDER_SIDE: f32 = 8192.0;

#[derive(Parser, Debug)]
#[command(name = "bs_gallery")]
#[command(about = "Compute bubble set outlines for JSON scenes")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "outline")]
    Outline(OutlineArgs),
    #[command(name = "sample_scene")]
    SampleScene(SampleSceneArgs),
}

#[derive(Args, Debug, Clone)]
struct OutlineArgs {
    #[arg(long, required = true)]
    scene: PathBuf,
    #[arg(long, default_value = "out")]
    out: PathBuf,
    /// Overrides `config.pixel_group`
    #[arg(long)]
    pixel_group: Option<f32>,
    /// Overrides `config.skip`
    #[arg(long)]
    skip: Option<usize>,
    /// Overrides `config.threshold`
    #[arg(long)]
    threshold: Option<f32>,
    /// Overrides `path.simplify_tolerance`
    #[arg(long)]
    simplify: Option<f32>,
    /// Overrides `path.smooth_granularity`
    #[arg(long)]
    smooth: Option<usize>,
    /// Render pixels per screen unit
    #[arg(long, default_value_t = 2.0)]
    scale: f32,
    /// Also write the final field as field.json
    #[arg(long)]
    dump_field: bool,
    #[arg(long)]
    no_render: bool,
}

#[derive(Args, Debug, Clone)]
struct SampleSceneArgs {
    #[arg(long, default_value = "scene.json")]
    out: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scene {
    members: Vec<Shape>,
    #[serde(default)]
    non_members: Vec<Shape>,
    #[serde(default)]
    edges: Vec<Segment>,
    #[serde(default)]
    config: OutlineConfig,
    #[serde(default)]
    path: PathConfig,
}

#[derive(Debug, Clone, Serialize)]
struct OutlineReport<'a> {
    status: &'static str,
    svg: String,
    points: Vec<[f32; 2]>,
    processed: Vec<[f32; 2]>,
    virtual_edges: Vec<Vec<[f32; 2]>>,
    rerouted: usize,
    exhausted: usize,
    stats: &'a OutlineStats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Outline(args) => run_outline(args),
        Command::SampleScene(args) => run_sample_scene(args),
    }
}

fn run_outline(args: OutlineArgs) -> Result<()> {
    let mut scene: Scene = read_json(&args.scene)
        .with_context(|| format!("reading scene {}", args.scene.display()))?;
    apply_overrides(&mut scene, &args);
    validate_scene(&scene)?;

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    let mut sink = SnapshotSink::default();
    let outline = create_outline_with_sink(
        &scene.members,
        &scene.non_members,
        &scene.edges,
        &scene.config,
        &mut sink,
    );
    let processed = outline.post_process(&scene.path);
    info!(
        status = outline.outcome.status(),
        points = outline.path.len(),
        processed = processed.len(),
        iterations = outline.stats.state.iterations,
        "outline computed"
    );

    write_json(
        args.out.join("outline.json"),
        &outline_report(&outline, &processed),
    )?;

    match sink.snapshot {
        Some(snapshot) => {
            if args.dump_field {
                write_json(args.out.join("field.json"), &snapshot)?;
            }
            if !args.no_render {
                let img = render(&scene, &outline, &processed, &snapshot, args.scale)?;
                let path = args.out.join("render.png");
                img.save(&path)
                    .with_context(|| format!("saving image {}", path.display()))?;
            }
        }
        None => info!("scene has no members, nothing to render"),
    }

    Ok(())
}

fn run_sample_scene(args: SampleSceneArgs) -> Result<()> {
    let members = (0..4)
        .map(|i| Shape::rect(i as f32 * 90.0, (i % 2) as f32 * 30.0, 40.0, 24.0))
        .chain(std::iter::once(Shape::circle(140.0, 120.0, 16.0)))
        .collect();
    let scene = Scene {
        members,
        non_members: vec![
            Shape::rect(120.0, -30.0, 30.0, 90.0),
            Shape::circle(260.0, 110.0, 18.0),
        ],
        edges: Vec::new(),
        config: OutlineConfig::default(),
        path: PathConfig {
            simplify_tolerance: None,
            smooth_granularity: Some(6),
        },
    };

    if let Some(dir) = args.out.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }
    write_json(args.out.clone(), &scene)?;
    info!(path = %args.out.display(), "sample scene written");
    Ok(())
}

fn apply_overrides(scene: &mut Scene, args: &OutlineArgs) {
    let cfg = &mut scene.config;
    if let Some(pg) = args.pixel_group {
        cfg.pixel_group = pg;
    }
    if let Some(skip) = args.skip {
        cfg.skip = skip;
    }
    if let Some(t) = args.threshold {
        cfg.threshold = t;
    }
    if args.simplify.is_some() {
        scene.path.simplify_tolerance = args.simplify;
    }
    if args.smooth.is_some() {
        scene.path.smooth_granularity = args.smooth;
    }
}

fn validate_scene(scene: &Scene) -> Result<()> {
    scene.config.validate().context("invalid scene config")?;
    for (i, m) in scene.members.iter().enumerate() {
        m.validate().with_context(|| format!("member {i}"))?;
    }
    for (i, n) in scene.non_members.iter().enumerate() {
        n.validate().with_context(|| format!("non-member {i}"))?;
    }
    for (i, e) in scene.edges.iter().enumerate() {
        if !(e.a.is_finite() && e.b.is_finite()) {
            bail!("edge {i} has a non-finite endpoint");
        }
    }
    Ok(())
}

fn outline_report<'a>(outline: &'a Outline, processed: &PointPath) -> OutlineReport<'a> {
    OutlineReport {
        status: outline.outcome.status(),
        svg: processed.to_svg_path(),
        points: xy(outline.path.points()),
        processed: xy(processed.points()),
        virtual_edges: outline.virtual_edges.iter().map(|e| xy(&e.points())).collect(),
        rerouted: outline
            .virtual_edges
            .iter()
            .filter(|e| e.is_rerouted())
            .count(),
        exhausted: outline.virtual_edges.iter().filter(|e| e.exhausted).count(),
        stats: &outline.stats,
    }
}

fn xy(points: &[Point2f]) -> Vec<[f32; 2]> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

// ── Rendering ───────────────────────────────────────────────────────────────

struct Canvas {
    img: RgbImage,
    origin: Point2f,
    scale: f32,
}

impl Canvas {
    fn to_px(&self, p: Point2f) -> (f32, f32) {
        (
            (p.x - self.origin.x) * self.scale,
            (p.y - self.origin.y) * self.scale,
        )
    }

    fn dot(&mut self, x: f32, y: f32, color: Rgb<u8>) {
        let (xi, yi) = (x.round() as i64, y.round() as i64);
        if xi < 0 || yi < 0 {
            return;
        }
        let (ux, uy) = (xi as u32, yi as u32);
        if ux < self.img.width() && uy < self.img.height() {
            self.img.put_pixel(ux, uy, color);
        }
    }

    fn line(&mut self, a: Point2f, b: Point2f, color: Rgb<u8>) {
        let (x0, y0) = self.to_px(a);
        let (x1, y1) = self.to_px(b);
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.dot(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, color);
        }
    }

    fn polyline(&mut self, points: &[Point2f], closed: bool, color: Rgb<u8>) {
        for w in points.windows(2) {
            self.line(w[0], w[1], color);
        }
        if closed && let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            self.line(last, first, color);
        }
    }

    fn shape(&mut self, shape: &Shape, color: Rgb<u8>) {
        match shape {
            Shape::Rect(r) => {
                for edge in r.edges() {
                    self.line(edge.a, edge.b, color);
                }
            }
            Shape::Circle(c) => {
                let n = ((c.radius * self.scale * 2.0).ceil() as usize).clamp(16, 720);
                let ring: Vec<Point2f> = (0..n)
                    .map(|i| {
                        let a = i as f32 / n as f32 * std::f32::consts::TAU;
                        Point2f::new(c.cx + c.radius * a.cos(), c.cy + c.radius * a.sin())
                    })
                    .collect();
                self.polyline(&ring, true, color);
            }
        }
    }
}

fn render(
    scene: &Scene,
    outline: &Outline,
    processed: &PointPath,
    field: &FieldSnapshot,
    scale: f32,
) -> Result<RgbImage> {
    if !(scale > 0.0 && scale.is_finite()) {
        bail!("render scale must be positive, got {scale}");
    }
    let Some(first) = field.cells.first() else {
        bail!("field snapshot is empty");
    };

    let side = field.pixel_group * scale;
    let w = field.width as f32 * side;
    let h = field.height as f32 * side;
    if w > MAX_RENDER_SIDE || h > MAX_RENDER_SIDE {
        bail!("render of {w}x{h} pixels is too large, lower --scale");
    }

    let mut canvas = Canvas {
        img: RgbImage::new(w.ceil() as u32, h.ceil() as u32),
        origin: Point2f::new(first.x, first.y),
        scale,
    };
    heatmap(&mut canvas.img, field, side);

    for edge in &outline.virtual_edges {
        canvas.polyline(&edge.points(), false, Rgb([230, 200, 60]));
    }
    for edge in &scene.edges {
        canvas.line(edge.a, edge.b, Rgb([230, 140, 40]));
    }
    for m in &scene.members {
        canvas.shape(m, Rgb([80, 220, 100]));
    }
    for n in &scene.non_members {
        canvas.shape(n, Rgb([230, 70, 70]));
    }
    canvas.polyline(outline.path.points(), true, Rgb([90, 90, 255]));
    canvas.polyline(processed.points(), processed.is_closed(), Rgb([255, 255, 255]));

    Ok(canvas.img)
}

/// Gray energy ramp; cells above the threshold are tinted blue.
fn heatmap(img: &mut RgbImage, field: &FieldSnapshot, side: f32) {
    let max = field.max_value();
    let norm = if max > 0.0 { 200.0 / max } else { 0.0 };

    for (px, py, pixel) in img.enumerate_pixels_mut() {
        let cx = (px as f32 / side) as usize;
        let cy = (py as f32 / side) as usize;
        let v = field.value(cx, cy).unwrap_or(0.0);
        let g = (v.max(0.0) * norm).round().clamp(0.0, 255.0) as u8;
        *pixel = if v > field.threshold {
            Rgb([g / 2, g / 2, g.saturating_add(40)])
        } else {
            Rgb([g, g, g])
        };
    }
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}
