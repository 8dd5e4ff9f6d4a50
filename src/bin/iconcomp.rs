use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use iconcomp::render::plan::DrawOp;
use iconcomp::{AutomaticFillPolicy, CompositionEngine, IconBundle, RenderOpts, mime_for_name};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "iconcomp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an icon bundle to a PNG.
    Render(RenderArgs),
    /// Print the resolved draw order of an icon bundle as JSON lines.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input bundle directory (`icon.json` plus `Assets/`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output edge length in pixels.
    #[arg(long, default_value_t = iconcomp::render::opts::DEFAULT_SIZE)]
    size: u32,

    /// Decode layer sources on the calling thread.
    #[arg(long)]
    sequential_decode: bool,

    /// Paint `none`/`automatic` fill specializations opaque black.
    #[arg(long)]
    force_black_automatic_fill: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input bundle directory (`icon.json` plus `Assets/`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Canvas edge length used for placement.
    #[arg(long, default_value_t = iconcomp::render::opts::DEFAULT_SIZE)]
    size: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let bundle = IconBundle::open(&args.in_path)
        .with_context(|| format!("open bundle '{}'", args.in_path.display()))?;

    let policy = if args.force_black_automatic_fill {
        AutomaticFillPolicy::ForceOpaqueBlack
    } else {
        AutomaticFillPolicy::Preserve
    };
    let opts = RenderOpts::default()
        .with_size(args.size)
        .with_automatic_fill(policy)
        .with_parallel_decode(!args.sequential_decode);

    let mut engine = CompositionEngine::new(opts)?;
    let png = engine.render_png(&bundle.document, &bundle.assets)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let bundle = IconBundle::open(&args.in_path)
        .with_context(|| format!("open bundle '{}'", args.in_path.display()))?;
    let engine = CompositionEngine::new(RenderOpts::default().with_size(args.size))?;
    let plan = engine.plan(&bundle.document, &bundle.assets)?;

    for op in &plan.ops {
        let line = match op {
            DrawOp::Shadow(s) => serde_json::json!({
                "op": "shadow",
                "group": s.target.group,
                "layer": s.target.layer,
                "placement": s.placement,
                "pass": s.pass,
            }),
            DrawOp::Layer(l) => {
                let image = plan
                    .source(l.source)
                    .map(|s| s.image_name.as_str())
                    .unwrap_or_default();
                serde_json::json!({
                    "op": "layer",
                    "group": l.target.group,
                    "layer": l.target.layer,
                    "name": l.name,
                    "image": image,
                    "mime": mime_for_name(image),
                    "placement": l.placement,
                    "blend": l.blend.name(),
                })
            }
            DrawOp::Clip(c) => serde_json::json!({ "op": "clip", "radius": c.radius }),
            DrawOp::Clear | DrawOp::Background(_) => continue,
        };
        println!("{line}");
    }
    Ok(())
}
