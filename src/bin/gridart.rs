use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gridart", version)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a batch of PNG images with paired caption files.
    Generate(GenerateArgs),
    /// Generate a single composition and write it as SVG (and optionally PNG).
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Batch config JSON; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trigger word placed at both ends of every caption.
    #[arg(long)]
    trigger: Option<String>,

    /// Palette color (#RRGGBB). Repeat for more colors.
    #[arg(long = "color", value_name = "HEX")]
    colors: Vec<String>,

    /// Output directory (must exist).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Number of items to generate.
    #[arg(long)]
    count: Option<u64>,

    /// Canvas edge length in pixels.
    #[arg(long)]
    size: Option<u32>,

    /// Artifact file stem.
    #[arg(long)]
    base_name: Option<String>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Palette color (#RRGGBB). Repeat for more colors.
    #[arg(long = "color", value_name = "HEX", required = true)]
    colors: Vec<String>,

    /// Canvas edge length in pixels.
    #[arg(long, default_value_t = gridart::Canvas::DEFAULT_SIZE)]
    size: u32,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Also rasterize to this PNG path.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Print the scene description as JSON to stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: GenerateArgs) -> anyhow::Result<gridart::BatchConfig> {
    let palette_from_flags = if args.colors.is_empty() {
        None
    } else {
        Some(gridart::Palette::parse(&args.colors)?)
    };

    let mut cfg = match &args.config {
        Some(path) => gridart::BatchConfig::from_json_file(path)?,
        None => {
            let trigger = args.trigger.clone().context("--trigger is required without --config")?;
            let palette = palette_from_flags
                .clone()
                .context("at least one --color is required without --config")?;
            let out = args.out.clone().context("--out is required without --config")?;
            gridart::BatchConfig::new(trigger, palette, out)
        }
    };

    if let Some(trigger) = args.trigger {
        cfg.trigger = trigger;
    }
    if let Some(palette) = palette_from_flags {
        cfg.palette = palette;
    }
    if let Some(out) = args.out {
        cfg.output_dir = out;
    }
    if let Some(count) = args.count {
        cfg.count = count;
    }
    if let Some(size) = args.size {
        cfg.canvas_size = size;
    }
    if let Some(base_name) = args.base_name {
        cfg.base_name = base_name;
    }
    Ok(cfg)
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let cfg = build_config(args)?;
    let mut rasterizer = gridart::ResvgRasterizer::new();

    let res = gridart::run(&cfg, &mut rasterizer).map_err(|e| match e.failed_index() {
        Some(index) => anyhow::Error::new(e).context(format!(
            "batch stopped at item {index} ({index} items written); rerun from there to resume"
        )),
        None => anyhow::Error::new(e),
    })?;

    eprintln!(
        "wrote {}/{} items to {}",
        res.items_completed,
        res.total,
        cfg.output_dir.display()
    );
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let palette = gridart::Palette::parse(&args.colors)?;
    let comp = gridart::generate(args.size, palette.colors())?;
    let svg = gridart::scene_to_svg(&comp.scene);

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &svg)
        .with_context(|| format!("write svg '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());

    if let Some(png) = &args.png {
        let image = gridart::ResvgRasterizer::new().rasterize_svg_data(svg.as_bytes(), args.size)?;
        image.save_png(png)?;
        eprintln!("wrote {}", png.display());
    }

    if args.json {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &comp.scene)
            .context("serialize scene JSON")?;
        println!();
    }

    println!("{}", comp.summary);
    Ok(())
}
