use clap::Parser;
use env_logger::Env;
use std::fs;
use std::path::{Path, PathBuf};
use lightpaint::{
    Canvas, Color, ColorScheme, Operation, Palette, PipelineConfig, PixelBuffer, Session,
    adjust_brightness, adjust_contrast, suggest_palette,
};
use anyhow::{Context, Result, anyhow, bail};

/// Reduce images to a light-painting palette and write fabrication masks and layers.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Built-in color scheme (blue, red, purple, green, yellow, orange, pink)
    #[arg(short, long, default_value = "blue")]
    scheme: String,

    /// Custom palette as `label=#RRGGBB,...` (overrides --scheme)
    #[arg(short = 'c', long)]
    palette: Option<String>,

    /// Derive a palette of this many colors with k-means (overrides --scheme)
    #[arg(short = 'k', long, conflicts_with = "palette")]
    suggest: Option<usize>,

    /// JSON pipeline config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Brightness offset applied before quantizing
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    brightness: i32,

    /// Contrast amount in -1.0..=1.0 applied before quantizing
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    contrast: f32,

    /// Correction on the source image before quantizing: `fill:X,Y:COLOR` or `stamp:X,Y:COLOR`
    #[arg(long = "source-op")]
    source_ops: Vec<String>,

    /// Correction on the quantized image: `fill:X,Y:COLOR` or `stamp:X,Y:COLOR`, COLOR from the palette
    #[arg(long = "op")]
    ops: Vec<String>,

    /// Output directory; each input gets its own subdirectory
    #[arg(short = 'd', long, default_value = "lightpaint_out")]
    out_dir: PathBuf,
}

/// Parse `fill:X,Y:COLOR` / `stamp:X,Y:COLOR`. COLOR is a palette label or a hex value.
fn parse_op(text: &str, palette: &Palette, config: &PipelineConfig) -> Result<Operation> {
    let mut parts = text.splitn(3, ':');
    let (Some(kind), Some(at), Some(color)) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected KIND:X,Y:COLOR, got `{text}`");
    };
    let (x, y) = at
        .split_once(',')
        .ok_or_else(|| anyhow!("expected X,Y in `{text}`"))?;
    let x: u32 = x.trim().parse().with_context(|| format!("bad x in `{text}`"))?;
    let y: u32 = y.trim().parse().with_context(|| format!("bad y in `{text}`"))?;
    let color = match palette.get(color) {
        Some(c) => c,
        None => Color::from_hex(color)?,
    };

    match kind {
        "fill" => Ok(Operation::Fill { x, y, color, tolerance: config.tolerance }),
        "stamp" => Ok(Operation::Stamp { x, y, color, diameter: config.brush_size }),
        other => bail!("unknown operation `{other}`"),
    }
}

fn write_png(dir: &Path, file_name: &str, buffer: &PixelBuffer) -> Result<()> {
    let path = dir.join(file_name);
    fs::write(&path, buffer.to_png()?)?;
    println!("Saved → {}", path.display());
    Ok(())
}

fn process(input: &Path, args: &Args, config: &PipelineConfig) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let mut source = PixelBuffer::decode(&bytes, config.max_dimension)?;
    if args.brightness != 0 {
        source = adjust_brightness(&source, args.brightness);
    }
    if args.contrast != 0.0 {
        source = adjust_contrast(&source, args.contrast);
    }

    let palette = if let Some(text) = &args.palette {
        Palette::parse(text)?
    } else if let Some(k) = args.suggest {
        suggest_palette(&source, k, 0)?
    } else {
        args.scheme.parse::<ColorScheme>()?.palette()
    };

    let mut session = Session::new(config.clone(), source);

    let correction = Palette::correction_colors();
    for text in &args.source_ops {
        let op = parse_op(text, &correction, config)?;
        session.apply(Canvas::Source, op).with_context(|| format!("applying `{text}`"))?;
    }

    session.simplify(palette.clone())?;
    for text in &args.ops {
        let op = parse_op(text, &palette, config)?;
        session.apply(Canvas::Simplified, op).with_context(|| format!("applying `{text}`"))?;
    }

    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let dir = args.out_dir.join(stem.as_ref());
    fs::create_dir_all(&dir)?;

    let simplified = session.canvas(Canvas::Simplified)?;
    write_png(&dir, "simplified.png", simplified)?;

    let fabrication = session.fabricate().context("generating fabrication outputs failed")?;
    for raster in fabrication.iter() {
        write_png(&dir, &raster.file_name(), &raster.buffer)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            PipelineConfig::from_json(&text)?
        }
        None => PipelineConfig::default(),
    };

    for input in &args.inputs {
        process(input, &args, &config)
            .with_context(|| format!("processing {} failed", input.display()))?;
    }

    Ok(())
}
