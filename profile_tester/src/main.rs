use anyhow::{Context, bail};
use chroma_profile::{ColorProfile, ParallelProfileBuilder, ProfileBuilder, ProfileConfig};
use chroma_profile_visualizer::{
    BarChartEntry, ColorWheel, Swatch, WheelSegment, bar_chart, swatches,
};
use clap::Parser;
use image::ImageFormat;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// How many of the largest wheel segments the text report lists.
const TEXT_REPORT_WHEEL_SEGMENTS: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "profile_tester")]
#[command(version, about = "Profile the colors of an image", long_about = None)]
struct Args {
    /// Image file to analyze
    #[arg(value_name = "IMAGE")]
    input: PathBuf,

    /// Print the full profile as JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// Shard the analysis across a worker pool
    #[arg(long)]
    parallel: bool,

    /// Worker count for --parallel (default: number of CPUs)
    #[arg(short = 'j', long, value_name = "N")]
    workers: Option<usize>,

    /// Quantization step per channel
    #[arg(long, value_name = "N", default_value_t = ProfileConfig::default().quantization_step)]
    step: u8,

    /// Minimum RGB distance between dominant colors
    #[arg(long, value_name = "F", default_value_t = ProfileConfig::default().similarity_threshold)]
    similarity: f64,

    /// Maximum number of dominant colors
    #[arg(long, value_name = "N", default_value_t = ProfileConfig::default().max_dominant_colors)]
    max_colors: usize,

    /// Pixels with alpha below this are ignored
    #[arg(long, value_name = "N", default_value_t = ProfileConfig::default().alpha_threshold)]
    alpha_threshold: u8,

    /// Canvas size (pixels) used for color wheel geometry
    #[arg(long, value_name = "N", default_value_t = 400)]
    wheel_size: u32,
}

impl Args {
    fn profile_config(&self) -> ProfileConfig {
        ProfileConfig {
            alpha_threshold: self.alpha_threshold,
            quantization_step: self.step,
            similarity_threshold: self.similarity,
            max_dominant_colors: self.max_colors,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    image: &'a Path,
    width: u32,
    height: u32,
    profile: &'a ColorProfile,
    swatches: Vec<Swatch>,
    bar_chart: Vec<BarChartEntry>,
    wheel: Vec<WheelSegment>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // --- 1. Image Acquisition ---
    let image = load_rgba(&args.input)?;
    let (width, height) = image.dimensions();
    log::info!("loaded {} ({}x{})", args.input.display(), width, height);

    // --- 2. Profiling ---
    let config = args.profile_config();
    let profile = if args.parallel {
        let mut builder = ParallelProfileBuilder::new(config);
        if let Some(workers) = args.workers {
            builder = builder.with_workers(workers);
        }
        let runtime = tokio::runtime::Runtime::new().context("failed to start worker runtime")?;
        runtime.block_on(builder.analyze(image.into_raw(), width, height))?
    } else {
        ProfileBuilder::new(config).analyze_image(&image)?
    };

    if profile.is_empty() {
        log::warn!("{} has no opaque pixels", args.input.display());
    }

    // --- 3. Adapter Mapping ---
    let report = Report {
        image: &args.input,
        width,
        height,
        profile: &profile,
        swatches: swatches(&profile.dominant_colors),
        bar_chart: bar_chart(&profile.category_distribution),
        wheel: ColorWheel::new(args.wheel_size, args.wheel_size).segments(&profile.hue_histogram),
    };

    // --- 4. Output ---
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_report(&report);
    }
    Ok(())
}

fn load_rgba(path: &Path) -> anyhow::Result<image::RgbaImage> {
    if ImageFormat::from_path(path).is_err() {
        bail!("{} is not a recognized image file", path.display());
    }
    let image = image::open(path).with_context(|| format!("failed to decode {}", path.display()))?;
    Ok(image.to_rgba8())
}

fn print_text_report(report: &Report<'_>) {
    let profile = report.profile;
    println!(
        "{} ({}x{}, {} of {} pixels opaque)",
        report.image.display(),
        report.width,
        report.height,
        profile.opaque_pixels,
        profile.total_pixels
    );

    println!("\nDominant colors:");
    if report.swatches.is_empty() {
        println!("  (none)");
    }
    for swatch in &report.swatches {
        println!("  {}", swatch.label);
    }

    println!("\nColor distribution:");
    for bar in &report.bar_chart {
        println!("  {:<8} {:>5.1}%  {}", bar.label, bar.percentage, bar_glyphs(bar.percentage));
    }

    println!("\nBusiest hues:");
    let mut wheel: Vec<&WheelSegment> = report.wheel.iter().collect();
    wheel.sort_by(|a, b| b.count.cmp(&a.count).then(a.hue.cmp(&b.hue)));
    for segment in wheel.into_iter().take(TEXT_REPORT_WHEEL_SEGMENTS) {
        let (red, green, blue) = segment.fill;
        println!(
            "  {:>3}°  {:>8} px  s={:>5.1}%  l={:>5.1}%  {}",
            segment.hue,
            segment.count,
            segment.saturation,
            segment.lightness,
            chroma_profile::rgb_to_hex(red, green, blue)
        );
    }
}

fn bar_glyphs(percentage: f64) -> String {
    "#".repeat((percentage / 2.0).round() as usize)
}
