use std::path::{Path, PathBuf};
use std::time::Duration;

use aeb_hdr::hdr_pipeline::grouping::{DEFAULT_HASH_THRESHOLD, DEFAULT_TIME_THRESHOLD};
use aeb_hdr::hdr_pipeline::{
    CompositorConfig, ExifMetadataReader, ExifToolAdapter, GroupStatus, GroupingStrategy,
    HdrCompositor, MetadataAdapter, StandardImageCodec, StandardRadianceWriter, TiffCompression,
    ToneOperator, ToneParameters, find_aeb_images,
};
use aeb_hdr::logger;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "aeb-hdr", version, about = "Group exposure brackets and merge them into HDR images")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge every bracket found in the inputs into a tonemapped image
    Merge(MergeArgs),
    /// Print the bracket groups as JSON lists of file names
    Group(GroupArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupMode {
    /// Capture-time proximity
    Time,
    /// Perceptual hash similarity
    Hash,
    /// Time-sorted bands that must also look alike
    Banded,
}

#[derive(Args)]
struct SourceArgs {
    /// Image files or directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Read metadata with the external exiftool program
    #[arg(long)]
    exiftool: bool,

    /// Largest capture-time gap inside a bracket, in seconds
    #[arg(long, default_value_t = DEFAULT_TIME_THRESHOLD.as_secs_f64())]
    time_threshold: f64,

    /// Largest hash distance inside a bracket, in percent
    #[arg(long, default_value_t = DEFAULT_HASH_THRESHOLD)]
    hash_threshold: f64,
}

#[derive(Args)]
struct MergeArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// mantiuk, drago or reinhard
    #[arg(long, default_value = "mantiuk")]
    operator: String,

    #[arg(long)]
    align: bool,

    #[arg(long)]
    deghost: bool,

    #[arg(long, value_enum, default_value = "time")]
    group: GroupMode,

    /// Skip brackets with fewer usable exposures
    #[arg(long, default_value_t = 1)]
    min_exposures: usize,

    /// Output format extension
    #[arg(long, default_value = "jpg")]
    format: String,

    /// Also write the radiance map as a float TIFF
    #[arg(long)]
    radiance: bool,

    /// TIFF compression for the radiance map
    #[arg(long, default_value = "deflate")]
    compression: TiffCompression,

    /// Process brackets one at a time
    #[arg(long)]
    sequential: bool,
}

#[derive(Args)]
struct GroupArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(long, value_enum, default_value = "hash")]
    group: GroupMode,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Merge(args) => {
            let config = merge_config(&args)?;
            if args.source.exiftool {
                run_merge(ExifToolAdapter::default(), config, &args)
            } else {
                run_merge(ExifMetadataReader, config, &args)
            }
        }
        Command::Group(args) => {
            let config = CompositorConfig::builder()
                .grouping(strategy(args.group, &args.source)?)
                .build();
            if args.source.exiftool {
                run_group(ExifToolAdapter::default(), config, &args.source)
            } else {
                run_group(ExifMetadataReader, config, &args.source)
            }
        }
    }
}

fn strategy(mode: GroupMode, source: &SourceArgs) -> anyhow::Result<GroupingStrategy> {
    if !(source.time_threshold.is_finite() && source.time_threshold >= 0.0) {
        bail!("time threshold must be a non-negative number of seconds");
    }
    let threshold = Duration::from_secs_f64(source.time_threshold);
    let percent = source.hash_threshold;

    Ok(match mode {
        GroupMode::Time => GroupingStrategy::Time { threshold },
        GroupMode::Hash => GroupingStrategy::Hash { percent },
        GroupMode::Banded => GroupingStrategy::TimeAndHash { threshold, percent },
    })
}

fn merge_config(args: &MergeArgs) -> anyhow::Result<CompositorConfig> {
    let operator: ToneOperator = args.operator.parse()?;

    Ok(CompositorConfig::builder()
        .grouping(strategy(args.group, &args.source)?)
        .align(args.align)
        .deghost(args.deghost)
        .tone(ToneParameters::for_operator(operator))
        .parallel(!args.sequential)
        .min_exposures(args.min_exposures)
        .output_extension(args.format.clone())
        .write_radiance(args.radiance)
        .compression(args.compression)
        .build())
}

/// Files are taken as given; directories contribute their AEB-tagged images.
fn expand_inputs<M: MetadataAdapter>(inputs: &[PathBuf], metadata: &M) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = find_aeb_images(input, metadata)
                .with_context(|| format!("scanning {}", input.display()))?;
            info!("{}: {} AEB images", input.display(), found.len());
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

fn run_merge<M: MetadataAdapter>(metadata: M, config: CompositorConfig, args: &MergeArgs) -> anyhow::Result<()> {
    let paths = expand_inputs(&args.source.inputs, &metadata)?;
    if paths.is_empty() {
        bail!("no input images");
    }

    info!("Merging {} images into {}", paths.len(), args.output.display());
    let compositor = HdrCompositor::with_custom(metadata, StandardImageCodec, StandardRadianceWriter, config);
    let report = compositor
        .process(&paths, &args.output)
        .context("HDR processing failed")?;

    for group in &report.groups {
        match &group.status {
            GroupStatus::Written { output, exposures, .. } => {
                println!("{}", output.display());
                info!("Group {}: {} exposures", group.index, exposures);
            }
            GroupStatus::Skipped(reason) => warn!("Group {} skipped: {}", group.index, reason),
            GroupStatus::Failed(reason) => warn!("Group {} failed: {}", group.index, reason),
        }
    }

    if report.written() == 0 {
        bail!("no HDR images were produced");
    }
    Ok(())
}

fn run_group<M: MetadataAdapter>(metadata: M, config: CompositorConfig, source: &SourceArgs) -> anyhow::Result<()> {
    let paths = expand_inputs(&source.inputs, &metadata)?;
    info!("Grouping {} images", paths.len());

    let compositor = HdrCompositor::with_custom(metadata, StandardImageCodec, StandardRadianceWriter, config);
    let grouping = compositor.group_uploads(&paths);
    info!("Formed {} groups", grouping.groups.len());

    let names: Vec<Vec<String>> = grouping
        .groups
        .iter()
        .map(|group| group.iter().map(|p| file_name(p)).collect())
        .collect();
    println!("{}", serde_json::to_string(&names)?);
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
