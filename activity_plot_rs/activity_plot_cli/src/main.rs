use std::fs;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use activity_plot::{
    render_basic_map, render_hills, render_intervals, show, Chart, ChartStyle, DrawCommand, Output,
};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use serde::Deserialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hill and interval overlay charts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Altitude over distance with identified hills highlighted
    Hills(RenderArgs),
    /// In-interval indicator over elapsed time
    Intervals(RenderArgs),
    /// Plain altitude over distance scatter
    Map(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Activity JSON with series and segment lists
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output figure path; `.svg` selects SVG, anything else PNG
    #[arg(short, long, default_value = "chart.png", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Optional chart style JSON (missing keys keep their defaults)
    #[arg(long, value_hint = ValueHint::FilePath)]
    style: Option<PathBuf>,

    /// Also write the recorded drawing calls as CSV (`-` for stdout)
    #[arg(long, value_hint = ValueHint::FilePath)]
    segments_csv: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Series and segments for one activity, as produced by an upstream
/// segmentation step.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ActivityDocument {
    altitude: Vec<f64>,
    distance: Vec<f64>,
    timestamps: Vec<DateTime<Utc>>,
    hills: Vec<Vec<usize>>,
    intervals: Vec<Vec<usize>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChartMode {
    Hills,
    Intervals,
    Map,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (mode, args) = match cli.command {
        Command::Hills(args) => (ChartMode::Hills, args),
        Command::Intervals(args) => (ChartMode::Intervals, args),
        Command::Map(args) => (ChartMode::Map, args),
    };
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    handle_render(mode, &args)
}

fn handle_render(mode: ChartMode, args: &RenderArgs) -> Result<()> {
    let style = match args.style.as_ref() {
        Some(path) => load_style(path)?,
        None => ChartStyle::default(),
    };
    let activity = load_activity(&args.input)?;
    debug!(
        samples = activity.distance.len().max(activity.timestamps.len()),
        hills = activity.hills.len(),
        intervals = activity.intervals.len(),
        "loaded {}",
        args.input.display()
    );

    let chart = build_chart(mode, Chart::new(style), &activity)
        .with_context(|| format!("failed to render {}", args.input.display()))?;

    if let Some(csv_path) = args.segments_csv.as_ref() {
        if csv_path.as_os_str() == "-" {
            write_commands_stdout(&chart)?;
        } else {
            write_commands_csv(&chart, csv_path)?;
            info!("Wrote drawing calls: {}", csv_path.display());
        }
    }

    let output = Output::from_path(&args.output);
    show(&chart, &output).with_context(|| format!("failed to write {}", args.output.display()))?;
    info!("Wrote plot: {}", args.output.display());
    Ok(())
}

fn build_chart(mode: ChartMode, chart: Chart, activity: &ActivityDocument) -> Result<Chart> {
    let chart = match mode {
        ChartMode::Hills => {
            if activity.distance.is_empty() {
                warn!("activity has no distance samples; the hill chart will be empty");
            }
            render_hills(chart, &activity.altitude, &activity.distance, &activity.hills)?
        }
        ChartMode::Intervals => {
            if activity.timestamps.is_empty() {
                return Err(anyhow!("interval charts need a `timestamps` series"));
            }
            render_intervals(chart, &activity.timestamps, &activity.intervals)?
        }
        ChartMode::Map => render_basic_map(chart, &activity.altitude, &activity.distance)?,
    };
    Ok(chart)
}

fn load_activity(path: &Path) -> Result<ActivityDocument> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read activity {}", path.display()))?;
    parse_activity(&text).with_context(|| format!("{} is not a valid activity", path.display()))
}

fn parse_activity(text: &str) -> Result<ActivityDocument> {
    Ok(serde_json::from_str(text)?)
}

fn load_style(path: &Path) -> Result<ChartStyle> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read style {}", path.display()))?;
    let style: ChartStyle = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid chart style", path.display()))?;
    if style.width == 0 || style.height == 0 {
        return Err(anyhow!("chart style must have a non-zero width and height"));
    }
    Ok(style)
}

fn write_commands_stdout(chart: &Chart) -> Result<()> {
    let stdout = io::stdout();
    let handle = stdout.lock();
    let mut writer = csv::Writer::from_writer(handle);
    write_command_rows(chart, &mut writer)
}

fn write_commands_csv(chart: &Chart, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    write_command_rows(chart, &mut writer)
}

fn write_command_rows<W: Write>(chart: &Chart, writer: &mut csv::Writer<W>) -> Result<()> {
    writer.write_record(["kind", "role", "x0", "y0", "x1", "y1", "color", "size"])?;
    for command in chart.commands() {
        let (kind, from, to, size) = match *command {
            DrawCommand::Line {
                from, to, width, ..
            } => ("line", from, to, width),
            DrawCommand::Point { at, radius, .. } => ("point", at, at, radius),
        };
        writer.write_record([
            kind.to_string(),
            command.role().as_str().to_string(),
            format!("{:.3}", from.0),
            format!("{:.3}", from.1),
            format!("{:.3}", to.0),
            format!("{:.3}", to.1),
            command.color().to_hex(),
            size.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
