use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use hrm_lib::{
    config::PipelineConfig,
    detectors::ecg::run_pipeline,
    io::{csv as csv_io, report as report_io},
    plot::{figure_from_recording, Figure, Series},
    signal::SampleSeries,
    sim::{simulate, SimulationConfig},
};
use log::info;
use plotters::prelude::*;
use serde::Serialize;
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "hrm",
    version,
    about = "Heartbeat detection and summary statistics for single-lead ECG recordings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct PipelineArgs {
    /// TOML file with pipeline settings; explicit flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    /// Peaks must score at least this multiple of the mean match score
    #[arg(long)]
    threshold_factor: Option<f64>,
    /// Heart-rate normalisation window in minutes
    #[arg(long)]
    observation_minutes: Option<f64>,
    /// Half the template length in samples
    #[arg(long)]
    half_width: Option<usize>,
    /// Local-maximum window radius in samples
    #[arg(long)]
    min_separation: Option<usize>,
    /// Column delimiter: a single ASCII character or "tab"
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the beat pipeline and write a JSON report per recording
    Analyze {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Report path (single input only); defaults to <input stem>.json
        #[arg(long, conflicts_with = "stdout")]
        out: Option<PathBuf>,
        /// Print reports to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Print detected beat indices, times and match scores as JSON
    Detect {
        /// CSV recording; read from stdin when omitted
        input: Option<PathBuf>,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Render the recording with detected beats to a PNG via plotters
    Plot {
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 4000)]
        max_points: usize,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Write a synthetic recording in the loader's CSV format
    Simulate {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 250.0)]
        fs: f64,
        #[arg(long, default_value_t = 20)]
        beats: usize,
        #[arg(long, default_value_t = 0.8)]
        rr_s: f64,
        #[arg(long, default_value_t = 0.05)]
        rr_jitter_s: f64,
        #[arg(long, default_value_t = 0.02)]
        noise: f64,
        #[arg(long, default_value_t = 7)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            inputs,
            out,
            stdout,
            pipeline,
        } => cmd_analyze(&inputs, out.as_deref(), stdout, &pipeline)?,
        Commands::Detect { input, pipeline } => cmd_detect(input.as_deref(), &pipeline)?,
        Commands::Plot {
            input,
            out,
            max_points,
            pipeline,
        } => cmd_plot(&input, &out, max_points, &pipeline)?,
        Commands::Simulate {
            out,
            fs,
            beats,
            rr_s,
            rr_jitter_s,
            noise,
            seed,
        } => {
            let cfg = SimulationConfig {
                fs,
                beats,
                rr_s,
                rr_jitter_s,
                noise,
                seed,
                ..SimulationConfig::default()
            };
            cmd_simulate(&out, &cfg)?
        }
    }
    Ok(())
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(format!("expected a single ASCII character, got {value:?}")),
            }
        }
    }
}

fn pipeline_config(args: &PipelineArgs) -> Result<PipelineConfig> {
    let mut cfg = match &args.config {
        Some(path) => PipelineConfig::from_toml_path(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(v) = args.threshold_factor {
        cfg.threshold_factor = v;
    }
    if let Some(v) = args.observation_minutes {
        cfg.observation_minutes = v;
    }
    if let Some(v) = args.half_width {
        cfg.template_half_width = v;
    }
    if let Some(v) = args.min_separation {
        cfg.min_separation = v;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_samples(input: Option<&Path>, delimiter: u8) -> Result<SampleSeries> {
    match input {
        Some(path) => csv_io::read_series_csv(path, delimiter),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            csv_io::parse_series_csv(buf.as_bytes(), delimiter)
        }
    }
}

fn cmd_analyze(
    inputs: &[PathBuf],
    out: Option<&Path>,
    stdout: bool,
    args: &PipelineArgs,
) -> Result<()> {
    if out.is_some() && inputs.len() > 1 {
        bail!("--out accepts a single input, got {}", inputs.len());
    }
    let cfg = pipeline_config(args)?;
    for input in inputs {
        let samples = csv_io::read_series_csv(input, args.delimiter)?;
        let run = run_pipeline(&samples, &cfg)
            .with_context(|| format!("analysing {}", input.display()))?;
        if stdout {
            println!("{}", report_io::report_to_string(&run.report)?);
            continue;
        }
        let path = out
            .map(Path::to_path_buf)
            .unwrap_or_else(|| report_io::report_path_for(input));
        report_io::save_report(&path, &run.report)?;
        info!("{}: {} beats -> {}", input.display(), run.report.beat_count, path.display());
        println!("{}", path.display());
    }
    Ok(())
}

#[derive(Serialize)]
struct DetectOutput {
    template_center: usize,
    threshold: f64,
    sample_indices: Vec<usize>,
    beat_times: Vec<f64>,
    scores: Vec<f64>,
}

fn cmd_detect(input: Option<&Path>, args: &PipelineArgs) -> Result<()> {
    let cfg = pipeline_config(args)?;
    let samples = load_samples(input, args.delimiter)?;
    let run = run_pipeline(&samples, &cfg)?;
    let output = DetectOutput {
        template_center: run.template.center_index,
        threshold: run.peaks.threshold,
        sample_indices: run.peaks.sample_indices(),
        beat_times: run.report.beat_times,
        scores: run.peaks.scores,
    };
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

fn cmd_plot(input: &Path, out: &Path, max_points: usize, args: &PipelineArgs) -> Result<()> {
    let cfg = pipeline_config(args)?;
    let samples = csv_io::read_series_csv(input, args.delimiter)?;
    let run = run_pipeline(&samples, &cfg)?;
    let title = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ECG".into());
    let fig = figure_from_recording(&title, &samples, &run.report, max_points);
    draw_plotters_figure(out, &fig)
}

fn cmd_simulate(out: &Path, cfg: &SimulationConfig) -> Result<()> {
    let rec = simulate(cfg)?;
    csv_io::save_series_csv(out, &rec.samples)?;
    info!(
        "simulated {} beats, {} samples -> {}",
        rec.beat_times.len(),
        rec.samples.len(),
        out.display()
    );
    Ok(())
}

fn draw_plotters_figure(path: &Path, fig: &Figure) -> Result<()> {
    let ((x_min, mut x_max), (y_min, y_max)) =
        fig.bounds().ok_or_else(|| anyhow!("figure has no points"))?;
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    let y_pad = ((y_max - y_min) * 0.05).max(1e-3);

    let backend = BitMapBackend::new(path, (1200, 480));
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(
            fig.title.clone().unwrap_or_else(|| "Plot".into()),
            ("sans-serif", 24),
        )
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_min..x_max, (y_min - y_pad)..(y_max + y_pad))?;
    chart
        .configure_mesh()
        .x_desc(fig.x.label.clone().unwrap_or_default())
        .y_desc(fig.y.label.clone().unwrap_or_default())
        .draw()?;
    for series in &fig.series {
        match series {
            Series::Line(line) => {
                let (r, g, b) = line.style.color.rgb();
                let width = line.style.width.round().max(1.0) as u32;
                let style = RGBColor(r, g, b).stroke_width(width);
                chart.draw_series(LineSeries::new(
                    line.points.iter().map(|p| (p[0], p[1])),
                    style,
                ))?;
            }
            Series::Points(points) => {
                let (r, g, b) = points.color.rgb();
                let style = RGBColor(r, g, b).filled();
                chart.draw_series(
                    points
                        .points
                        .iter()
                        .map(|p| Circle::new((p[0], p[1]), points.radius, style)),
                )?;
            }
        }
    }
    root.present()?;
    Ok(())
}
