// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use wlchart::audio::probe_wav;
use wlchart::chart::NoteKind;
use wlchart::config::{load_chart, save_chart, EditorConfig, SessionFile};
use wlchart::editor::{self, Editor};
use wlchart::path::{beat_markers, build_timeline_path};
use wlchart::timing::format_clock;

fn print_usage() {
    println!("WLCHART - Rhythm Chart Editor");
    println!();
    println!("Usage: wlchart [OPTIONS] [CHART.json]");
    println!();
    println!("Options:");
    println!("  --info <CHART>          Print timing, note and path summary");
    println!("  --path <CHART>          Print path nodes and beat markers");
    println!("  --export <IN> <OUT>     Re-export a chart with recomputed times");
    println!("  --probe <WAV>           Print audio duration");
    println!("  --config <FILE>         Use an alternative editor config");
    println!("  --help                  Show this help message");
}

/// Log to stderr for one-shot commands, to a file while the TUI owns the
/// terminal
fn init_logging(config: &EditorConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if to_file {
        let path = config.log_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {:?}", dir))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {:?}", path))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn print_info(path: &Path) -> Result<()> {
    let chart = load_chart(path)?;
    let timeline = &chart.timeline;
    let timing = timeline.timing();

    let tabs = timeline.notes().iter().filter(|n| n.kind == NoteKind::Tab).count();
    let directions = timeline.len() - tabs;
    let last_time = timeline
        .notes()
        .iter()
        .map(|n| n.target_time(timing))
        .fold(0.0, f64::max);
    let nodes = build_timeline_path(timeline);

    println!("Chart:        {}", path.display());
    println!("BPM:          {}", timing.bpm);
    println!("Subdivisions: {}", timing.subdivisions);
    println!("Pre-delay:    {} ms", timing.pre_delay_ms);
    println!("Notes:        {} ({} tab, {} direction)", timeline.len(), tabs, directions);
    println!("Last note:    {}", format_clock(last_time));
    println!("Path nodes:   {}", nodes.len());
    if let Some(end) = nodes.last() {
        println!(
            "Path end:     ({:.2}, {:.2}) at path beat {}",
            end.position.x, end.position.y, end.path_beat
        );
    }
    if !chart.fallbacks.is_empty() {
        println!("Defaulted:    {}", chart.fallbacks.join(", "));
    }
    Ok(())
}

fn print_path(path: &Path) -> Result<()> {
    let chart = load_chart(path)?;
    let timeline = &chart.timeline;
    let nodes = build_timeline_path(timeline);

    println!("{:>5}  {:>10}  {:>10}  {:>10}  Direction", "Note", "Path beat", "X", "Y");
    for node in &nodes {
        println!(
            "{:>5}  {:>10}  {:>10.3}  {:>10.3}  {}",
            node.note_index, node.path_beat, node.position.x, node.position.y, node.direction
        );
    }

    let markers = beat_markers(&nodes, timeline.timing().subdivisions);
    println!();
    println!("Beat markers: {}", markers.len());
    for (i, marker) in markers.iter().enumerate() {
        println!("{:>5}  ({:.3}, {:.3})", i + 1, marker.x, marker.y);
    }
    Ok(())
}

fn export_chart(input: &Path, output: &Path) -> Result<()> {
    let chart = load_chart(input)?;
    save_chart(output, &chart.timeline)?;
    println!(
        "Exported {} notes from {} to {}",
        chart.timeline.len(),
        input.display(),
        output.display()
    );
    Ok(())
}

fn probe_audio(path: &Path) -> Result<()> {
    let info = probe_wav(path).with_context(|| format!("Failed to probe {}", path.display()))?;
    println!("File:        {}", info.file_name());
    println!("Duration:    {} ({:.3}s)", format_clock(info.duration), info.duration);
    println!("Sample rate: {} Hz", info.sample_rate);
    println!("Channels:    {}", info.channels);
    Ok(())
}

fn run_editor(config: EditorConfig, chart: Option<PathBuf>) -> Result<()> {
    let mut editor = Editor::new(config, SessionFile::default_path());

    match chart {
        Some(path) => editor.open_chart(&path)?,
        None => editor.restore_session(),
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(editor::run(editor))
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().collect();

    // --config may appear anywhere
    let config_path = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            if i + 1 >= args.len() {
                eprintln!("Error: --config requires a file");
                std::process::exit(1);
            }
            let path = PathBuf::from(args.remove(i + 1));
            args.remove(i);
            Some(path)
        }
        None => EditorConfig::default_path(),
    };
    let config = match config_path {
        Some(path) => EditorConfig::load_or_default(&path)?,
        None => EditorConfig::default(),
    };

    let command = args.get(1).map(String::as_str);
    let interactive = !matches!(command, Some(arg) if arg.starts_with('-'));
    init_logging(&config, interactive)?;

    match command {
        None => run_editor(config, None)?,
        Some("--info") => {
            if args.len() < 3 {
                eprintln!("Error: --info requires a chart file");
                std::process::exit(1);
            }
            print_info(Path::new(&args[2]))?;
        }
        Some("--path") => {
            if args.len() < 3 {
                eprintln!("Error: --path requires a chart file");
                std::process::exit(1);
            }
            print_path(Path::new(&args[2]))?;
        }
        Some("--export") => {
            if args.len() < 4 {
                eprintln!("Error: --export requires an input and an output file");
                std::process::exit(1);
            }
            export_chart(Path::new(&args[2]), Path::new(&args[3]))?;
        }
        Some("--probe") => {
            if args.len() < 3 {
                eprintln!("Error: --probe requires a WAV file");
                std::process::exit(1);
            }
            probe_audio(Path::new(&args[2]))?;
        }
        Some("--help") | Some("-h") => {
            print_usage();
        }
        Some(arg) if arg.starts_with('-') => {
            eprintln!("Unknown option: {}", arg);
            print_usage();
            std::process::exit(1);
        }
        Some(chart) => run_editor(config, Some(PathBuf::from(chart)))?,
    }

    Ok(())
}
