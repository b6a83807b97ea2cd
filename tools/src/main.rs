use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::Pattern;
use simwire_tools::{
    fingerprints, format_report, inspect_frame, packet_rows, InspectReport, ToolConfig,
};
use tracing::{debug, info};
use wire::Direction;

#[derive(Parser)]
#[command(
    name = "simwire-tools",
    version,
    about = "simwire frame inspection tools"
)]
struct Cli {
    /// JSON file with limits and registry snapshots.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode captured frames and describe them.
    Inspect {
        /// A frame file, or a directory of frame files.
        frame_path: PathBuf,
        /// Which packet table to decode against.
        #[arg(long, value_enum, default_value_t = Side::Client)]
        direction: Side,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected frames.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected frames (after sorting).
        #[arg(long)]
        limit: Option<usize>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// List the packet table of one direction.
    Packets {
        #[arg(long, value_enum, default_value_t = Side::Client)]
        direction: Side,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Print packet table and registry fingerprints.
    Fingerprint {
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

/// Receiving side of the packets.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Side {
    Client,
    Server,
}

impl From<Side> for Direction {
    fn from(side: Side) -> Self {
        match side {
            Side::Client => Self::ToClient,
            Side::Server => Self::ToServer,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::default(),
    };
    let cx = config.context().context("build wire context")?;

    match cli.command {
        Command::Inspect {
            frame_path,
            direction,
            glob,
            sort,
            limit,
            format,
        } => {
            let direction = Direction::from(direction);
            let paths = if frame_path.is_dir() {
                let entries = collect_frame_entries(&frame_path, glob.as_deref())?;
                let mut entries = maybe_sort_entries(entries, sort);
                let limit = limit.or(sort.map(|InspectSort::Size| 10));
                if let Some(limit) = limit {
                    entries.truncate(limit);
                }
                info!(frames = entries.len(), dir = %frame_path.display(), "inspecting directory");
                entries.into_iter().map(|entry| entry.path).collect()
            } else {
                vec![frame_path]
            };

            let mut reports = Vec::with_capacity(paths.len());
            for path in &paths {
                let bytes =
                    fs::read(path).with_context(|| format!("read frame {}", path.display()))?;
                let report = inspect_frame(&cx, direction, &bytes)
                    .with_context(|| format!("inspect frame {}", path.display()))?;
                debug!(path = %path.display(), id = report.id, "inspected frame");
                reports.push((path, report));
            }
            print_reports(&reports, format)?;
        }
        Command::Packets { direction, format } => {
            let rows = packet_rows(direction.into())?;
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&rows).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => {
                    for row in rows {
                        let flag = if row.skippable { " [skippable]" } else { "" };
                        println!("0x{:02x} {}{flag}", row.id, row.name);
                    }
                }
            }
        }
        Command::Fingerprint { format } => {
            let prints = fingerprints(&cx)?;
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&prints).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => {
                    println!("clientbound: 0x{:016x}", prints.clientbound);
                    println!("serverbound: 0x{:016x}", prints.serverbound);
                    println!("registries:  0x{:016x}", prints.registries);
                }
            }
        }
    }
    Ok(())
}

fn print_reports(reports: &[(&PathBuf, InspectReport)], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        let json: Vec<_> = reports.iter().map(|(_, report)| report).collect();
        let json = serde_json::to_string_pretty(&json).context("serialize json")?;
        println!("{json}");
        return Ok(());
    }
    for (path, report) in reports {
        if reports.len() > 1 {
            println!("== {} ==", path.display());
        }
        print!("{}", format_report(report));
    }
    Ok(())
}

struct FrameEntry {
    path: PathBuf,
    size: u64,
}

fn collect_frame_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<FrameEntry>> {
    let mut entries = Vec::new();
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(FrameEntry { path, size });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

fn maybe_sort_entries(mut entries: Vec<FrameEntry>, sort: Option<InspectSort>) -> Vec<FrameEntry> {
    match sort {
        Some(InspectSort::Size) => {
            entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        }
        None => {}
    }
    entries
}
