use std::fmt::Display;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, TimeZone, Weekday};
use clap::{Parser, Subcommand};
use clip_grouping::{
    build_month_sections, cluster_by_place, group_by_day, CalendarContext, MediaRecord,
    MonthSection, PhotoLibrary, SystemClock,
};
use serde::Serialize;
use timeline_plan::{format_duration, DateStamp, TimelineComposer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod library;

use config::BrowseConfig;
use library::{load_library, save_library};

#[derive(Parser)]
#[command(name = "clipbook")]
#[command(about = "Browse short clips by day, month and place, and plan their concatenation")]
struct Cli {
    /// JSON export of the clip album
    #[arg(short, long, global = true, default_value = "library.json")]
    library: PathBuf,

    /// JSON browse configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the day boundary offset from UTC, in minutes
    #[arg(long, global = true, allow_hyphen_values = true)]
    utc_offset_minutes: Option<i32>,

    /// Override the first day of the week (e.g. Mon, Sunday)
    #[arg(long, global = true)]
    first_weekday: Option<String>,

    /// Print JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List clips grouped by day, newest first
    Days,

    /// Show a calendar grid for every month with clips
    Months,

    /// Cluster geotagged days into places
    Places {
        /// Grid cell size in degrees
        #[arg(long)]
        resolution: Option<f64>,
    },

    /// Plan the concatenation of clips into one video
    Plan {
        /// Clip ids in playback order
        #[arg(long, value_delimiter = ',', conflicts_with = "day")]
        ids: Vec<String>,

        /// Use every clip of this day (YYYY-MM-DD), oldest first
        #[arg(long)]
        day: Option<NaiveDate>,

        /// Add a date stamp overlay
        #[arg(long)]
        stamp: bool,

        /// strftime pattern for the date stamp
        #[arg(long)]
        stamp_format: Option<String>,

        /// Write the plan as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete clips from the library export
    Delete {
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipbook=info,clip_grouping=info,timeline_plan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match config.fixed_offset()? {
        Some(offset) => run(&cli, &config, offset),
        None => run(&cli, &config, Local),
    }
}

fn resolve_config(cli: &Cli) -> Result<BrowseConfig> {
    let mut config = match &cli.config {
        Some(path) => BrowseConfig::load(path)?,
        None => BrowseConfig::default(),
    };
    if let Some(minutes) = cli.utc_offset_minutes {
        config.utc_offset_minutes = Some(minutes);
    }
    if let Some(weekday) = &cli.first_weekday {
        config.first_weekday = weekday
            .parse::<Weekday>()
            .map_err(|_| anyhow::anyhow!("Unknown weekday: {}", weekday))?;
    }
    Ok(config)
}

fn run<Tz>(cli: &Cli, config: &BrowseConfig, timezone: Tz) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let calendar = CalendarContext::new(timezone.clone(), config.first_weekday);
    let mut library = load_library(&cli.library)?;
    let clips = library.fetch_clips()?;

    match &cli.command {
        Commands::Days => {
            let buckets = group_by_day(&clips, &calendar, &SystemClock);
            if cli.json {
                return print_json(&buckets);
            }
            println!("📅 {} days, {} clips", buckets.len(), clips.len());
            for bucket in &buckets {
                println!(
                    "  {}  {:>3} clips  {:>8}  {} geotagged",
                    bucket.day,
                    bucket.assets.len(),
                    format_duration(bucket.duration_seconds()).unwrap_or_default(),
                    bucket.geotagged_count()
                );
            }
        }
        Commands::Months => {
            let buckets = group_by_day(&clips, &calendar, &SystemClock);
            let sections = build_month_sections(&buckets, &calendar);
            if cli.json {
                return print_json(&sections);
            }
            for section in &sections {
                print_month_grid(section, config.first_weekday);
            }
        }
        Commands::Places { resolution } => {
            let resolution = resolution.unwrap_or(config.grid_resolution_degrees);
            let buckets = group_by_day(&clips, &calendar, &SystemClock);
            let clusters = cluster_by_place(&buckets, resolution)?;
            if cli.json {
                return print_json(&clusters);
            }
            println!("📍 {} places", clusters.len());
            for cluster in &clusters {
                let latest = cluster.days.first().map(|d| d.day.to_string()).unwrap_or_default();
                println!(
                    "  ({:.5}, {:.5})  {} days  {} clips  latest {}",
                    cluster.centroid.latitude,
                    cluster.centroid.longitude,
                    cluster.days.len(),
                    cluster.asset_count(),
                    latest
                );
            }
        }
        Commands::Plan { ids, day, stamp, stamp_format, output } => {
            let selected = select_clips(&clips, ids, *day, &calendar)?;
            let date_stamp = stamp.then(|| DateStamp {
                format: stamp_format
                    .clone()
                    .unwrap_or_else(|| config.date_stamp_format.clone()),
                reference: None,
            });
            let composer = TimelineComposer::new(timezone).with_overlay_timing(config.overlay);
            let plan = composer.compose(&selected, date_stamp.as_ref())?;

            if let Some(output) = output {
                write_json(output, &plan)?;
                println!("💾 Plan saved to: {}", output.display());
            } else if cli.json {
                return print_json(&plan);
            } else {
                println!(
                    "🎬 {} segments, {} total, frame {}x{}",
                    plan.timeline.len(),
                    format_duration(plan.duration()).unwrap_or_else(|| "0:00".to_string()),
                    plan.render_size.width,
                    plan.render_size.height
                );
                for segment in &plan.timeline {
                    println!(
                        "  {:>8.3}s  {:<24} {:>7.3}s  scale {:.4}{}",
                        segment.start,
                        segment.source_id,
                        segment.duration,
                        segment.scale,
                        if segment.upside_down_corrected { "  (flipped)" } else { "" }
                    );
                }
                if let Some(overlay) = &plan.overlay {
                    println!(
                        "  stamp \"{}\" until {:.1}s, faded by {:.1}s",
                        overlay.text,
                        overlay.visible_until,
                        overlay.hidden_from()
                    );
                }
            }
        }
        Commands::Delete { ids } => {
            let removed = library.delete(ids)?;
            save_library(&cli.library, library)?;
            println!("🗑️  Removed {} of {} clips", removed, ids.len());
        }
    }

    Ok(())
}

/// Clips for a plan: explicit ids in the given order, or one whole day
fn select_clips<Tz: TimeZone>(
    clips: &[MediaRecord],
    ids: &[String],
    day: Option<NaiveDate>,
    calendar: &CalendarContext<Tz>,
) -> Result<Vec<MediaRecord>> {
    if let Some(day) = day {
        let buckets = group_by_day(clips, calendar, &SystemClock);
        let bucket = buckets
            .into_iter()
            .find(|b| b.day == day)
            .with_context(|| format!("No clips recorded on {}", day))?;
        return Ok(bucket.chronological().into_iter().cloned().collect());
    }

    ids.iter()
        .map(|id| {
            clips.iter()
                .find(|c| &c.id == id)
                .cloned()
                .with_context(|| format!("Unknown clip id: {}", id))
        })
        .collect()
}

fn print_month_grid(section: &MonthSection, first_weekday: Weekday) {
    let title = NaiveDate::from_ymd_opt(section.year, section.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", section.year, section.month));
    println!("\n{} ({} clips)", title, section.asset_count());

    let mut weekday = first_weekday;
    let mut header = String::new();
    for _ in 0..7 {
        header.push_str(&format!("{:>4}", &weekday.to_string()[..2]));
        weekday = weekday.succ();
    }
    println!("{}", header);

    let mut row = "    ".repeat(section.leading_blank_cells as usize);
    for day in 1..=section.number_of_days {
        let marker = if section.assets_on(day).is_empty() { ' ' } else { '*' };
        row.push_str(&format!("{:>3}{}", day, marker));
        if (section.leading_blank_cells + day) % 7 == 0 {
            println!("{}", row.trim_end());
            row.clear();
        }
    }
    if !row.is_empty() {
        println!("{}", row.trim_end());
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")?;
    println!("{}", json);
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if path.is_dir() {
        bail!("Output path is a directory: {}", path.display());
    }
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write output to {}", path.display()))
}
