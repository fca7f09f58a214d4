//! djquery CLI entry point

use clap::Parser;
use djquery::config::{Cli, Command, Settings};
use djquery::query::{AnalyticsQuery, ListingOptions, TrackSummary};
use djquery::{Library, Result};
use serde::Serialize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli);

    // Build settings from CLI
    let settings = Settings::from_cli(&cli);

    // Validate inputs
    if let Err(e) = settings.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_usage_error() => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = cli.log_level().to_string().to_lowercase();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    let mut library = Library::new();
    library.load_library(&settings.library_path)?;

    let pretty = settings.pretty_json;

    match &cli.command {
        Command::Stats => print_json(&library.library_stats()?, pretty),
        Command::Search(args) => print_json(&library.search(&args.to_criteria())?, pretty),
        Command::Track { id } => print_json(&library.track_by_id(id)?, pretty),
        Command::Playlists => {
            let playlists: Vec<PlaylistInfo> = library
                .all_playlists()?
                .into_iter()
                .map(|p| PlaylistInfo {
                    name: &p.name,
                    kind: p.kind(),
                    tracks: p.tracks.len(),
                    children: p.children.len(),
                })
                .collect();
            print_json(&playlists, pretty)
        }
        Command::Playlist { name } => {
            print_json(&summaries(library.tracks_by_playlist(name)?), pretty)
        }
        Command::Analyze(args) => {
            let query = AnalyticsQuery {
                group_by: args.group_by,
                aggregate_by: args.aggregate_by.unwrap_or_default(),
                filters: Some(args.filters.to_criteria()),
                top_n: args.top_n,
            };
            print_json(&library.analyze(&query)?, pretty)
        }
        Command::MostPlayed(args) => print_json(&library.most_played(&listing(args))?, pretty),
        Command::TopRated(args) => print_json(&library.top_rated(&listing(args))?, pretty),
        Command::Unplayed(args) => print_json(&library.unplayed(&listing(args))?, pretty),
        Command::Key { key } => print_json(&summaries(library.tracks_by_key(key)?), pretty),
        Command::Bpm { min, max } => {
            print_json(&summaries(library.tracks_by_bpm_range(*min, *max)?), pretty)
        }
        Command::FindFile { fragment } => {
            print_json(&summaries(library.tracks_by_file_name(fragment)?), pretty)
        }
        Command::Export(args) => {
            let format = args.format.unwrap_or(settings.default_format);
            let message = if args.ids.is_empty() {
                library.export_search(
                    &args.search.to_criteria(),
                    &args.output,
                    format,
                    args.name.as_deref(),
                )?
            } else {
                let validation = library.validate_ids(&args.ids)?;
                if !validation.invalid.is_empty() {
                    eprintln!(
                        "Skipping unknown track IDs: {}",
                        validation.invalid.join(", ")
                    );
                }
                library.export_playlist(&args.ids, &args.output, format, args.name.as_deref())?
            };
            println!("{}", message);
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct PlaylistInfo<'a> {
    name: &'a str,
    kind: &'static str,
    tracks: usize,
    children: usize,
}

fn listing(args: &djquery::config::cli::ListingArgs) -> ListingOptions {
    ListingOptions {
        genre: args.genre.clone(),
        limit: args.limit,
        sort_by: args.sort_by,
    }
}

fn summaries(tracks: Vec<&djquery::types::Track>) -> Vec<TrackSummary> {
    tracks.into_iter().map(TrackSummary::from).collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    println!("{}", out.map_err(std::io::Error::from)?);
    Ok(())
}
