//! cancli - chord chart utilities
//!
//! Subcommands:
//! - `cancli view` - print a parsed chart in one of three views
//! - `cancli degrees` - rewrite absolute chord names as Roman degrees
//! - `cancli parse` - dump the parsed song model as JSON

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;

use cancionero::{both_text, chords_text, lyrics_text, strip_song_fence, Song};

#[derive(Parser)]
#[command(name = "cancli")]
#[command(about = "Chord chart parsing and degree conversion")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a chart in one of the three views
    View {
        /// Input file; stdin when omitted or `-`
        file: Option<PathBuf>,

        /// Which projection to print
        #[arg(short, long, value_enum, default_value = "both")]
        mode: Mode,
    },

    /// Rewrite absolute chord names as Roman degrees
    Degrees {
        /// Input file; stdin when omitted or `-`
        file: Option<PathBuf>,

        /// Tonic note, e.g. C, F#, Bb
        #[arg(short, long)]
        tonic: String,
    },

    /// Dump the parsed song model as JSON
    Parse {
        /// Input file; stdin when omitted or `-`
        file: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Both,
    Lyrics,
    Chords,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::View { file, mode } => {
            let song = parse_input(file.as_deref())?;
            let text = match mode {
                Mode::Both => both_text(&song),
                Mode::Lyrics => lyrics_text(&song),
                Mode::Chords => chords_text(&song),
            };
            println!("{}", text);
        }
        Commands::Degrees { file, tonic } => {
            let input = read_input(file.as_deref())?;
            let converted = cancionero::convert_to_degrees(&input, &tonic)?;
            print!("{}", converted);
        }
        Commands::Parse { file, pretty } => {
            let song = parse_input(file.as_deref())?;
            let json = if pretty {
                serde_json::to_string_pretty(&song)?
            } else {
                serde_json::to_string(&song)?
            };
            println!("{}", json);
        }
    }

    Ok(())
}

fn parse_input(file: Option<&Path>) -> Result<Song> {
    let input = read_input(file)?;
    let result = cancionero::parse(strip_song_fence(&input));
    for feedback in &result.feedback {
        warn!(line = feedback.line, "{}", feedback.message);
    }
    Ok(result.value)
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}
