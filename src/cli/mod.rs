//! CLI module for playlist-converter

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use playlist_converter::MissingLocationPolicy;

pub mod commands;

#[derive(Parser, Debug)]
#[command(name = "playlist-converter", about = "Convert JSPF playlists to XSPF")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a JSPF file to XSPF
    Convert {
        /// JSPF file to read, or `-` for stdin
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Where to write the XSPF file, or `-` for stdout
        /// (defaults to <stem>.xspf next to the input, or stdout when reading stdin)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// What to do with tracks that have no location
        #[arg(long, value_enum, env = "PLAYLIST_CONVERTER_ON_MISSING_LOCATION")]
        on_missing_location: Option<MissingLocationPolicy>,
    },

    /// Run the HTTP upload server
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "PLAYLIST_CONVERTER_BIND")]
        bind: Option<String>,

        /// Largest accepted upload in MiB
        #[arg(long, env = "PLAYLIST_CONVERTER_MAX_UPLOAD_MB")]
        max_upload_mb: Option<usize>,

        /// What to do with tracks that have no location
        #[arg(long, value_enum, env = "PLAYLIST_CONVERTER_ON_MISSING_LOCATION")]
        on_missing_location: Option<MissingLocationPolicy>,
    },

    /// Show the settings file and effective settings
    Config {
        /// Write a settings file with the current values if none exists
        #[arg(long)]
        init: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert_with_policy() {
        let cli = Cli::try_parse_from([
            "playlist-converter",
            "convert",
            "mix.jspf",
            "-o",
            "out.xspf",
            "--on-missing-location",
            "skip",
        ])
        .unwrap();

        match cli.command {
            Commands::Convert {
                input,
                output,
                on_missing_location,
            } => {
                assert_eq!(input, PathBuf::from("mix.jspf"));
                assert_eq!(output, Some(PathBuf::from("out.xspf")));
                assert_eq!(on_missing_location, Some(MissingLocationPolicy::Skip));
            }
            other => panic!("expected convert, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from([
            "playlist-converter",
            "-v",
            "serve",
            "--bind",
            "127.0.0.1:8080",
            "--max-upload-mb",
            "5",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Serve {
                bind,
                max_upload_mb,
                ..
            } => {
                assert_eq!(bind.as_deref(), Some("127.0.0.1:8080"));
                assert_eq!(max_upload_mb, Some(5));
            }
            other => panic!("expected serve, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(
            Cli::try_parse_from([
                "playlist-converter",
                "convert",
                "mix.jspf",
                "--on-missing-location",
                "ignore",
            ])
            .is_err()
        );
    }
}
