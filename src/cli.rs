//! Command-line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Identify vehicle stoppages in telemetry and export map geometry.
#[derive(Parser, Debug)]
#[command(name = "vehicle-stoppage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Telemetry feed (JSON array of samples)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Settings file path
    #[arg(short, long, global = true, env = "VEHICLE_STOPPAGE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Stoppage threshold in minutes for this run (overrides settings)
    #[arg(short, long, global = true, allow_hyphen_values = true)]
    pub threshold: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List qualifying stoppages
    Stoppages,

    /// Write map geometry JSON for a renderer
    Geometry {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show info-panel details for one stoppage
    Details {
        /// Stoppage index as listed by `stoppages`
        index: usize,
    },

    /// Persist the default stoppage threshold
    SetThreshold {
        /// Minutes
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },
}

pub const DEFAULT_DATA_PATH: &str = "data/data.json";
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "vehicle-stoppage",
            "details",
            "2",
            "--data",
            "trip.json",
            "--threshold",
            "7.5",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Details { index: 2 }));
        assert_eq!(cli.data, Some(PathBuf::from("trip.json")));
        assert_eq!(cli.threshold.as_deref(), Some("7.5"));
    }

    #[test]
    fn geometry_output_is_optional() {
        let cli = Cli::try_parse_from(["vehicle-stoppage", "geometry"]).unwrap();
        assert!(matches!(cli.command, Commands::Geometry { output: None }));
    }
}
