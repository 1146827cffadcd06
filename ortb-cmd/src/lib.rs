//! Command implementations for the ORTB CLI.
//!
//! Provides the offline geometry simplification and terminal versions of
//! the dashboard's home-page summary and raw-data export.

use clap::Subcommand;
use ortb_core::scale::Scale;
use std::path::PathBuf;

pub mod export;
pub mod load;
pub mod simplify;
pub mod summary;

#[derive(Subcommand)]
pub enum Command {
    /// Simplify communes.geojson and epci.geojson into their *_simple.geojson versions
    Simplify {
        /// Directory holding the geometry files
        #[arg(short = 'd', long, default_value = "data")]
        data_dir: PathBuf,

        /// Simplification tolerance, in coordinate units
        #[arg(short = 't', long, default_value_t = ortb_geo::simplify::DEFAULT_TOLERANCE)]
        tolerance: f64,
    },

    /// Print the dataset summary shown on the home page
    Summary {
        /// Directory holding the CSV files
        #[arg(short = 'd', long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Filter the observations and write them as CSV
    Export {
        /// Directory holding the CSV files
        #[arg(short = 'd', long, default_value = "data")]
        data_dir: PathBuf,

        /// Territorial scale: Commune or EPCI
        #[arg(short = 's', long, default_value = "Commune")]
        scale: Scale,

        /// Territorial codes to keep (repeatable)
        #[arg(long = "territory")]
        territories: Vec<String>,

        /// Themes to keep (repeatable)
        #[arg(long = "theme")]
        themes: Vec<String>,

        /// Indicator display names to keep (repeatable)
        #[arg(long = "indicator")]
        indicators: Vec<String>,

        /// Dates to keep, YYYY-MM-DD or DD/MM/YYYY (repeatable)
        #[arg(long = "date")]
        dates: Vec<String>,

        /// Output CSV path; defaults to donnees_{scale}_filtrees.csv in the current directory
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Simplify {
            data_dir,
            tolerance,
        } => simplify::run_simplify(&data_dir, tolerance),
        Command::Summary { data_dir } => summary::run_summary(&data_dir),
        Command::Export {
            data_dir,
            scale,
            territories,
            themes,
            indicators,
            dates,
            output,
        } => {
            let filters = export::ExportFilters {
                territories,
                themes,
                indicators,
                dates,
            };
            export::run_export(&data_dir, scale, &filters, output.as_deref())
        }
    }
}
