// Entry point and high-level CLI flow.
//
// Loads an assessment roll, extrapolates per-block land values from the
// recently sold sample, prints the report, and writes the percentile CSV,
// a JSON summary and (when boundaries are supplied) a styled block map.
mod appreciation;
mod block;
mod config;
mod error;
mod filter;
mod geometry;
mod loader;
mod output;
mod pipeline;
mod render;
mod reports;
mod stats;
mod types;
mod util;

use clap::Parser;
use config::{
    AppreciationConfig, Config, FilterConfig, RowErrorMode, APPLIED_APPRECIATION_RATE,
    DEFAULT_EXCLUDED_CLASS_CODES, DEFAULT_REFERENCE_YEAR, NARRATIVE_APPRECIATION_RATE,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Extrapolate block land values from an assessment roll")]
struct Args {
    /// Secured roll CSV export.
    roll_csv: PathBuf,

    /// Directory of ArcGIS block boundary `*.json` files.
    #[arg(long)]
    geometry_dir: Option<PathBuf>,

    /// Where to write percentiles.csv, summary.json and blocks.geojson.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = RowErrorMode::Skip)]
    on_row_error: RowErrorMode,

    #[arg(long, default_value_t = 2008)]
    min_sale_year: i32,

    #[arg(long, default_value_t = 2020)]
    max_sale_year: i32,

    #[arg(long, default_value_t = 1000.0)]
    min_land_area: f64,

    #[arg(long, default_value_t = 400_000.0)]
    max_land_area: f64,

    /// Sample parcels must be assessed strictly above this.
    #[arg(long, default_value_t = 10_000.0)]
    min_assessed_value: f64,

    /// Class code to leave out of the sample. Repeat for several; defaults
    /// to the condo codes.
    #[arg(long = "excluded-class")]
    excluded_classes: Vec<String>,

    #[arg(long, default_value_t = 50.0)]
    min_value_per_area: f64,

    /// Yearly appreciation applied to sample values.
    #[arg(long, default_value_t = APPLIED_APPRECIATION_RATE)]
    appreciation_rate: f64,

    #[arg(long, default_value_t = DEFAULT_REFERENCE_YEAR)]
    reference_year: i32,

    /// Show every N-th percentile row in the console preview.
    #[arg(long, default_value_t = 10)]
    preview_step: usize,
}

impl Args {
    fn config(&self) -> Config {
        let excluded_class_codes = if self.excluded_classes.is_empty() {
            DEFAULT_EXCLUDED_CLASS_CODES
                .iter()
                .map(|c| (*c).to_string())
                .collect()
        } else {
            self.excluded_classes.iter().cloned().collect()
        };

        Config {
            filters: FilterConfig {
                min_sale_year: self.min_sale_year,
                max_sale_year: self.max_sale_year,
                min_land_area: self.min_land_area,
                max_land_area: self.max_land_area,
                min_assessed_value: self.min_assessed_value,
                excluded_class_codes,
                min_value_per_area: self.min_value_per_area,
            },
            appreciation: AppreciationConfig {
                rate: self.appreciation_rate,
                reference_year: self.reference_year,
            },
            on_row_error: self.on_row_error,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let args = Args::parse();
    let config = args.config();
    log::debug!("Config: {:?}", config);
    if config.appreciation.rate != NARRATIVE_APPRECIATION_RATE {
        log::info!(
            "Appreciating sample at {} per year (narrative figure is {})",
            config.appreciation.rate,
            NARRATIVE_APPRECIATION_RATE
        );
    }

    let (parcels, load_report) = loader::load_parcels_from_path(&args.roll_csv, config.on_row_error)?;
    log::info!(
        "Loaded {} of {} rows ({} skipped due to parse errors)",
        util::format_int(load_report.parsed_rows),
        util::format_int(load_report.total_rows),
        util::format_int(load_report.parse_errors)
    );

    let analysis = pipeline::run(&parcels, &config);

    print!(
        "{}",
        output::format_report(&analysis.summary, &analysis.percentiles)?
    );
    println!();
    output::preview_table_rows(&analysis.percentiles, args.preview_step);

    std::fs::create_dir_all(&args.out_dir)?;

    let percentiles_path = args.out_dir.join("percentiles.csv");
    output::write_csv(&percentiles_path, &analysis.percentiles)?;
    log::info!("Wrote {}", percentiles_path.display());

    let summary_path = args.out_dir.join("summary.json");
    output::write_summary_json(&summary_path, &analysis.summary, chrono::Utc::now())?;
    log::info!("Wrote {}", summary_path.display());

    if let Some(dir) = &args.geometry_dir {
        let paths = geometry::geometry_files(dir)?;
        let (collection, _) = geometry::build_feature_collection(&analysis.blocks, &paths)?;
        let geojson_path = args.out_dir.join("blocks.geojson");
        geometry::write_geojson(&geojson_path, collection)?;
        log::info!("Wrote {}", geojson_path.display());
    }

    Ok(())
}
