// Tunable parameters for the sample filters and the appreciation model.
//
// Defaults reproduce the 2017-2018 secured roll analysis. The appreciation
// write-up talks about 4 percent a year while the computation applied 3
// percent; both figures are kept so callers pick one explicitly.
use clap::ValueEnum;
use std::collections::BTreeSet;

/// Rate actually compounded onto sample values.
pub const APPLIED_APPRECIATION_RATE: f64 = 0.03;
/// Rate quoted in the accompanying narrative.
pub const NARRATIVE_APPRECIATION_RATE: f64 = 0.04;
pub const DEFAULT_REFERENCE_YEAR: i32 = 2019;

/// Width of the block segment at the front of `RP1PRCLID`.
pub const BLOCK_ID_WIDTH: usize = 5;

pub const SQ_MI_PER_SQ_FT: f64 = 3.58701e-8;

/// Condo class codes; their land area and land value are not meaningful
/// per parcel.
pub const DEFAULT_EXCLUDED_CLASS_CODES: &[&str] = &["Z", "CZ"];

#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub min_sale_year: i32,
    pub max_sale_year: i32,
    pub min_land_area: f64,
    pub max_land_area: f64,
    /// Exclusive lower bound.
    pub min_assessed_value: f64,
    pub excluded_class_codes: BTreeSet<String>,
    pub min_value_per_area: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_sale_year: 2008,
            max_sale_year: 2020,
            min_land_area: 1000.0,
            max_land_area: 400_000.0,
            min_assessed_value: 10_000.0,
            excluded_class_codes: DEFAULT_EXCLUDED_CLASS_CODES
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            min_value_per_area: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppreciationConfig {
    pub rate: f64,
    pub reference_year: i32,
}

impl Default for AppreciationConfig {
    fn default() -> Self {
        Self {
            rate: APPLIED_APPRECIATION_RATE,
            reference_year: DEFAULT_REFERENCE_YEAR,
        }
    }
}

/// What the loader does with a row it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RowErrorMode {
    /// Count it, log it and keep going.
    #[default]
    Skip,
    /// Fail the whole batch.
    Abort,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub filters: FilterConfig,
    pub appreciation: AppreciationConfig,
    pub on_row_error: RowErrorMode,
}
