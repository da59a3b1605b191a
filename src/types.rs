use serde::Serialize;
use std::collections::HashMap;
use tabled::Tabled;

/// One roll row as read from the CSV: header name to raw text.
pub type RawRow = HashMap<String, String>;

/// A single taxable land parcel.
///
/// Parcels are never edited after parsing. Appreciation builds a new
/// value so the unadjusted population stays available for the full pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    pub block_id: String,
    pub lot_id: String,
    pub location: String,
    pub neighborhood_code: String,
    pub property_class_code: String,
    pub zoning_code: String,
    /// Square feet.
    pub land_area: f64,
    pub assessed_land_value: f64,
    /// `0` when the parcel has no recorded sale.
    pub sale_year: i32,
}

impl Parcel {
    pub fn assessed_value_per_area(&self) -> f64 {
        if self.land_area > 0.0 {
            self.assessed_land_value / self.land_area
        } else {
            0.0
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct PercentileRow {
    #[serde(rename = "Percentile Area")]
    #[tabled(rename = "Percentile Area")]
    pub percentile: usize,
    #[serde(rename = "Assessed Per Square Foot")]
    #[tabled(rename = "Assessed Per Square Foot")]
    pub assessed_per_sqft: f64,
    #[serde(rename = "Extrapolated Per Square Foot")]
    #[tabled(rename = "Extrapolated Per Square Foot")]
    pub extrapolated_per_sqft: f64,
}

/// Properties merged into each block's map feature.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct BlockProperties {
    pub block: String,
    pub land_area: f64,
    pub total_assessed_land_value: f64,
    pub avg_per_sqft_assessed_land_value: f64,
    pub total_extrapolated_land_value: f64,
    pub avg_per_sqft_extrapolated_land_value: f64,
    /// Assessed over extrapolated; `0` when nothing was extrapolated.
    pub assessed_land_value_ratio: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SummaryStats {
    pub num_parcels: usize,
    pub num_sample_parcels: usize,
    pub num_blocks: usize,
    pub num_sampled_blocks: usize,
    pub total_land_area_sqft: f64,
    pub total_land_area_sqmi: f64,
    pub avg_sample_block_value_growth: f64,
    pub total_assessed_land_value: f64,
    pub total_extrapolated_land_value: f64,
    pub avg_assessed_land_value_per_sqft: f64,
    pub avg_extrapolated_land_value_per_sqft: f64,
    pub median_assessed_land_value_per_sqft: f64,
    pub median_extrapolated_land_value_per_sqft: f64,
}
