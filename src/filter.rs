// Sample selection.
//
// The sample is the subset of parcels whose assessed land value is taken
// as a fair market signal. Each stage is an independent predicate, so the
// result is their conjunction whatever the order.
use crate::config::FilterConfig;
use crate::types::Parcel;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub enum SampleFilter {
    /// Recent sale, so the assessment still tracks the market.
    SaleYear { min: i32, max: i32 },
    /// Drops slivers, huge tracts and nominal land values.
    LandSize {
        min_area: f64,
        max_area: f64,
        min_value: f64,
    },
    /// Class codes without a usable per-parcel land valuation.
    ExcludedClass(BTreeSet<String>),
    /// Very low per-area values, likely carried-over tax bases.
    MinValuePerArea(f64),
}

impl SampleFilter {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SaleYear { .. } => "sale year",
            Self::LandSize { .. } => "land size",
            Self::ExcludedClass(_) => "property class",
            Self::MinValuePerArea(_) => "value per area",
        }
    }

    pub fn keeps(&self, parcel: &Parcel) -> bool {
        match self {
            Self::SaleYear { min, max } => (*min..=*max).contains(&parcel.sale_year),
            Self::LandSize {
                min_area,
                max_area,
                min_value,
            } => {
                *min_area <= parcel.land_area
                    && parcel.land_area <= *max_area
                    && parcel.assessed_land_value > *min_value
            }
            Self::ExcludedClass(codes) => !codes.contains(&parcel.property_class_code),
            Self::MinValuePerArea(min) => parcel.assessed_value_per_area() >= *min,
        }
    }
}

/// The four sample stages, in the order they are applied.
pub fn sample_filters(config: &FilterConfig) -> Vec<SampleFilter> {
    vec![
        SampleFilter::SaleYear {
            min: config.min_sale_year,
            max: config.max_sale_year,
        },
        SampleFilter::LandSize {
            min_area: config.min_land_area,
            max_area: config.max_land_area,
            min_value: config.min_assessed_value,
        },
        SampleFilter::ExcludedClass(config.excluded_class_codes.clone()),
        SampleFilter::MinValuePerArea(config.min_value_per_area),
    ]
}

pub fn apply_filters(mut parcels: Vec<Parcel>, filters: &[SampleFilter]) -> Vec<Parcel> {
    for filter in filters {
        parcels.retain(|p| filter.keeps(p));
        log::info!(
            "After {} filter: {} parcels",
            filter.name(),
            parcels.len()
        );
    }
    parcels
}

/// Copy the parcels that pass every stage. The input is left untouched.
pub fn select_sample(parcels: &[Parcel], config: &FilterConfig) -> Vec<Parcel> {
    apply_filters(parcels.to_vec(), &sample_filters(config))
}
