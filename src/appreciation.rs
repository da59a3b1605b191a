use crate::config::AppreciationConfig;
use crate::types::Parcel;

/// Compound `value` forward by `rate` for `years` years.
pub fn appreciate(value: f64, rate: f64, years: i32) -> f64 {
    value * (1.0 + rate).powi(years)
}

/// A copy of `parcel` with its land value brought forward to the reference
/// year. Sales at or after the reference year are copied unchanged.
pub fn appreciated(parcel: &Parcel, config: &AppreciationConfig) -> Parcel {
    let mut out = parcel.clone();
    if parcel.sale_year < config.reference_year {
        out.assessed_land_value = appreciate(
            parcel.assessed_land_value,
            config.rate,
            config.reference_year - parcel.sale_year,
        );
    }
    out
}

/// Only ever called on the filtered sample; the full population keeps its
/// assessed values.
pub fn appreciate_sample(sample: &[Parcel], config: &AppreciationConfig) -> Vec<Parcel> {
    sample.iter().map(|p| appreciated(p, config)).collect()
}
