use crate::block::{sampled_blocks, Block, BlockMap};
use crate::stats::{percentile_table, sort_by_value, weighted_average};
use crate::types::{PercentileRow, SummaryStats};
use crate::util::{ratio_or_zero, sqft_to_sqmi};

fn land_area(b: &&Block) -> f64 {
    b.land_area_total
}

fn assessed_per_area(b: &&Block) -> f64 {
    b.avg_assessed_value_per_area()
}

fn extrapolated_per_area(b: &&Block) -> f64 {
    b.avg_extrapolated_value_per_area()
}

/// Headline figures and the percentile table over sampled blocks.
///
/// Unsampled blocks carry no valuation signal and are left out of every
/// figure except the block count.
pub fn generate_summary(
    blocks: &BlockMap,
    num_parcels: usize,
    num_sample_parcels: usize,
) -> (SummaryStats, Vec<PercentileRow>) {
    let sampled = sampled_blocks(blocks);

    let total_land_area_sqft: f64 = sampled.iter().map(land_area).sum();
    let total_assessed_land_value: f64 = sampled.iter().map(|b| b.assessed_value_total).sum();
    let total_extrapolated_land_value: f64 =
        sampled.iter().map(|b| b.extrapolated_value_total).sum();

    let avg_sample_block_value_growth = weighted_average(&sampled, land_area, |b| {
        ratio_or_zero(b.extrapolated_value_total, b.assessed_value_total)
    });

    // Each view needs its own ordering for the percentile walk.
    let mut by_assessed = sampled.clone();
    sort_by_value(&mut by_assessed, assessed_per_area);
    let mut by_extrapolated = sampled;
    sort_by_value(&mut by_extrapolated, extrapolated_per_area);

    let assessed_pctl = percentile_table(&by_assessed, land_area, assessed_per_area);
    let extrapolated_pctl = percentile_table(&by_extrapolated, land_area, extrapolated_per_area);

    let rows: Vec<PercentileRow> = assessed_pctl
        .iter()
        .zip(&extrapolated_pctl)
        .enumerate()
        .map(|(percentile, (a, e))| PercentileRow {
            percentile,
            assessed_per_sqft: *a,
            extrapolated_per_sqft: *e,
        })
        .collect();

    let summary = SummaryStats {
        num_parcels,
        num_sample_parcels,
        num_blocks: blocks.len(),
        num_sampled_blocks: by_assessed.len(),
        total_land_area_sqft,
        total_land_area_sqmi: sqft_to_sqmi(total_land_area_sqft),
        avg_sample_block_value_growth,
        total_assessed_land_value,
        total_extrapolated_land_value,
        avg_assessed_land_value_per_sqft: weighted_average(
            &by_assessed,
            land_area,
            assessed_per_area,
        ),
        avg_extrapolated_land_value_per_sqft: weighted_average(
            &by_extrapolated,
            land_area,
            extrapolated_per_area,
        ),
        median_assessed_land_value_per_sqft: assessed_pctl[50],
        median_extrapolated_land_value_per_sqft: extrapolated_pctl[50],
    };

    (summary, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::aggregate;
    use crate::stats::PERCENTILE_STEPS;
    use crate::types::Parcel;

    fn parcel(block: &str, area: f64, value: f64) -> Parcel {
        Parcel {
            block_id: block.into(),
            lot_id: String::new(),
            location: String::new(),
            neighborhood_code: String::new(),
            property_class_code: "D".into(),
            zoning_code: String::new(),
            land_area: area,
            assessed_land_value: value,
            sale_year: 2019,
        }
    }

    #[test]
    fn summary_ignores_unsampled_blocks() {
        let sampled = parcel("001", 2000.0, 40_000.0);
        let population = vec![
            sampled.clone(),
            parcel("001", 1000.0, 15_000.0),
            parcel("002", 5000.0, 1_000_000.0),
        ];
        let blocks = aggregate(&[sampled], &population);
        let (summary, rows) = generate_summary(&blocks, population.len(), 1);

        assert_eq!(summary.num_blocks, 2);
        assert_eq!(summary.num_sampled_blocks, 1);
        assert!((summary.total_land_area_sqft - 3000.0).abs() < 1e-9);
        assert!((summary.total_land_area_sqmi - 3000.0 * 3.58701e-8).abs() < 1e-15);
        assert!((summary.total_assessed_land_value - 55_000.0).abs() < 1e-9);
        assert!((summary.total_extrapolated_land_value - 60_000.0).abs() < 1e-9);
        assert!((summary.avg_extrapolated_land_value_per_sqft - 20.0).abs() < 1e-9);
        assert!((summary.median_assessed_land_value_per_sqft - 55_000.0 / 3000.0).abs() < 1e-9);
        assert!((summary.avg_sample_block_value_growth - 60_000.0 / 55_000.0).abs() < 1e-9);
        assert_eq!(rows.len(), PERCENTILE_STEPS);
        assert_eq!(rows[100].percentile, 100);
    }

    #[test]
    fn empty_blocks_give_zero_summary() {
        let (summary, rows) = generate_summary(&BlockMap::new(), 0, 0);
        assert_eq!(summary.num_sampled_blocks, 0);
        assert_eq!(summary.total_land_area_sqft, 0.0);
        assert_eq!(summary.avg_assessed_land_value_per_sqft, 0.0);
        assert_eq!(summary.median_extrapolated_land_value_per_sqft, 0.0);
        assert!(rows.iter().all(|r| r.assessed_per_sqft == 0.0));
    }

    #[test]
    fn percentile_views_are_sorted_independently() {
        // Block A: low assessed, high extrapolated. Block B: the reverse.
        let sample = vec![parcel("A", 1000.0, 100_000.0), parcel("B", 1000.0, 60_000.0)];
        let population = vec![
            parcel("A", 1000.0, 100_000.0),
            parcel("A", 9000.0, 90_000.0),
            parcel("B", 1000.0, 60_000.0),
            parcel("B", 9000.0, 1_800_000.0),
        ];
        let blocks = aggregate(&sample, &population);
        let (_, rows) = generate_summary(&blocks, population.len(), sample.len());

        // A: assessed 19/sqft, extrapolated 100/sqft. B: assessed 186, extrapolated 60.
        assert!((rows[0].assessed_per_sqft - 19.0).abs() < 1e-9);
        assert!((rows[100].assessed_per_sqft - 186.0).abs() < 1e-9);
        assert!((rows[0].extrapolated_per_sqft - 60.0).abs() < 1e-9);
        assert!((rows[100].extrapolated_per_sqft - 100.0).abs() < 1e-9);
    }
}
