// Block aggregation.
//
// Blocks are built in two passes over a shared map. The sample pass must
// finish for every block before the full pass starts: each parcel in the
// full pass is extrapolated from its block's final sample ratio.
use crate::types::{BlockProperties, Parcel};
use crate::util::ratio_or_zero;
use std::collections::BTreeMap;

pub type BlockMap = BTreeMap<String, Block>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub block_id: String,
    pub is_sampled: bool,
    pub sample_land_area_total: f64,
    pub sample_value_total: f64,
    pub land_area_total: f64,
    pub assessed_value_total: f64,
    pub extrapolated_value_total: f64,
}

impl Block {
    pub fn new(block_id: impl Into<String>) -> Self {
        Self {
            block_id: block_id.into(),
            ..Self::default()
        }
    }

    pub fn sample_parcel(&mut self, parcel: &Parcel) {
        self.is_sampled = true;
        self.sample_land_area_total += parcel.land_area;
        self.sample_value_total += parcel.assessed_land_value;
    }

    /// Fold a population parcel in. Sampled blocks extrapolate its value
    /// from the sample ratio; unsampled blocks take the assessed value.
    pub fn add_parcel(&mut self, parcel: &Parcel) {
        self.land_area_total += parcel.land_area;
        self.assessed_value_total += parcel.assessed_land_value;
        self.extrapolated_value_total += if self.is_sampled {
            parcel.land_area * self.avg_sample_value_per_area()
        } else {
            parcel.assessed_land_value
        };
    }

    pub fn avg_sample_value_per_area(&self) -> f64 {
        ratio_or_zero(self.sample_value_total, self.sample_land_area_total)
    }

    pub fn avg_assessed_value_per_area(&self) -> f64 {
        ratio_or_zero(self.assessed_value_total, self.land_area_total)
    }

    pub fn avg_extrapolated_value_per_area(&self) -> f64 {
        ratio_or_zero(self.extrapolated_value_total, self.land_area_total)
    }

    pub fn properties(&self) -> BlockProperties {
        BlockProperties {
            block: self.block_id.clone(),
            land_area: self.land_area_total,
            total_assessed_land_value: self.assessed_value_total,
            avg_per_sqft_assessed_land_value: self.avg_assessed_value_per_area(),
            total_extrapolated_land_value: self.extrapolated_value_total,
            avg_per_sqft_extrapolated_land_value: self.avg_extrapolated_value_per_area(),
            assessed_land_value_ratio: if self.extrapolated_value_total != 0.0 {
                self.assessed_value_total / self.extrapolated_value_total
            } else {
                0.0
            },
        }
    }
}

fn block_entry<'a>(blocks: &'a mut BlockMap, block_id: &str) -> &'a mut Block {
    blocks
        .entry(block_id.to_string())
        .or_insert_with(|| Block::new(block_id))
}

/// Pass 1: fold the (appreciated) sample into the sample accumulators.
pub fn fold_sample(blocks: &mut BlockMap, sample: &[Parcel]) {
    for parcel in sample {
        block_entry(blocks, &parcel.block_id).sample_parcel(parcel);
    }
}

/// Pass 2: fold the unadjusted population into the general accumulators.
pub fn fold_population(blocks: &mut BlockMap, population: &[Parcel]) {
    for parcel in population {
        block_entry(blocks, &parcel.block_id).add_parcel(parcel);
    }
}

/// Run both passes, sample first.
pub fn aggregate(sample: &[Parcel], population: &[Parcel]) -> BlockMap {
    let mut blocks = BlockMap::new();
    fold_sample(&mut blocks, sample);
    fold_population(&mut blocks, population);
    blocks
}

pub fn sampled_blocks(blocks: &BlockMap) -> Vec<&Block> {
    blocks.values().filter(|b| b.is_sampled).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn sampled_block_extrapolates_unsampled_parcel() {
        let sampled = parcel("001", 2000.0, 40_000.0);
        let other = parcel("001", 1000.0, 15_000.0);
        let blocks = aggregate(&[sampled.clone()], &[sampled, other]);

        let block = &blocks["001"];
        assert!(block.is_sampled);
        assert!((block.avg_sample_value_per_area() - 20.0).abs() < 1e-9);
        assert!((block.assessed_value_total - 55_000.0).abs() < 1e-9);
        assert!((block.extrapolated_value_total - 60_000.0).abs() < 1e-9);
        assert!((block.land_area_total - 3000.0).abs() < 1e-9);
        assert!((block.avg_extrapolated_value_per_area() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn unsampled_block_keeps_assessed_values() {
        let population = vec![parcel("002", 1000.0, 15_000.0), parcel("002", 500.0, 7_500.5)];
        let blocks = aggregate(&[], &population);
        let block = &blocks["002"];
        assert!(!block.is_sampled);
        assert_eq!(block.extrapolated_value_total, block.assessed_value_total);
    }

    #[test]
    fn extrapolation_uses_final_sample_ratio() {
        // Sample ratio after both sample parcels is (30k + 10k) / 2000 = 20.
        let sample = vec![parcel("003", 1000.0, 30_000.0), parcel("003", 1000.0, 10_000.0)];
        let blocks = aggregate(&sample, &[parcel("003", 100.0, 1.0)]);
        assert!((blocks["003"].extrapolated_value_total - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn blocks_are_created_on_first_reference() {
        let blocks = aggregate(
            &[parcel("001", 1000.0, 50_000.0)],
            &[parcel("001", 1000.0, 20_000.0), parcel("009", 1000.0, 20_000.0)],
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(sampled_blocks(&blocks).len(), 1);
        assert_eq!(blocks["009"].block_id, "009");
    }

    #[test]
    fn extrapolated_totals_are_non_negative() {
        let sample = vec![parcel("001", 2000.0, 40_000.0)];
        let population = vec![
            parcel("001", 2000.0, 40_000.0),
            parcel("001", 0.0, 1_000.0),
            parcel("002", 1000.0, 0.0),
        ];
        let blocks = aggregate(&sample, &population);
        assert!(blocks.values().all(|b| b.extrapolated_value_total >= 0.0));
    }

    #[test]
    fn empty_block_metrics_are_zero() {
        let block = Block::new("004");
        assert_eq!(block.avg_sample_value_per_area(), 0.0);
        assert_eq!(block.avg_assessed_value_per_area(), 0.0);
        assert_eq!(block.avg_extrapolated_value_per_area(), 0.0);
        assert_eq!(block.properties().assessed_land_value_ratio, 0.0);
    }

    #[test]
    fn properties_report_assessed_to_extrapolated_ratio() {
        let sampled = parcel("001", 2000.0, 40_000.0);
        let blocks = aggregate(
            &[sampled.clone()],
            &[sampled, parcel("001", 1000.0, 15_000.0)],
        );
        let props = blocks["001"].properties();
        assert_eq!(props.block, "001");
        assert!((props.assessed_land_value_ratio - 55_000.0 / 60_000.0).abs() < 1e-12);
    }
}
