// One batch run, from parsed parcels to block statistics.
//
// raw parcels -> sample filters -> appreciation -> sample pass -> full
// pass -> summary. The population slice is never modified; the sample is
// a filtered, appreciated copy.
use crate::appreciation::appreciate_sample;
use crate::block::{aggregate, BlockMap};
use crate::config::Config;
use crate::filter::select_sample;
use crate::reports::generate_summary;
use crate::types::{Parcel, PercentileRow, SummaryStats};
use crate::util::format_int;

#[derive(Debug, Clone)]
pub struct Analysis {
    pub blocks: BlockMap,
    pub summary: SummaryStats,
    pub percentiles: Vec<PercentileRow>,
}

pub fn run(parcels: &[Parcel], config: &Config) -> Analysis {
    log::info!("Num parcels: {}", format_int(parcels.len()));

    let sample = select_sample(parcels, &config.filters);
    let sample = appreciate_sample(&sample, &config.appreciation);
    log::info!(
        "Num sample parcels: {} (appreciated at {} to {})",
        format_int(sample.len()),
        config.appreciation.rate,
        config.appreciation.reference_year
    );

    let blocks = aggregate(&sample, parcels);
    let (summary, percentiles) = generate_summary(&blocks, parcels.len(), sample.len());
    log::info!(
        "Num blocks: {}, sampled: {}",
        format_int(summary.num_blocks),
        format_int(summary.num_sampled_blocks)
    );

    Analysis {
        blocks,
        summary,
        percentiles,
    }
}
