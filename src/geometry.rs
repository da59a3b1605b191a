//! Block boundary ingestion.
//!
//! Reads the ArcGIS feature-set exports of city block outlines and joins
//! them to the computed blocks, producing a `GeoJSON` feature collection
//! keyed by block number. The two datasets are sourced independently, so
//! features without a block and blocks without a feature are both skipped.

use crate::block::BlockMap;
use crate::error::AppError;
use crate::render::apply_style;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ArcGisFeatureSet {
    pub features: Vec<ArcGisFeature>,
}

#[derive(Debug, Deserialize)]
pub struct ArcGisFeature {
    pub attributes: ArcGisAttributes,
    pub geometry: Option<ArcGisGeometry>,
}

#[derive(Debug, Deserialize)]
pub struct ArcGisAttributes {
    pub block_num: String,
}

/// First ring is the outer boundary, the rest are holes.
#[derive(Debug, Deserialize)]
pub struct ArcGisGeometry {
    pub rings: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryReport {
    pub files_read: usize,
    pub features_matched: usize,
    pub features_without_block: usize,
    /// Features for blocks with no sample, which carry no valuation signal.
    pub features_unsampled: usize,
    pub features_without_rings: usize,
    /// Sampled blocks that no feature matched.
    pub blocks_without_geometry: usize,
}

/// Twice the signed area of `ring`; positive when counter-clockwise.
fn signed_area(ring: &[Vec<f64>]) -> f64 {
    ring.windows(2)
        .filter_map(|w| match (w[0].as_slice(), w[1].as_slice()) {
            ([x0, y0, ..], [x1, y1, ..]) => Some(x0 * y1 - x1 * y0),
            _ => None,
        })
        .sum()
}

/// Reorient ArcGIS rings (clockwise shell, counter-clockwise holes) to the
/// `GeoJSON` winding: counter-clockwise shell, clockwise holes.
pub fn orient_rings(mut rings: Vec<Vec<Vec<f64>>>) -> Vec<Vec<Vec<f64>>> {
    for (i, ring) in rings.iter_mut().enumerate() {
        let area = signed_area(ring);
        let is_shell = i == 0;
        if (is_shell && area < 0.0) || (!is_shell && area > 0.0) {
            ring.reverse();
        }
    }
    rings
}

/// `*.json` files in `dir`, sorted so output order is stable.
pub fn geometry_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn read_feature_set(path: &Path) -> Result<ArcGisFeatureSet, AppError> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| AppError::Geometry {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Join one ArcGIS feature to its block, or `None` if either side is
/// missing.
fn block_feature(
    blocks: &BlockMap,
    feature: ArcGisFeature,
    report: &mut GeometryReport,
) -> Result<Option<Feature>, AppError> {
    let block_num = feature.attributes.block_num;
    let Some(block) = blocks.get(&block_num) else {
        log::debug!("No assessment data for block {}", block_num);
        report.features_without_block += 1;
        return Ok(None);
    };
    if !block.is_sampled {
        log::debug!("Block {} has no sample; not drawn", block_num);
        report.features_unsampled += 1;
        return Ok(None);
    }
    let rings = match feature.geometry {
        Some(g) if !g.rings.is_empty() => g.rings,
        _ => {
            log::debug!("Block {} has no boundary rings", block_num);
            report.features_without_rings += 1;
            return Ok(None);
        }
    };

    let props = block.properties();
    let value = props.avg_per_sqft_extrapolated_land_value;
    let mut properties = match serde_json::to_value(props)? {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    apply_style(&mut properties, value);

    Ok(Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::Polygon(orient_rings(rings)))),
        id: Some(Id::String(block_num)),
        properties: Some(properties),
        foreign_members: None,
    }))
}

pub fn build_feature_collection(
    blocks: &BlockMap,
    paths: &[PathBuf],
) -> Result<(FeatureCollection, GeometryReport), AppError> {
    let mut report = GeometryReport::default();
    let mut features = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for path in paths {
        let set = read_feature_set(path)?;
        report.files_read += 1;
        for feature in set.features {
            if let Some(f) = block_feature(blocks, feature, &mut report)? {
                if let Some(Id::String(id)) = &f.id {
                    seen.insert(id.clone());
                }
                features.push(f);
            }
        }
        log::info!("{}: {} features so far", path.display(), features.len());
    }

    report.features_matched = features.len();
    report.blocks_without_geometry = blocks
        .values()
        .filter(|b| b.is_sampled && !seen.contains(&b.block_id))
        .count();
    log::info!(
        "Matched {} block features; {} features without block data, {} unsampled, {} without rings, {} sampled blocks without geometry",
        report.features_matched,
        report.features_without_block,
        report.features_unsampled,
        report.features_without_rings,
        report.blocks_without_geometry
    );

    Ok((
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        report,
    ))
}

pub fn write_geojson(path: &Path, collection: FeatureCollection) -> Result<(), AppError> {
    std::fs::write(path, GeoJson::from(collection).to_string())?;
    Ok(())
}
