use crate::config::RowErrorMode;
use crate::error::{AppError, ParseError};
use crate::types::{Parcel, RawRow};
use crate::util::{infer_sale_year, parse_f64_safe, split_block_lot};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

pub const FIELD_LOCATION: &str = "PROPLOC";
pub const FIELD_NEIGHBORHOOD: &str = "RP1NBRCDE";
pub const FIELD_PARCEL_ID: &str = "RP1PRCLID";
pub const FIELD_CLASS_CODE: &str = "RP1CLACDE";
pub const FIELD_ZONING: &str = "ZONE";
pub const FIELD_LAND_AREA: &str = "LAREA";
pub const FIELD_LAND_VALUE: &str = "RP1LNDVAL";
pub const FIELD_SALE_DATE: &str = "RECURRSALD";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub parsed_rows: usize,
    pub parse_errors: usize,
}

fn field<'a>(row: &'a RawRow, name: &'static str) -> Result<&'a str, ParseError> {
    row.get(name)
        .map(String::as_str)
        .ok_or(ParseError::MissingField { field: name })
}

fn numeric_field(row: &RawRow, name: &'static str) -> Result<f64, ParseError> {
    let raw = field(row, name)?;
    parse_f64_safe(raw).ok_or_else(|| ParseError::InvalidNumber {
        field: name,
        value: raw.to_string(),
    })
}

/// Build a [`Parcel`] from one roll row.
pub fn parse_parcel(row: &RawRow) -> Result<Parcel, ParseError> {
    let (block_id, lot_id) = split_block_lot(field(row, FIELD_PARCEL_ID)?);

    Ok(Parcel {
        block_id,
        lot_id,
        location: field(row, FIELD_LOCATION)?.to_string(),
        neighborhood_code: field(row, FIELD_NEIGHBORHOOD)?.to_string(),
        property_class_code: field(row, FIELD_CLASS_CODE)?.trim().to_string(),
        zoning_code: field(row, FIELD_ZONING)?.to_string(),
        land_area: numeric_field(row, FIELD_LAND_AREA)?,
        assessed_land_value: numeric_field(row, FIELD_LAND_VALUE)?,
        sale_year: infer_sale_year(field(row, FIELD_SALE_DATE)?),
    })
}

/// Read every row of a roll export into parcels.
///
/// Rows that fail to parse are counted and logged under
/// [`RowErrorMode::Skip`]; under [`RowErrorMode::Abort`] the first one ends
/// the load with its row number (1-based, header excluded).
pub fn load_parcels<R: Read>(
    reader: R,
    mode: RowErrorMode,
) -> Result<(Vec<Parcel>, LoadReport), AppError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut report = LoadReport::default();
    let mut parcels = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let row_no = report.total_rows;

        let parsed = match result {
            Ok(row) => parse_parcel(&row),
            Err(e) => match mode {
                RowErrorMode::Abort => return Err(e.into()),
                RowErrorMode::Skip => {
                    log::warn!("Row {}: CSV error: {}", row_no, e);
                    report.parse_errors += 1;
                    continue;
                }
            },
        };

        match parsed {
            Ok(parcel) => parcels.push(parcel),
            Err(source) => match mode {
                RowErrorMode::Abort => {
                    return Err(AppError::Row {
                        row: row_no,
                        source,
                    })
                }
                RowErrorMode::Skip => {
                    log::warn!("Row {}: {}", row_no, source);
                    report.parse_errors += 1;
                }
            },
        }
    }

    report.parsed_rows = parcels.len();
    Ok((parcels, report))
}

pub fn load_parcels_from_path(
    path: &Path,
    mode: RowErrorMode,
) -> Result<(Vec<Parcel>, LoadReport), AppError> {
    let file = std::fs::File::open(path)?;
    load_parcels(file, mode)
}
