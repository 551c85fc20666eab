use std::path::Path;

use itertools::Itertools;
use log::warn;
use polars::prelude::*;

use crate::data_structs::typedef::{
    ChrType,
    PosType,
    POS_MAX,
};
use crate::data_structs::Region;
use crate::utils::{
    normalize_chrom,
    schema_from_arrays,
};

/// Reads a region file: tab-separated `CHR START END`, no header.
///
/// Chromosome labels are normalized (`chr` prefix stripped, `X` -> 23,
/// `Y` -> 24); rows with labels outside the [1, 24] domain are dropped with
/// a counted warning. Coordinates are clamped into the store's
/// `[1, POS_MAX]` position domain, so out-of-range values can never wrap
/// during the narrowing cast.
pub fn read_regions(path: &Path) -> anyhow::Result<Vec<Region>> {
    let schema = schema_from_arrays(&["CHR", "START", "END"], &[
        DataType::String,
        DataType::Int64,
        DataType::Int64,
    ]);
    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_schema(Some(SchemaRef::from(schema)))
        .with_parse_options(
            CsvParseOptions::default().with_separator(b'\t'),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let chrs = df.column("CHR")?.as_materialized_series().str()?.clone();
    let starts = df.column("START")?.as_materialized_series().i64()?.clone();
    let ends = df.column("END")?.as_materialized_series().i64()?.clone();

    let mut dropped = 0usize;
    let regions = itertools::izip!(chrs.iter(), starts.iter(), ends.iter())
        .filter_map(|(chr, start, end)| {
            let (chr, start, end) = (chr?, start?, end?);
            match normalize_chrom(chr) {
                Some(chr) => {
                    Some(Region::new(
                        chr,
                        start.clamp(1, POS_MAX as i64) as PosType,
                        end.clamp(1, POS_MAX as i64) as PosType,
                    ))
                },
                None => {
                    dropped += 1;
                    None
                },
            }
        })
        .collect_vec();

    if dropped > 0 {
        warn!(
            "removed {} region row(s) with non-numeric CHR values",
            dropped
        );
    }
    Ok(regions)
}

/// Reads a SNP list: CSV with a header containing `CHR` and `POS` columns.
///
/// Chromosome normalization matches [`read_regions`].
pub fn read_snp_list(path: &Path) -> anyhow::Result<Vec<(ChrType, PosType)>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let chrs = df
        .column("CHR")?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let positions = df
        .column("POS")?
        .as_materialized_series()
        .cast(&DataType::UInt32)?;

    let mut dropped = 0usize;
    let snps = chrs
        .str()?
        .iter()
        .zip(positions.u32()?.iter())
        .filter_map(|(chr, pos)| {
            let (chr, pos) = (chr?, pos?);
            match normalize_chrom(chr) {
                Some(chr) => Some((chr, pos)),
                None => {
                    dropped += 1;
                    None
                },
            }
        })
        .collect_vec();

    if dropped > 0 {
        warn!(
            "removed {} SNP row(s) with non-numeric CHR values",
            dropped
        );
    }
    Ok(snps)
}
