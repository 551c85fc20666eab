use hashbrown::HashMap;
use log::debug;
use polars::prelude::*;

use crate::data_structs::schema::SumstatCols as Cols;
use crate::data_structs::typedef::{
    ChrType,
    EffectType,
    PosType,
};
use crate::data_structs::SumstatBatch;
use crate::utils::schema_from_arrays;
use crate::with_field_fn;

/// Locus column of the derived tables, `"CHR:window_start:window_end"`.
pub const LOCUS_COL: &str = "locus";
pub const WINDOW_START_COL: &str = "window_start";
pub const WINDOW_END_COL: &str = "window_end";
pub const SNP_POS_COL: &str = "snp_pos";
pub const SNP_MLOG10P_COL: &str = "snp_mlog10p";

/// Thresholds of the locus-breaker clumping algorithm.
///
/// `pvalue_limit` is the border threshold (clumping), `pvalue_sig` the
/// stricter significance threshold a run must reach to become a locus.
/// `pvalue_limit <= pvalue_sig` is expected but deliberately not enforced:
/// a violating configuration simply produces no loci.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LocusBreakerConfig {
    /// -log10(p) border threshold for rows entering the clumping pass.
    pub pvalue_limit: EffectType,
    /// -log10(p) a run's best SNP must exceed to produce a locus.
    pub pvalue_sig:   EffectType,
    /// Maximum base-pair gap between consecutive variants of one run.
    pub hole_size:    PosType,
    /// Fixed margin added on both sides of a locus window.
    pub flank:        PosType,
}

impl LocusBreakerConfig {
    with_field_fn!(with_pvalue_limit, pvalue_limit, EffectType);

    with_field_fn!(with_pvalue_sig, pvalue_sig, EffectType);

    with_field_fn!(with_hole_size, hole_size, PosType);

    with_field_fn!(with_flank, flank, PosType);
}

impl Default for LocusBreakerConfig {
    fn default() -> Self {
        Self {
            pvalue_limit: 3.3,
            pvalue_sig:   5.0,
            hole_size:    250_000,
            flank:        100_000,
        }
    }
}

const META_NAMES: [&str; 5] = [
    LOCUS_COL,
    WINDOW_START_COL,
    WINDOW_END_COL,
    SNP_POS_COL,
    SNP_MLOG10P_COL,
];

const META_DTYPES: [DataType; 5] = [
    DataType::String,
    DataType::UInt32,
    DataType::UInt32,
    DataType::UInt32,
    DataType::Float32,
];

/// Schema of the per-locus summary table: locus metadata plus the full
/// best-SNP record.
pub fn segments_schema() -> Schema {
    let mut schema = schema_from_arrays(&META_NAMES, &META_DTYPES);
    schema.merge(Cols::schema());
    schema
}

/// Schema of the expanded per-variant-in-locus table.
pub fn intervals_schema() -> Schema {
    let mut schema =
        schema_from_arrays(&[LOCUS_COL], &[DataType::String]);
    schema.merge(Cols::schema());
    schema
}

fn empty_outputs() -> (DataFrame, DataFrame) {
    (
        DataFrame::empty_with_schema(&segments_schema()),
        DataFrame::empty_with_schema(&intervals_schema()),
    )
}

/// Indices at which a sorted position vector breaks into separate runs.
///
/// A new run starts wherever the gap between consecutive positions exceeds
/// `hole_size`.
fn arg_split_runs(
    positions: &[PosType],
    hole_size: PosType,
) -> Vec<usize> {
    (1..positions.len())
        .filter(|&i| positions[i] - positions[i - 1] > hole_size)
        .collect()
}

/// First index attaining the maximum value. Deterministic tie-break: the
/// lowest-position row wins because the input is position-sorted.
fn argmax_first(values: &[EffectType]) -> Option<(usize, EffectType)> {
    values
        .iter()
        .enumerate()
        .fold(None, |acc, (idx, &v)| {
            match acc {
                Some((_, best)) if v <= best => acc,
                _ if v.is_nan() => acc,
                _ => Some((idx, v)),
            }
        })
}

/// Breaks one trait's summary statistics into genome-wide significant loci.
///
/// Returns the `(segments, intervals)` pair: one best-SNP summary row per
/// locus, and one row per variant falling inside any locus window. The
/// interval rows are re-filtered from the *original, unfiltered* input so
/// sub-threshold variants inside a significant window are kept for
/// downstream fine-mapping.
///
/// The function is pure and deterministic: identical input and thresholds
/// yield identical tables. Malformed input (missing required column) fails
/// fast with a schema error.
pub fn locus_breaker(
    batch: &SumstatBatch,
    config: &LocusBreakerConfig,
) -> anyhow::Result<(DataFrame, DataFrame)> {
    batch.require_columns(&[
        Cols::Chr,
        Cols::Pos,
        Cols::TraitId,
        Cols::Ea,
        Cols::Nea,
        Cols::Eaf,
        Cols::Beta,
        Cols::Se,
        Cols::Mlog10P,
    ])?;

    if batch.is_empty() {
        debug!("locus breaker input is empty");
        return Ok(empty_outputs());
    }

    let filtered = batch.clone().filter_mlog10p_gt(config.pvalue_limit)?;
    if filtered.is_empty() {
        debug!(
            "no rows above border threshold {}",
            config.pvalue_limit
        );
        return Ok(empty_outputs());
    }

    // Interval rows come from the unfiltered data, keyed by chromosome.
    let original_by_chr: HashMap<ChrType, SumstatBatch> =
        batch.partition_by_chr()?.into_iter().collect();

    let mut segment_frames: Vec<DataFrame> = Vec::new();
    let mut interval_frames: Vec<DataFrame> = Vec::new();

    for (chr, chr_batch) in filtered.partition_by_chr()? {
        let chr_batch = chr_batch.sort_by_position()?;
        let positions: Vec<PosType> =
            chr_batch.pos()?.into_no_null_iter().collect();
        let mlog10p: Vec<EffectType> = chr_batch
            .mlog10p()?
            .iter()
            .map(|v| v.unwrap_or(EffectType::NAN))
            .collect();

        let mut run_bounds = vec![0usize];
        run_bounds.extend(arg_split_runs(&positions, config.hole_size));
        run_bounds.push(positions.len());

        for window in run_bounds.windows(2) {
            let (run_start, run_end) = (window[0], window[1]);
            let run_mlog10p = &mlog10p[run_start..run_end];

            let Some((best_offset, best_value)) = argmax_first(run_mlog10p)
            else {
                continue;
            };
            if best_value <= config.pvalue_sig {
                continue;
            }

            let min_pos = positions[run_start];
            let max_pos = positions[run_end - 1];
            let window_start = min_pos.saturating_sub(config.flank).max(1);
            let window_end = max_pos.saturating_add(config.flank);
            let best_pos = positions[run_start + best_offset];
            let locus = format!("{}:{}:{}", chr, window_start, window_end);

            let best_row = chr_batch
                .data()
                .slice((run_start + best_offset) as i64, 1);
            segment_frames.push(
                best_row
                    .lazy()
                    .with_columns([
                        lit(locus.clone()).alias(LOCUS_COL),
                        lit(LiteralValue::UInt32(window_start))
                            .alias(WINDOW_START_COL),
                        lit(LiteralValue::UInt32(window_end))
                            .alias(WINDOW_END_COL),
                        lit(LiteralValue::UInt32(best_pos))
                            .alias(SNP_POS_COL),
                        lit(LiteralValue::Float32(best_value))
                            .alias(SNP_MLOG10P_COL),
                    ])
                    .select(ordered_cols(&segments_schema()))
                    .collect()?,
            );

            let expanded = original_by_chr
                .get(&chr)
                .expect("chromosome present in filtered but not original data")
                .clone()
                .filter_pos_between(window_start, window_end)?;
            interval_frames.push(
                expanded
                    .into_inner()
                    .lazy()
                    .with_column(lit(locus.clone()).alias(LOCUS_COL))
                    .select(ordered_cols(&intervals_schema()))
                    .collect()?,
            );
        }
    }

    if segment_frames.is_empty() {
        return Ok(empty_outputs());
    }

    let mut segments = accumulate(segment_frames)?;
    let mut intervals = accumulate(interval_frames)?;
    segments.rechunk_mut();
    intervals.rechunk_mut();
    Ok((segments, intervals))
}

fn ordered_cols(schema: &Schema) -> Vec<Expr> {
    schema.iter_names().map(|n| col(n.as_str())).collect()
}

fn accumulate(frames: Vec<DataFrame>) -> PolarsResult<DataFrame> {
    let mut iter = frames.into_iter();
    let first = iter.next().expect("accumulate called with no frames");
    iter.try_fold(first, |acc, next| acc.vstack(&next))
}
