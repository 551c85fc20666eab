use log::warn;
use polars::prelude::*;

use crate::data_structs::schema::{
    Attribute,
    SumstatCols as Cols,
};
use crate::data_structs::SumstatBatch;
use crate::plsmallstr;
use crate::utils::log_pvalue_from_z;

/// Synthesized SNP identifier column, `"CHR:POS:EA:NEA"`.
pub const SNPID_COL: &str = "SNPID";

/// Derives `MLOG10P` from the BETA/SE z-score where it is not materialized.
///
/// `SE == 0` rows and rows whose tail probability underflows (huge |z|) are
/// kept with a NaN/inf value and surfaced as one counted warning rather
/// than failing the extraction.
pub fn derive_mlog10p(batch: SumstatBatch) -> anyhow::Result<SumstatBatch> {
    if batch.has_column(Cols::Mlog10P) {
        return Ok(batch);
    }
    batch.require_columns(&[Cols::Beta, Cols::Se])?;

    let mut degenerate = 0usize;
    let values: Float32Chunked = batch
        .beta()?
        .iter()
        .zip(batch.se()?.iter())
        .map(|pair| {
            match pair {
                (Some(beta), Some(se)) if se != 0.0 => {
                    let v =
                        log_pvalue_from_z((beta / se) as f64) as f32;
                    if !v.is_finite() {
                        degenerate += 1;
                    }
                    Some(v)
                },
                (Some(_), Some(_)) => {
                    degenerate += 1;
                    Some(f32::NAN)
                },
                _ => None,
            }
        })
        .collect();

    if degenerate > 0 {
        warn!(
            "MLOG10P derivation: {} row(s) with SE == 0 or non-finite result",
            degenerate
        );
    }

    let mut df = batch.into_inner();
    df.with_column(
        values
            .into_series()
            .with_name(plsmallstr!(Cols::Mlog10P.as_str())),
    )?;
    SumstatBatch::try_new(df)
}

/// Appends the synthesized `SNPID` column.
pub fn with_snpid(batch: SumstatBatch) -> anyhow::Result<SumstatBatch> {
    batch.require_columns(&[Cols::Chr, Cols::Pos, Cols::Ea, Cols::Nea])?;
    let df = batch
        .into_inner()
        .lazy()
        .with_column(
            concat_str(
                [
                    Cols::Chr.col(),
                    Cols::Pos.col(),
                    Cols::Ea.col(),
                    Cols::Nea.col(),
                ],
                ":",
                false,
            )
            .alias(SNPID_COL),
        )
        .collect()?;
    SumstatBatch::try_new(df)
}

/// Removes the trait-identity column; trait identity travels in the output
/// filename, not the row data.
pub fn drop_trait_id(batch: SumstatBatch) -> anyhow::Result<SumstatBatch> {
    if !batch.has_column(Cols::TraitId) {
        return Ok(batch);
    }
    let mut df = batch.into_inner();
    df.drop_in_place(Cols::TraitId.as_str())?;
    SumstatBatch::try_new(df)
}

/// Standard post-processing applied to every extraction result before it is
/// written: derive `MLOG10P` when requested but absent, synthesize `SNPID`
/// when requested, drop `TRAITID`.
pub fn process(
    batch: SumstatBatch,
    attrs: &[Attribute],
) -> anyhow::Result<SumstatBatch> {
    let mut batch = batch;
    if attrs.contains(&Attribute::Mlog10P) {
        batch = derive_mlog10p(batch)?;
    }
    if attrs.contains(&Attribute::Snpid) {
        batch = with_snpid(batch)?;
    }
    drop_trait_id(batch)
}
