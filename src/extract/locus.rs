use polars::prelude::DataFrame;

use crate::data_structs::typedef::EffectType;
use crate::store::{
    DimFilter,
    QueryFacade,
    VariantStore,
};
use crate::tools::locus::{
    locus_breaker,
    LocusBreakerConfig,
};
use crate::tools::postprocess::derive_mlog10p;

/// Locus-breaker export: full query for the trait, optional MAF band
/// filter, `MLOG10P` derivation when not materialized, then clumping into
/// the `(segments, intervals)` table pair.
pub fn extract_locus_break<S: VariantStore>(
    facade: &QueryFacade<S>,
    trait_id: &str,
    config: &LocusBreakerConfig,
    maf: Option<EffectType>,
) -> anyhow::Result<(DataFrame, DataFrame)> {
    let mut batch = facade.slice(DimFilter::All, trait_id, DimFilter::All)?;
    if let Some(maf) = maf {
        batch = batch.filter_maf_band(maf)?;
    }
    let batch = derive_mlog10p(batch)?;
    locus_breaker(&batch, config)
}
