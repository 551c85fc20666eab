use crate::data_structs::typedef::EffectType;
use crate::data_structs::SumstatBatch;
use crate::store::{
    DimFilter,
    QueryFacade,
    VariantStore,
};
use crate::tools::postprocess::derive_mlog10p;

/// Full summary-statistics export: one unconstrained query for the trait,
/// with an optional significance filter applied afterwards.
pub fn extract_full<S: VariantStore>(
    facade: &QueryFacade<S>,
    trait_id: &str,
    pvalue_thr: Option<EffectType>,
) -> anyhow::Result<SumstatBatch> {
    let batch = facade.slice(DimFilter::All, trait_id, DimFilter::All)?;
    match pvalue_thr {
        Some(thr) => derive_mlog10p(batch)?.filter_mlog10p_gt(thr),
        None => Ok(batch),
    }
}
