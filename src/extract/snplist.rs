use log::warn;

use crate::data_structs::typedef::{
    ChrType,
    PosType,
};
use crate::data_structs::{
    group_snp_positions,
    SumstatBatch,
};
use crate::store::{
    DimFilter,
    QueryFacade,
    VariantStore,
};

/// SNP-list export: one bounded-position query per chromosome using the
/// deduplicated set of requested positions, concatenated in chromosome
/// order.
pub fn extract_snp_list<S: VariantStore>(
    facade: &QueryFacade<S>,
    trait_id: &str,
    snps: &[(ChrType, PosType)],
) -> anyhow::Result<SumstatBatch> {
    let mut parts = Vec::new();
    for (chr, positions) in group_snp_positions(snps) {
        let batch = facade.slice(
            DimFilter::Point(chr),
            trait_id,
            DimFilter::Set(positions),
        )?;
        if batch.is_empty() {
            warn!(
                "trait {}: none of the requested SNPs found on chromosome {}",
                trait_id, chr
            );
            continue;
        }
        parts.push(batch);
    }
    Ok(SumstatBatch::concat(parts)?)
}
