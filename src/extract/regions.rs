use log::warn;

use crate::data_structs::{
    group_regions,
    Region,
    SumstatBatch,
};
use crate::store::{
    DimFilter,
    QueryFacade,
    VariantStore,
};

/// Region-bounded export.
///
/// Regions are grouped per chromosome and each chromosome is queried once
/// over the envelope `[min start, max end)` of its regions. Degenerate
/// regions (`end <= start`, an empty half-open interval) are skipped up
/// front so they can never widen the envelope or match a variant. Empty
/// per-chromosome slices are logged and skipped, never treated as errors;
/// the non-empty slices are concatenated in chromosome order.
pub fn extract_regions<S: VariantStore>(
    facade: &QueryFacade<S>,
    trait_id: &str,
    regions: &[Region],
) -> anyhow::Result<SumstatBatch> {
    let mut degenerate = 0usize;
    let regions: Vec<Region> = regions
        .iter()
        .copied()
        .filter(|r| {
            if r.end > r.start {
                true
            }
            else {
                degenerate += 1;
                false
            }
        })
        .collect();
    if degenerate > 0 {
        warn!(
            "trait {}: skipped {} empty region(s)",
            trait_id, degenerate
        );
    }

    let mut parts = Vec::new();
    for (chr, chr_regions) in group_regions(&regions) {
        let start = chr_regions.iter().map(|r| r.start).min().unwrap_or(1);
        let end = chr_regions.iter().map(|r| r.end).max().unwrap_or(1);
        // Regions are half-open, the position dimension filter is inclusive.
        let batch = facade.slice(
            DimFilter::Point(chr),
            trait_id,
            DimFilter::Range(start, end.saturating_sub(1).max(start)),
        )?;
        if batch.is_empty() {
            warn!(
                "trait {}: no variants on chromosome {} in {}..{}",
                trait_id, chr, start, end
            );
            continue;
        }
        parts.push(batch);
    }
    if parts.is_empty() {
        warn!("trait {}: all requested regions were empty", trait_id);
    }
    Ok(SumstatBatch::concat(parts)?)
}
