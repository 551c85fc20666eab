use hashbrown::HashMap;
use itertools::Itertools;

use super::typedef::{
    ChrType,
    PosType,
};

/// A half-open genomic interval `[start, end)` on one chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub chr:   ChrType,
    pub start: PosType,
    pub end:   PosType,
}

impl Region {
    /// Positions below 1 are outside the store domain and get clamped.
    pub fn new(
        chr: ChrType,
        start: PosType,
        end: PosType,
    ) -> Self {
        Region {
            chr,
            start: start.max(1),
            end,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chr, self.start, self.end)
    }
}

/// Groups regions per chromosome, preserving input order within each group.
pub fn group_regions(regions: &[Region]) -> Vec<(ChrType, Vec<Region>)> {
    let mut grouped: HashMap<ChrType, Vec<Region>> = HashMap::new();
    for region in regions {
        grouped.entry(region.chr).or_default().push(*region);
    }
    grouped
        .into_iter()
        .sorted_by_key(|(chr, _)| *chr)
        .collect()
}

/// Groups SNP positions per chromosome, deduplicated and sorted.
pub fn group_snp_positions(
    snps: &[(ChrType, PosType)]
) -> Vec<(ChrType, Vec<PosType>)> {
    let mut grouped: HashMap<ChrType, Vec<PosType>> = HashMap::new();
    for (chr, pos) in snps {
        grouped.entry(*chr).or_default().push(*pos);
    }
    grouped
        .into_iter()
        .map(|(chr, mut positions)| {
            positions.sort_unstable();
            positions.dedup();
            (chr, positions)
        })
        .sorted_by_key(|(chr, _)| *chr)
        .collect()
}
