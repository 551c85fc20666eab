//! Interchangeable extraction strategies.
//!
//! A single tagged [`ExtractionMode`] is chosen once per task and dispatched
//! through [`run_strategy`]; the variants never re-evaluate mid-task and
//! each handler stays independently testable.

pub mod full;
pub mod locus;
pub mod regions;
pub mod snplist;

use polars::prelude::DataFrame;

pub use full::extract_full;
pub use locus::extract_locus_break;
pub use regions::extract_regions;
pub use snplist::extract_snp_list;

use crate::data_structs::schema::Attribute;
use crate::data_structs::typedef::{
    ChrType,
    EffectType,
    PosType,
};
use crate::data_structs::{
    Region,
    SumstatBatch,
};
use crate::store::{
    QueryFacade,
    VariantStore,
};
use crate::tools::locus::LocusBreakerConfig;
use crate::tools::postprocess::process;

/// The closed set of extraction strategies.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum ExtractionMode {
    /// Full per-trait export with an optional `MLOG10P` threshold.
    Full { pvalue_thr: Option<EffectType> },
    /// Export bounded by a caller-supplied region list.
    Regions(Vec<Region>),
    /// Export restricted to an explicit variant list.
    SnpList(Vec<(ChrType, PosType)>),
    /// Genome-wide significant locus extraction.
    LocusBreak(LocusBreakerConfig),
}

impl ExtractionMode {
    pub const fn name(&self) -> &'static str {
        match self {
            ExtractionMode::Full { .. } => "full",
            ExtractionMode::Regions(_) => "regions",
            ExtractionMode::SnpList(_) => "snp-list",
            ExtractionMode::LocusBreak(_) => "locus-breaker",
        }
    }
}

/// Result of one extraction task.
pub enum ExtractionOutput {
    /// A single post-processed table.
    Table(SumstatBatch),
    /// The locus-breaker table pair.
    Loci {
        segments:  DataFrame,
        intervals: DataFrame,
    },
}

/// Runs one strategy for one trait against an already-open store.
///
/// Tabular strategies share the post-processing step (derived columns,
/// `TRAITID` drop); the locus strategy queries every stored attribute since
/// the clumping algorithm needs the full record.
pub fn run_strategy<S: VariantStore>(
    store: &S,
    trait_id: &str,
    mode: &ExtractionMode,
    attrs: &[Attribute],
    maf: Option<EffectType>,
) -> anyhow::Result<ExtractionOutput> {
    match mode {
        ExtractionMode::LocusBreak(config) => {
            let facade = QueryFacade::try_new(store, &Attribute::all_stored())?;
            let (segments, intervals) =
                extract_locus_break(&facade, trait_id, config, maf)?;
            Ok(ExtractionOutput::Loci {
                segments,
                intervals,
            })
        },
        ExtractionMode::Full { pvalue_thr } => {
            let facade = QueryFacade::try_new(store, attrs)?;
            let batch = extract_full(&facade, trait_id, *pvalue_thr)?;
            Ok(ExtractionOutput::Table(process(batch, attrs)?))
        },
        ExtractionMode::Regions(regions) => {
            let facade = QueryFacade::try_new(store, attrs)?;
            let batch = extract_regions(&facade, trait_id, regions)?;
            Ok(ExtractionOutput::Table(process(batch, attrs)?))
        },
        ExtractionMode::SnpList(snps) => {
            let facade = QueryFacade::try_new(store, attrs)?;
            let batch = extract_snp_list(&facade, trait_id, snps)?;
            Ok(ExtractionOutput::Table(process(batch, attrs)?))
        },
    }
}
