//! # gwaslocus
//!
//! `gwaslocus` is a Rust library for querying, extracting and clumping GWAS
//! summary statistics stored in a sparse three-dimensional array keyed by
//! chromosome, trait and basepair position. It grew out of the need to pull
//! per-trait association tables (and genome-wide significant loci) out of a
//! multi-study store without materializing whole studies in memory.
//!
//! The crate provides the core data model for summary-statistic batches
//! ([`SumstatBatch`] over a Polars DataFrame), a storage-agnostic query
//! facade ([`QueryFacade`] over the [`VariantStore`] trait), interchangeable
//! extraction strategies (full export, region-bounded, SNP-list,
//! locus-breaker clumping), a trait metadata catalog contract and a batched
//! fail-fast scheduler that drives one extraction task per trait.
//!
//! ## Key Features
//!
//! * **Typed data model**: chromosomes are `u8` codes in `[1, 24]` (`X` is
//!   23, `Y` is 24), positions are `u32`, effect statistics are `f32`;
//!   [`SumstatBatch`] enforces the column schema at construction.
//! * **Storage-agnostic queries**: [`VariantStore`] abstracts the backing
//!   array; [`DimFilter`] expresses point, range and set slices on the
//!   chromosome and position dimensions, and [`QueryFacade`] narrows
//!   requested attributes to what the store actually holds.
//! * **Locus breaker**: gap-based clumping of significant variants into
//!   loci with flanked windows, a deterministic best-SNP per locus and the
//!   full unfiltered interval records.
//! * **Post-processing**: `MLOG10P` derivation from `BETA`/`SE` under the
//!   standard normal, `SNPID` synthesis and `TRAITID` removal for tabular
//!   outputs.
//! * **Batched execution**: independent per-trait tasks run on a dedicated
//!   Rayon pool in fixed-size batches with a barrier between batches and
//!   fail-fast error propagation.
//! * **Table outputs**: Parquet, CSV and gzip-compressed CSV writers plus
//!   readers for region (BED-like) and SNP-list inputs with chromosome
//!   label normalization.
//!
//! Number of threads used by the shared pool can be configured with the
//! `GWAS_NUM_THREADS` environment variable.
//!
//! ## Structure
//!
//! * [`data_structs`]: the column registry, [`SumstatBatch`], genomic
//!   [`Region`] and the scalar type aliases.
//! * [`store`]: the [`VariantStore`] contract, dimension filters, the query
//!   facade and the in-memory reference store.
//! * [`extract`]: the extraction strategies and their dispatch.
//! * [`tools`]: the locus breaker and tabular post-processing.
//! * [`io`]: table writers and region/SNP-list input readers.
//! * [`catalog`]: the trait metadata catalog contract.
//! * [`scheduler`] and [`export`]: batched task execution and the
//!   end-to-end export pipeline.
//!
//! ## Usage
//!
//! ```no_run
//! use gwaslocus::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Any VariantStore works; MemStore is the in-memory reference.
//!     let store = MemStore::from_batch(SumstatBatch::empty())?;
//!     let facade =
//!         QueryFacade::try_new(&store, &[Attribute::Beta, Attribute::Se])?;
//!     let batch = facade.slice(DimFilter::Point(1), "trait-a", DimFilter::All)?;
//!     println!("{} variants", batch.len());
//!     Ok(())
//! }
//! ```
//!
//! ### Locus extraction
//!
//! ```no_run
//! use gwaslocus::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = MemStore::from_batch(SumstatBatch::empty())?;
//!     let config = LocusBreakerConfig::default()
//!         .with_pvalue_sig(7.3)
//!         .with_hole_size(250_000);
//!     let output = run_strategy(
//!         &store,
//!         "trait-a",
//!         &ExtractionMode::LocusBreak(config),
//!         &[],
//!         Some(0.01),
//!     )?;
//!     if let ExtractionOutput::Loci { segments, .. } = output {
//!         println!("{} loci", segments.height());
//!     }
//!     Ok(())
//! }
//! ```

#[ctor::ctor]
fn init() {
    if let Ok(n) = std::env::var("GWAS_NUM_THREADS") {
        std::env::set_var("POLARS_MAX_THREADS", n)
    }
}

pub mod catalog;
pub mod data_structs;
pub mod error;
pub mod export;
pub mod extract;
pub mod io;
pub mod prelude;
pub mod scheduler;
pub mod store;
pub mod tools;
pub mod utils;

#[allow(unused_imports)]
use prelude::*;
