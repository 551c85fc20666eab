//! Core data structures: the summary-statistics column registry, the
//! [`SumstatBatch`] wrapper over a polars `DataFrame`, genomic regions and
//! shared type aliases.

pub mod batch;
pub mod region;
pub mod schema;
pub mod typedef;


pub use batch::SumstatBatch;
pub use region::{
    group_regions,
    group_snp_positions,
    Region,
};
pub use schema::{
    parse_attributes,
    Attribute,
    SumstatCols,
};
