//! The variant-store query contract and its in-memory reference backend.
//!
//! The physical array engine (creation, layout, compression) is an external
//! collaborator; this module only defines how the rest of the crate opens a
//! read-only handle and issues dimension/attribute-constrained reads.

pub mod mem;
pub mod query;

pub use mem::{
    MemStore,
    MemStoreOpener,
};
pub use query::{
    DimFilter,
    QueryFacade,
    StoreOpener,
    StoreQuery,
    VariantStore,
};
