pub use crate::catalog::{
    MemCatalog,
    SearchCriteria,
    TraitCatalog,
    TraitRecord,
};
pub use crate::data_structs::schema::{
    parse_attributes,
    Attribute,
    SumstatCols,
};
pub use crate::data_structs::typedef::{
    ChrType,
    EffectType,
    PosType,
    TraitId,
};
pub use crate::data_structs::{
    group_regions,
    group_snp_positions,
    Region,
    SumstatBatch,
};
pub use crate::error::GwasError;
pub use crate::export::{
    run_export,
    ExportConfig,
};
pub use crate::extract::{
    extract_full,
    extract_locus_break,
    extract_regions,
    extract_snp_list,
    run_strategy,
    ExtractionMode,
    ExtractionOutput,
};
pub use crate::io::{
    read_regions,
    read_snp_list,
    write_table,
    OutputFormat,
};
pub use crate::scheduler::{
    BatchScheduler,
    WorkItem,
};
pub use crate::store::{
    DimFilter,
    MemStore,
    MemStoreOpener,
    QueryFacade,
    StoreOpener,
    StoreQuery,
    VariantStore,
};
pub use crate::tools::locus::{
    locus_breaker,
    LocusBreakerConfig,
};
pub use crate::tools::postprocess::{
    derive_mlog10p,
    process,
    with_snpid,
};
pub use crate::utils::normalize_chrom;
