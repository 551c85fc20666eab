//! File input and output: region/SNP-list readers and the table writer.

pub mod input;
pub mod write;

pub use input::{
    read_regions,
    read_snp_list,
};
pub use write::{
    write_table,
    OutputFormat,
};
