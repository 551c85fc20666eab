#![allow(dead_code)]

use gwaslocus::prelude::*;
use polars::prelude::*;

/// Six variants per trait over two chromosomes, with two well-separated
/// significant peaks on chromosome 1 and only sub-threshold signal on
/// chromosome 2.
pub fn demo_batch(trait_id: &str) -> SumstatBatch {
    SumstatBatch::try_from_columns(
        trait_id,
        vec![1, 1, 1, 1, 2, 2],
        vec![100, 150, 5_300_000, 5_300_050, 900, 1500],
        vec!["A", "C", "G", "T", "A", "C"],
        vec!["G", "T", "A", "C", "G", "T"],
        vec![0.10, 0.25, 0.40, 0.005, 0.30, 0.50],
        vec![0.5, -0.7, 1.1, 0.0, 0.2, 0.3],
        vec![0.1, 0.1, 0.1, 0.2, 0.1, 0.1],
        Some(vec![6.0, 7.0, 8.0, 4.0, 3.0, 2.0]),
    )
    .unwrap()
}

/// A store holding the demo data for every listed trait, `MLOG10P`
/// materialized.
pub fn demo_store(traits: &[&str]) -> MemStore {
    let batches = traits.iter().map(|t| demo_batch(t)).collect();
    let batch = SumstatBatch::concat(batches).unwrap();
    MemStore::from_batch(batch).unwrap()
}

/// Same data without a materialized `MLOG10P` column, for the derivation
/// path.
pub fn demo_store_raw(traits: &[&str]) -> MemStore {
    let batches: Vec<SumstatBatch> = traits
        .iter()
        .map(|t| {
            let mut df = demo_batch(t).into_inner();
            df.drop_in_place("MLOG10P").unwrap();
            SumstatBatch::try_new(df).unwrap()
        })
        .collect();
    let batch = SumstatBatch::concat(batches).unwrap();
    MemStore::from_batch(batch).unwrap()
}
