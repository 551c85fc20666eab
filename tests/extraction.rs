mod common;

use common::{
    demo_batch,
    demo_store,
    demo_store_raw,
};
use gwaslocus::prelude::*;
use gwaslocus::tools::locus::{
    LOCUS_COL,
    SNP_POS_COL,
};
use rstest::rstest;

const ALL_TABULAR: [Attribute; 6] = [
    Attribute::Beta,
    Attribute::Se,
    Attribute::Eaf,
    Attribute::Ea,
    Attribute::Nea,
    Attribute::Mlog10P,
];

#[test]
fn full_export_applies_threshold() -> anyhow::Result<()> {
    let store = demo_store(&["t1"]);
    let output = run_strategy(
        &store,
        "t1",
        &ExtractionMode::Full {
            pvalue_thr: Some(5.0),
        },
        &ALL_TABULAR,
        None,
    )?;
    let ExtractionOutput::Table(batch) = output
    else {
        panic!("full mode must produce a table");
    };
    assert_eq!(batch.len(), 3);
    assert!(!batch.data().get_column_names_str().contains(&"TRAITID"));
    Ok(())
}

#[test]
fn full_export_derives_mlog10p_when_not_materialized() -> anyhow::Result<()> {
    let store = demo_store_raw(&["t1"]);
    let output = run_strategy(
        &store,
        "t1",
        &ExtractionMode::Full { pvalue_thr: None },
        &ALL_TABULAR,
        None,
    )?;
    let ExtractionOutput::Table(batch) = output
    else {
        panic!("full mode must produce a table");
    };
    assert_eq!(batch.len(), 6);
    assert!(batch.data().get_column_names_str().contains(&"MLOG10P"));
    // BETA 0.5 / SE 0.1 is z = 5, clearly significant
    let first = batch.mlog10p()?.first().unwrap();
    assert!(first > 5.0);
    Ok(())
}

#[rstest]
#[case::single_region(vec![Region::new(1, 100, 151)], 2)]
#[case::two_chromosomes(
    vec![Region::new(1, 100, 151), Region::new(2, 900, 901)],
    3
)]
#[case::empty_interval(vec![Region::new(1, 200, 300)], 0)]
#[case::degenerate_region(vec![Region::new(1, 150, 150)], 0)]
#[case::degenerate_mixed(
    vec![Region::new(1, 150, 150), Region::new(2, 900, 901)],
    1
)]
fn region_extraction(
    #[case] regions: Vec<Region>,
    #[case] expected: usize,
) -> anyhow::Result<()> {
    let store = demo_store(&["t1"]);
    let output = run_strategy(
        &store,
        "t1",
        &ExtractionMode::Regions(regions),
        &ALL_TABULAR,
        None,
    )?;
    let ExtractionOutput::Table(batch) = output
    else {
        panic!("region mode must produce a table");
    };
    assert_eq!(batch.len(), expected);
    Ok(())
}

#[test]
fn snp_list_extraction_skips_missing_variants() -> anyhow::Result<()> {
    let store = demo_store(&["t1"]);
    let snps = vec![(1, 150), (1, 150), (2, 900), (3, 5)];
    let output = run_strategy(
        &store,
        "t1",
        &ExtractionMode::SnpList(snps),
        &ALL_TABULAR,
        None,
    )?;
    let ExtractionOutput::Table(batch) = output
    else {
        panic!("snp-list mode must produce a table");
    };
    // duplicate and absent requests collapse to the two stored variants
    assert_eq!(batch.len(), 2);
    Ok(())
}

#[test]
fn locus_break_with_maf_filter() -> anyhow::Result<()> {
    let store = demo_store(&["t1"]);
    let output = run_strategy(
        &store,
        "t1",
        &ExtractionMode::LocusBreak(LocusBreakerConfig::default()),
        &[],
        Some(0.01),
    )?;
    let ExtractionOutput::Loci {
        segments,
        intervals,
    } = output
    else {
        panic!("locus mode must produce the table pair");
    };

    // the EAF 0.005 variant is gone before clumping, so the second peak is
    // a single-variant run
    assert_eq!(segments.height(), 2);
    let best: Vec<u32> = segments
        .column(SNP_POS_COL)?
        .as_materialized_series()
        .u32()?
        .into_no_null_iter()
        .collect();
    assert_eq!(best, vec![150, 5_300_000]);
    assert_eq!(intervals.height(), 3);
    assert!(intervals.get_column_names_str().contains(&LOCUS_COL));
    Ok(())
}

#[test]
fn locus_break_on_raw_store_derives_significance() -> anyhow::Result<()> {
    let store = demo_store_raw(&["t1"]);
    let output = run_strategy(
        &store,
        "t1",
        &ExtractionMode::LocusBreak(LocusBreakerConfig::default()),
        &[],
        None,
    )?;
    let ExtractionOutput::Loci { segments, .. } = output
    else {
        panic!("locus mode must produce the table pair");
    };
    // every demo z-score clears the default significance threshold except
    // the SE 0.2 variant, and the two chr1 runs stay separated
    assert_eq!(segments.height(), 2);
    Ok(())
}

#[test]
fn facade_narrows_to_materialized_attributes() {
    let store = demo_store_raw(&["t1"]);
    let facade = QueryFacade::try_new(&store, &[
        Attribute::Mlog10P,
        Attribute::Snpid,
        Attribute::Beta,
    ])
    .unwrap();
    // SNPID is synthesized and MLOG10P is not materialized here
    assert_eq!(facade.attrs(), &[Attribute::Beta]);
}

#[test]
fn missing_stored_attribute_is_an_error() {
    // only MLOG10P may be absent; anything else cannot be reconstructed
    let mut df = demo_batch("t1").into_inner();
    df.drop_in_place("BETA").unwrap();
    let store = MemStore::try_new(df).unwrap();

    let err = QueryFacade::try_new(&store, &[Attribute::Beta, Attribute::Eaf])
        .unwrap_err();
    assert!(matches!(err, GwasError::NotStored(name) if name == "BETA"));

    assert!(run_strategy(
        &store,
        "t1",
        &ExtractionMode::Full { pvalue_thr: None },
        &[Attribute::Beta],
        None,
    )
    .is_err());
}

#[test]
fn unknown_trait_yields_empty_batch() -> anyhow::Result<()> {
    let store = demo_store(&["t1"]);
    let facade = QueryFacade::try_new(&store, &ALL_TABULAR)?;
    let batch = facade.slice(DimFilter::All, "no-such-trait", DimFilter::All)?;
    assert!(batch.is_empty());
    assert!(batch.data().get_column_names_str().contains(&"CHR"));
    Ok(())
}
