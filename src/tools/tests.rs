use assert_approx_eq::assert_approx_eq;
use polars::prelude::*;
use rstest::{
    fixture,
    rstest,
};

use super::locus::*;
use super::postprocess::*;
use crate::data_structs::schema::SumstatCols as Cols;
use crate::data_structs::SumstatBatch;
use crate::prelude::*;

fn batch_with_mlog10p(
    chr: Vec<u8>,
    pos: Vec<u32>,
    mlog10p: Vec<f32>,
) -> SumstatBatch {
    let n = chr.len();
    SumstatBatch::try_from_columns(
        "height",
        chr,
        pos,
        vec!["A"; n],
        vec!["G"; n],
        vec![0.3; n],
        vec![0.5; n],
        vec![0.1; n],
        Some(mlog10p),
    )
    .unwrap()
}

fn u32_col(
    df: &DataFrame,
    name: &str,
) -> Vec<u32> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .u32()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

fn f32_col(
    df: &DataFrame,
    name: &str,
) -> Vec<f32> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f32()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

fn str_col(
    df: &DataFrame,
    name: &str,
) -> Vec<String> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_no_null_iter()
        .map(String::from)
        .collect()
}

mod locus_tests {
    use super::*;

    #[fixture]
    fn two_peak_batch() -> SumstatBatch {
        batch_with_mlog10p(
            vec![1, 1, 1, 1],
            vec![100, 150, 5_300_000, 5_300_050],
            vec![6.0, 7.0, 8.0, 4.0],
        )
    }

    #[rstest]
    fn gap_splits_into_two_loci(two_peak_batch: SumstatBatch) {
        let config = LocusBreakerConfig::default();
        let (segments, intervals) =
            locus_breaker(&two_peak_batch, &config).unwrap();

        assert_eq!(segments.height(), 2);
        assert_eq!(u32_col(&segments, SNP_POS_COL), vec![150, 5_300_000]);
        assert_eq!(f32_col(&segments, SNP_MLOG10P_COL), vec![7.0, 8.0]);
        // first window clamps at position 1, both get the 100 kb flank
        assert_eq!(u32_col(&segments, WINDOW_START_COL), vec![1, 5_200_000]);
        assert_eq!(u32_col(&segments, WINDOW_END_COL), vec![
            100_150, 5_400_050
        ]);
        assert_eq!(str_col(&segments, LOCUS_COL), vec![
            "1:1:100150",
            "1:5200000:5400050"
        ]);
        // every input row falls in some window
        assert_eq!(intervals.height(), 4);
    }

    #[rstest]
    fn intervals_keep_subthreshold_rows(two_peak_batch: SumstatBatch) {
        // one row below the border threshold, inside the first window
        let extra = batch_with_mlog10p(vec![1], vec![200], vec![2.0]);
        let batch = two_peak_batch.vstack(&extra).unwrap();

        let (segments, intervals) =
            locus_breaker(&batch, &LocusBreakerConfig::default()).unwrap();
        assert_eq!(segments.height(), 2);
        assert_eq!(intervals.height(), 5);

        let loci = str_col(&intervals, LOCUS_COL);
        assert_eq!(
            loci.iter().filter(|l| *l == "1:1:100150").count(),
            3
        );
    }

    #[rstest]
    fn insignificant_runs_produce_nothing(two_peak_batch: SumstatBatch) {
        let config = LocusBreakerConfig::default().with_pvalue_sig(10.0);
        let (segments, intervals) =
            locus_breaker(&two_peak_batch, &config).unwrap();
        assert_eq!(segments.height(), 0);
        assert_eq!(intervals.height(), 0);
        assert_eq!(&segments.schema(), &segments_schema());
        assert_eq!(&intervals.schema(), &intervals_schema());
    }

    #[test]
    fn empty_input_yields_empty_tables() {
        let (segments, intervals) = locus_breaker(
            &SumstatBatch::empty(),
            &LocusBreakerConfig::default(),
        )
        .unwrap();
        assert_eq!(segments.height(), 0);
        assert_eq!(&segments.schema(), &segments_schema());
        assert_eq!(intervals.height(), 0);
    }

    #[test]
    fn all_rows_below_border_yield_empty_tables() {
        let batch =
            batch_with_mlog10p(vec![1, 1], vec![100, 200], vec![1.0, 2.0]);
        let (segments, _) =
            locus_breaker(&batch, &LocusBreakerConfig::default()).unwrap();
        assert_eq!(segments.height(), 0);
    }

    #[rstest]
    fn huge_hole_size_merges_everything(two_peak_batch: SumstatBatch) {
        let config = LocusBreakerConfig::default().with_hole_size(10_000_000);
        let (segments, _) = locus_breaker(&two_peak_batch, &config).unwrap();
        assert_eq!(segments.height(), 1);
        assert_eq!(u32_col(&segments, SNP_POS_COL), vec![5_300_000]);
        assert_eq!(u32_col(&segments, WINDOW_START_COL), vec![1]);
        assert_eq!(u32_col(&segments, WINDOW_END_COL), vec![5_400_050]);
    }

    #[test]
    fn equal_peaks_pick_lowest_position() {
        let batch = batch_with_mlog10p(
            vec![1, 1, 1],
            vec![1_000_000, 1_000_100, 1_000_200],
            vec![6.0, 8.0, 8.0],
        );
        let (segments, _) =
            locus_breaker(&batch, &LocusBreakerConfig::default()).unwrap();
        assert_eq!(u32_col(&segments, SNP_POS_COL), vec![1_000_100]);
    }

    #[test]
    fn loci_never_span_chromosomes() {
        // same positions on two chromosomes, well within one hole size
        let batch = batch_with_mlog10p(
            vec![1, 2],
            vec![1_000_000, 1_000_100],
            vec![8.0, 9.0],
        );
        let (segments, _) =
            locus_breaker(&batch, &LocusBreakerConfig::default()).unwrap();
        assert_eq!(segments.height(), 2);
        let loci = str_col(&segments, LOCUS_COL);
        assert!(loci[0].starts_with("1:"));
        assert!(loci[1].starts_with("2:"));
    }

    #[rstest]
    fn deterministic_across_calls(two_peak_batch: SumstatBatch) {
        let config = LocusBreakerConfig::default();
        let first = locus_breaker(&two_peak_batch, &config).unwrap();
        let second = locus_breaker(&two_peak_batch, &config).unwrap();
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }

    #[test]
    fn missing_column_fails_fast() {
        let batch = SumstatBatch::try_from_columns(
            "t",
            vec![1],
            vec![100],
            vec!["A"],
            vec!["G"],
            vec![0.3],
            vec![0.5],
            vec![0.1],
            None, // no MLOG10P
        )
        .unwrap();
        assert!(
            locus_breaker(&batch, &LocusBreakerConfig::default()).is_err()
        );
    }
}

mod postprocess_tests {
    use super::*;

    fn raw_batch() -> SumstatBatch {
        SumstatBatch::try_from_columns(
            "bmi",
            vec![1, 1],
            vec![100, 200],
            vec!["A", "C"],
            vec!["G", "T"],
            vec![0.2, 0.4],
            vec![2.0, 1.0],
            vec![1.0, 0.0],
            None,
        )
        .unwrap()
    }

    #[test]
    fn mlog10p_from_z_score() {
        let derived = derive_mlog10p(raw_batch()).unwrap();
        let values: Vec<Option<f32>> =
            derived.mlog10p().unwrap().iter().collect();
        // z = 2.0 under the standard normal
        assert_approx_eq!(values[0].unwrap(), 1.3418016, 1e-5);
        // SE == 0 rows are kept as NaN, not dropped
        assert!(values[1].unwrap().is_nan());
        assert_eq!(derived.len(), 2);
    }

    #[test]
    fn derivation_skipped_when_materialized() {
        let batch = batch_with_mlog10p(vec![1], vec![100], vec![42.0]);
        let derived = derive_mlog10p(batch).unwrap();
        assert_eq!(derived.mlog10p().unwrap().first(), Some(42.0));
    }

    #[test]
    fn snpid_concatenates_dimensions_and_alleles() {
        let with_id = with_snpid(raw_batch()).unwrap();
        assert_eq!(str_col(with_id.data(), SNPID_COL), vec![
            "1:100:A:G",
            "1:200:C:T"
        ]);
    }

    #[test]
    fn trait_id_dropped_from_output() {
        let processed =
            process(raw_batch(), &[Attribute::Beta, Attribute::Se]).unwrap();
        assert!(!processed.has_column(Cols::TraitId));
        assert!(!processed.has_column(Cols::Mlog10P));
    }

    #[test]
    fn process_honours_requested_attributes() {
        let attrs = [Attribute::Mlog10P, Attribute::Snpid];
        let processed = process(raw_batch(), &attrs).unwrap();
        assert!(processed.has_column(Cols::Mlog10P));
        assert!(!processed.has_column(Cols::TraitId));
        assert!(processed
            .data()
            .get_column_names_str()
            .contains(&SNPID_COL));
    }
}
