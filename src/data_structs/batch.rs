use itertools::Itertools;
use polars::prelude::*;

use super::schema::SumstatCols as Cols;
use super::typedef::{
    ChrType,
    EffectType,
    PosType,
};
use crate::error::GwasError;
use crate::plsmallstr;

/// A tabular slice of per-variant summary statistics.
///
/// Thin wrapper over a [`DataFrame`] whose columns are a subset of
/// [`SumstatCols`](super::schema::SumstatCols). Queries may project away
/// attributes, so not every batch carries every column; accessors fail with
/// a schema error when a required column is absent. A zero-row batch with
/// the expected schema is the canonical empty result, never `None`.
#[derive(Debug, Clone)]
pub struct SumstatBatch {
    data: DataFrame,
}

impl SumstatBatch {
    /// Wraps a DataFrame without validating its schema.
    ///
    /// # Safety
    ///
    /// The caller must guarantee the frame only holds summary-statistics
    /// columns with registry dtypes.
    #[inline(always)]
    pub unsafe fn new_unchecked(df: DataFrame) -> Self {
        SumstatBatch { data: df }
    }

    /// Wraps a DataFrame, checking that every known column carries its
    /// registry dtype.
    pub fn try_new(df: DataFrame) -> anyhow::Result<Self> {
        for column in df.get_columns() {
            let name = column.name().as_str();
            if !Cols::has_name(name) {
                continue;
            }
            let expected = schema_dtype(name);
            if column.dtype() != &expected {
                anyhow::bail!(
                    "column {} has dtype {}, expected {}",
                    name,
                    column.dtype(),
                    expected
                );
            }
        }
        Ok(SumstatBatch { data: df })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn try_from_columns(
        trait_id: &str,
        chr: Vec<ChrType>,
        pos: Vec<PosType>,
        ea: Vec<&str>,
        nea: Vec<&str>,
        eaf: Vec<EffectType>,
        beta: Vec<EffectType>,
        se: Vec<EffectType>,
        mlog10p: Option<Vec<EffectType>>,
    ) -> PolarsResult<Self> {
        assert!(
            [pos.len(), ea.len(), nea.len(), eaf.len(), beta.len(), se.len()]
                .iter()
                .all(|l| *l == chr.len()),
            "All input vectors must have the same length"
        );
        let height = chr.len();
        let mut columns = vec![
            Series::new(plsmallstr!(Cols::Chr.as_str()), chr),
            Series::new(plsmallstr!(Cols::Pos.as_str()), pos),
            Series::new(
                plsmallstr!(Cols::TraitId.as_str()),
                vec![trait_id; height],
            ),
            Series::new(plsmallstr!(Cols::Ea.as_str()), ea),
            Series::new(plsmallstr!(Cols::Nea.as_str()), nea),
            Series::new(plsmallstr!(Cols::Eaf.as_str()), eaf),
            Series::new(plsmallstr!(Cols::Beta.as_str()), beta),
            Series::new(plsmallstr!(Cols::Se.as_str()), se),
        ];
        if let Some(values) = mlog10p {
            columns.push(Series::new(plsmallstr!(Cols::Mlog10P.as_str()), values));
        }
        let df = DataFrame::from_iter(columns);
        Ok(unsafe { SumstatBatch::new_unchecked(df) })
    }

    /// Zero-row batch with the full declared schema.
    pub fn empty() -> Self {
        let df = DataFrame::from_iter(
            Cols::colnames().iter().map(|n| {
                Series::new_empty(plsmallstr!(*n), &schema_dtype(n))
            }),
        );
        unsafe { SumstatBatch::new_unchecked(df) }
    }

    // CONVERSION
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has_column(
        &self,
        col: Cols,
    ) -> bool {
        self.data.get_column_names_str().contains(&col.as_str())
    }

    /// Fails with [`GwasError::Schema`] unless every listed column is
    /// present.
    pub fn require_columns(
        &self,
        cols: &[Cols],
    ) -> Result<(), GwasError> {
        let missing = cols
            .iter()
            .filter(|c| !self.has_column(**c))
            .map(|c| c.as_str())
            .collect_vec();
        if missing.is_empty() {
            Ok(())
        }
        else {
            Err(GwasError::schema(missing))
        }
    }

    // COLUMN GETTERS
    pub fn chr(&self) -> PolarsResult<&UInt8Chunked> {
        self.data
            .column(Cols::Chr.as_str())?
            .as_materialized_series()
            .u8()
    }

    pub fn pos(&self) -> PolarsResult<&UInt32Chunked> {
        self.data
            .column(Cols::Pos.as_str())?
            .as_materialized_series()
            .u32()
    }

    pub fn mlog10p(&self) -> PolarsResult<&Float32Chunked> {
        self.data
            .column(Cols::Mlog10P.as_str())?
            .as_materialized_series()
            .f32()
    }

    pub fn beta(&self) -> PolarsResult<&Float32Chunked> {
        self.data
            .column(Cols::Beta.as_str())?
            .as_materialized_series()
            .f32()
    }

    pub fn se(&self) -> PolarsResult<&Float32Chunked> {
        self.data
            .column(Cols::Se.as_str())?
            .as_materialized_series()
            .f32()
    }

    // OPERATIONS
    /// Sorts by (CHR, POS) ascending. The sort is stable so equal positions
    /// keep their input order.
    pub fn sort_by_position(self) -> PolarsResult<Self> {
        let sorted = self.data.sort(
            [Cols::Chr.as_str(), Cols::Pos.as_str()],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;
        Ok(unsafe { SumstatBatch::new_unchecked(sorted) })
    }

    /// Splits into per-chromosome batches, ascending by chromosome.
    pub fn partition_by_chr(&self) -> anyhow::Result<Vec<(ChrType, Self)>> {
        self.require_columns(&[Cols::Chr])?;
        let parts = self
            .data
            .partition_by_stable([Cols::Chr.as_str()], true)?;
        let mut out = Vec::with_capacity(parts.len());
        for part in parts {
            let batch = unsafe { SumstatBatch::new_unchecked(part) };
            let chr = batch
                .chr()?
                .first()
                .ok_or_else(|| anyhow::anyhow!("empty chromosome partition"))?;
            out.push((chr, batch));
        }
        out.sort_by_key(|(chr, _)| *chr);
        Ok(out)
    }

    pub fn filter_mlog10p_gt(
        self,
        threshold: EffectType,
    ) -> anyhow::Result<Self> {
        self.require_columns(&[Cols::Mlog10P])?;
        let df = self
            .data
            .lazy()
            .filter(Cols::Mlog10P.col().gt(lit(threshold)))
            .collect()?;
        Ok(unsafe { SumstatBatch::new_unchecked(df) })
    }

    /// Keeps rows with `maf <= EAF <= 1 - maf`.
    pub fn filter_maf_band(
        self,
        maf: EffectType,
    ) -> anyhow::Result<Self> {
        self.require_columns(&[Cols::Eaf])?;
        let df = self
            .data
            .lazy()
            .filter(
                Cols::Eaf
                    .col()
                    .gt_eq(lit(maf))
                    .and(Cols::Eaf.col().lt_eq(lit(1.0 - maf))),
            )
            .collect()?;
        Ok(unsafe { SumstatBatch::new_unchecked(df) })
    }

    /// Keeps rows with `start <= POS <= end` (inclusive both ends).
    pub fn filter_pos_between(
        self,
        start: PosType,
        end: PosType,
    ) -> anyhow::Result<Self> {
        self.require_columns(&[Cols::Pos])?;
        let df = self
            .data
            .lazy()
            .filter(
                Cols::Pos
                    .col()
                    .gt_eq(lit(start))
                    .and(Cols::Pos.col().lt_eq(lit(end))),
            )
            .collect()?;
        Ok(unsafe { SumstatBatch::new_unchecked(df) })
    }

    pub fn vstack(
        &self,
        other: &Self,
    ) -> PolarsResult<Self> {
        let mut new = self.data.vstack(other.data())?;
        new.rechunk_mut();
        Ok(unsafe { SumstatBatch::new_unchecked(new) })
    }

    /// Concatenates batches in order. An empty input yields the declared
    /// empty schema.
    pub fn concat(batches: Vec<Self>) -> PolarsResult<Self> {
        let mut iter = batches.into_iter();
        let Some(first) = iter.next()
        else {
            return Ok(SumstatBatch::empty());
        };
        iter.try_fold(first, |acc, next| acc.vstack(&next))
    }
}

fn schema_dtype(name: &str) -> DataType {
    match name {
        "CHR" => Cols::Chr.dtype(),
        "POS" => Cols::Pos.dtype(),
        "TRAITID" => Cols::TraitId.dtype(),
        "EA" => Cols::Ea.dtype(),
        "NEA" => Cols::Nea.dtype(),
        "EAF" => Cols::Eaf.dtype(),
        "BETA" => Cols::Beta.dtype(),
        "SE" => Cols::Se.dtype(),
        "MLOG10P" => Cols::Mlog10P.dtype(),
        _ => unreachable!("unknown summary-statistics column"),
    }
}
