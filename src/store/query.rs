use log::debug;
use polars::prelude::*;

use crate::data_structs::schema::{
    Attribute,
    SumstatCols as Cols,
};
use crate::data_structs::typedef::{
    ChrType,
    PosType,
    TraitId,
};
use crate::data_structs::SumstatBatch;
use crate::error::GwasError;
use crate::plsmallstr;

/// Constraint on one store dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimFilter<T> {
    /// No constraint.
    All,
    /// A single coordinate.
    Point(T),
    /// An inclusive range.
    Range(T, T),
    /// An explicit coordinate set.
    Set(Vec<T>),
}

macro_rules! dim_filter_expr {
    ($ty: ty, $ca: ty) => {
        impl DimFilter<$ty> {
            /// Lowers the filter to a boolean expression over `column`, or
            /// `None` when unconstrained.
            pub fn to_expr(
                &self,
                column: Expr,
            ) -> Option<Expr> {
                match self {
                    DimFilter::All => None,
                    DimFilter::Point(v) => Some(column.eq(lit(*v))),
                    DimFilter::Range(lo, hi) => {
                        Some(
                            column
                                .clone()
                                .gt_eq(lit(*lo))
                                .and(column.lt_eq(lit(*hi))),
                        )
                    },
                    DimFilter::Set(values) => {
                        let set = <$ca>::from_vec(
                            plsmallstr!("__dim_set"),
                            values.clone(),
                        )
                        .into_series();
                        Some(column.is_in(lit(set)))
                    },
                }
            }
        }
    };
}

dim_filter_expr!(ChrType, UInt8Chunked);
dim_filter_expr!(PosType, UInt32Chunked);

/// A dimension- and attribute-constrained read request.
#[derive(Debug, Clone)]
pub struct StoreQuery {
    pub chr:      DimFilter<ChrType>,
    pub trait_id: Option<TraitId>,
    pub pos:      DimFilter<PosType>,
    /// Stored attributes to project, on top of the three dimensions.
    pub attrs:    Vec<Attribute>,
}

/// Read-only handle over the sparse (CHR, TRAITID, POS) variant array.
///
/// The storage engine itself (layout, compression, transactions) lives
/// outside this crate; implementations only need to answer constrained
/// scans. Implementations must represent an empty selection as a zero-row
/// frame with the projected schema.
pub trait VariantStore {
    /// Attributes materialized in the store.
    fn attributes(&self) -> Vec<Attribute>;

    fn scan(
        &self,
        query: &StoreQuery,
    ) -> anyhow::Result<DataFrame>;
}

/// Connection parameters for a [`VariantStore`].
///
/// Tasks never share a live store handle: each task carries an opener and
/// opens its own read-only handle.
pub trait StoreOpener: Send + Sync {
    type Store: VariantStore;

    fn open(&self) -> anyhow::Result<Self::Store>;
}

/// Attribute-validated view over a [`VariantStore`].
///
/// Holds the set of stored attributes every slice will project. Requested
/// attributes are validated against the registry before this type is built
/// (see [`parse_attributes`](crate::data_structs::parse_attributes)).
/// `MLOG10P` is the only attribute allowed to be absent from the store: it
/// is dropped from the projection and derived later in post-processing.
/// Any other non-materialized attribute fails construction, since nothing
/// downstream can reconstruct it.
#[derive(Debug)]
pub struct QueryFacade<'a, S: VariantStore> {
    store: &'a S,
    attrs: Vec<Attribute>,
}

impl<'a, S: VariantStore> QueryFacade<'a, S> {
    pub fn try_new(
        store: &'a S,
        requested: &[Attribute],
    ) -> Result<Self, GwasError> {
        let stored = store.attributes();
        let mut attrs = Vec::with_capacity(requested.len());
        for attr in requested.iter().copied().filter(|a| a.is_stored()) {
            if stored.contains(&attr) {
                attrs.push(attr);
            }
            else if attr == Attribute::Mlog10P {
                debug!("MLOG10P not materialized in store, will be derived");
            }
            else {
                return Err(GwasError::NotStored(attr.to_string()));
            }
        }
        Ok(QueryFacade { store, attrs })
    }

    /// The validated attribute projection.
    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    /// Issues one constrained read and normalizes it into a batch.
    pub fn slice(
        &self,
        chr: DimFilter<ChrType>,
        trait_id: &str,
        pos: DimFilter<PosType>,
    ) -> anyhow::Result<SumstatBatch> {
        let query = StoreQuery {
            chr,
            trait_id: Some(trait_id.to_string()),
            pos,
            attrs: self.attrs.clone(),
        };
        let df = self.store.scan(&query)?;
        SumstatBatch::try_new(df)
    }
}

/// Projection columns for a query: the three dimensions plus the requested
/// stored attributes.
pub(crate) fn projection(attrs: &[Attribute]) -> Vec<Expr> {
    let mut cols = vec![Cols::Chr.col(), Cols::Pos.col(), Cols::TraitId.col()];
    cols.extend(attrs.iter().filter(|a| a.is_stored()).map(|a| col(a.as_str())));
    cols
}
