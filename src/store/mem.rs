use polars::prelude::*;

use super::query::{
    projection,
    StoreOpener,
    StoreQuery,
    VariantStore,
};
use crate::data_structs::schema::{
    Attribute,
    SumstatCols as Cols,
};
use crate::data_structs::SumstatBatch;
use crate::error::GwasError;

/// In-memory, read-only variant store backed by a single `DataFrame`.
///
/// Reference backend for the query contract; production deployments plug in
/// an engine-backed [`VariantStore`] instead. Scans are plain lazy filters,
/// so concurrent reads from many tasks are safe.
#[derive(Debug, Clone)]
pub struct MemStore {
    data: DataFrame,
}

impl MemStore {
    pub fn try_new(df: DataFrame) -> anyhow::Result<Self> {
        let names = df.get_column_names_str();
        let missing = [Cols::Chr, Cols::Pos, Cols::TraitId]
            .iter()
            .filter(|c| !names.contains(&c.as_str()))
            .map(|c| c.as_str())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(GwasError::schema(missing).into());
        }
        Ok(MemStore { data: df })
    }

    pub fn from_batch(batch: SumstatBatch) -> anyhow::Result<Self> {
        Self::try_new(batch.into_inner())
    }
}

impl VariantStore for MemStore {
    fn attributes(&self) -> Vec<Attribute> {
        self.data
            .get_column_names_str()
            .into_iter()
            .filter_map(|name| name.parse::<Attribute>().ok())
            .collect()
    }

    fn scan(
        &self,
        query: &StoreQuery,
    ) -> anyhow::Result<DataFrame> {
        let mut lf = self.data.clone().lazy();
        if let Some(expr) = query.chr.to_expr(Cols::Chr.col()) {
            lf = lf.filter(expr);
        }
        if let Some(trait_id) = query.trait_id.as_deref() {
            lf = lf.filter(Cols::TraitId.col().eq(lit(trait_id)));
        }
        if let Some(expr) = query.pos.to_expr(Cols::Pos.col()) {
            lf = lf.filter(expr);
        }
        Ok(lf.select(projection(&query.attrs)).collect()?)
    }
}

/// Cheap, cloneable connection parameters for a [`MemStore`].
#[derive(Debug, Clone)]
pub struct MemStoreOpener {
    data: DataFrame,
}

impl MemStoreOpener {
    pub fn new(store: &MemStore) -> Self {
        MemStoreOpener {
            data: store.data.clone(),
        }
    }
}

impl StoreOpener for MemStoreOpener {
    type Store = MemStore;

    fn open(&self) -> anyhow::Result<MemStore> {
        MemStore::try_new(self.data.clone())
    }
}
