//! The trait metadata catalog contract.
//!
//! The backing document database is an external collaborator; the core only
//! needs a key/value search that returns trait records carrying a `data_id`
//! plus arbitrary searchable fields, and a way to tabulate the matches for
//! the per-invocation metadata summary.

use hashbrown::HashMap;
use itertools::Itertools;
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

use crate::data_structs::typedef::TraitId;
use crate::plsmallstr;

/// One catalog document: a trait identifier plus free-form metadata fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitRecord {
    pub data_id: TraitId,
    #[serde(flatten)]
    pub fields:  HashMap<String, Value>,
}

impl TraitRecord {
    pub fn new<S: Into<TraitId>>(data_id: S) -> Self {
        TraitRecord {
            data_id: data_id.into(),
            fields:  HashMap::new(),
        }
    }

    pub fn with_field<K: Into<String>, V: Into<Value>>(
        mut self,
        key: K,
        value: V,
    ) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    fn field_as_string(
        &self,
        key: &str,
    ) -> Option<String> {
        self.fields.get(key).map(value_to_string)
    }
}

/// Key/value search criteria. Matching is case-insensitive by default,
/// mirroring the metadata search of the source catalog.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub terms:          HashMap<String, Value>,
    pub case_sensitive: bool,
}

impl SearchCriteria {
    pub fn with_term<K: Into<String>, V: Into<Value>>(
        mut self,
        key: K,
        value: V,
    ) -> Self {
        self.terms.insert(key.into(), value.into());
        self
    }

    pub fn matches(
        &self,
        record: &TraitRecord,
    ) -> bool {
        self.terms.iter().all(|(key, wanted)| {
            let Some(actual) = record.fields.get(key)
            else {
                return false;
            };
            let (actual, wanted) =
                (value_to_string(actual), value_to_string(wanted));
            if self.case_sensitive {
                actual == wanted
            }
            else {
                actual.eq_ignore_ascii_case(&wanted)
            }
        })
    }
}

/// A searchable catalog of trait metadata records.
pub trait TraitCatalog {
    fn query(
        &self,
        criteria: &SearchCriteria,
    ) -> anyhow::Result<Vec<TraitRecord>>;
}

/// In-memory catalog, the reference/testing implementation.
#[derive(Debug, Clone, Default)]
pub struct MemCatalog {
    records: Vec<TraitRecord>,
}

impl MemCatalog {
    pub fn new(records: Vec<TraitRecord>) -> Self {
        MemCatalog { records }
    }
}

impl TraitCatalog for MemCatalog {
    fn query(
        &self,
        criteria: &SearchCriteria,
    ) -> anyhow::Result<Vec<TraitRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| criteria.matches(r))
            .cloned()
            .collect())
    }
}

/// Tabulates catalog matches into the metadata summary table.
///
/// `data_id` is always the first column; requested output fields follow in
/// order, with missing values left null.
pub fn records_to_df(
    output_fields: &[String],
    records: &[TraitRecord],
) -> PolarsResult<DataFrame> {
    let mut columns = vec![Series::new(
        plsmallstr!("data_id"),
        records.iter().map(|r| r.data_id.as_str()).collect_vec(),
    )];
    for field in output_fields {
        if field == "data_id" {
            continue;
        }
        let values = records
            .iter()
            .map(|r| r.field_as_string(field))
            .collect_vec();
        columns.push(Series::new(plsmallstr!(field.as_str()), values));
    }
    DataFrame::new(columns.into_iter().map(Column::from).collect())
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
