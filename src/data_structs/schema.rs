use std::fmt::Display;
use std::str::FromStr;

use polars::prelude::*;

use crate::error::GwasError;
use crate::plsmallstr;
use crate::utils::schema_from_arrays;

/// Columns of a summary-statistics query result.
///
/// `Chr`, `Pos` and `TraitId` are the store dimensions; the rest are scalar
/// attributes. `Mlog10P` may be materialized in the store or derived in
/// post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SumstatCols {
    Chr,
    Pos,
    TraitId,
    Ea,
    Nea,
    Eaf,
    Beta,
    Se,
    Mlog10P,
}

impl SumstatCols {
    /// Returns the string representation of the column name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SumstatCols::Chr => "CHR",
            SumstatCols::Pos => "POS",
            SumstatCols::TraitId => "TRAITID",
            SumstatCols::Ea => "EA",
            SumstatCols::Nea => "NEA",
            SumstatCols::Eaf => "EAF",
            SumstatCols::Beta => "BETA",
            SumstatCols::Se => "SE",
            SumstatCols::Mlog10P => "MLOG10P",
        }
    }

    /// Returns the Polars DataType for the column.
    pub const fn dtype(&self) -> DataType {
        match self {
            SumstatCols::Chr => DataType::UInt8,
            SumstatCols::Pos => DataType::UInt32,
            SumstatCols::TraitId => DataType::String,
            SumstatCols::Ea => DataType::String,
            SumstatCols::Nea => DataType::String,
            SumstatCols::Eaf => DataType::Float32,
            SumstatCols::Beta => DataType::Float32,
            SumstatCols::Se => DataType::Float32,
            SumstatCols::Mlog10P => DataType::Float32,
        }
    }

    /// The store dimension columns, in store order.
    pub const fn dims() -> [SumstatCols; 3] {
        [SumstatCols::Chr, SumstatCols::TraitId, SumstatCols::Pos]
    }

    pub const fn colnames() -> [&'static str; 9] {
        [
            SumstatCols::Chr.as_str(),
            SumstatCols::Pos.as_str(),
            SumstatCols::TraitId.as_str(),
            SumstatCols::Ea.as_str(),
            SumstatCols::Nea.as_str(),
            SumstatCols::Eaf.as_str(),
            SumstatCols::Beta.as_str(),
            SumstatCols::Se.as_str(),
            SumstatCols::Mlog10P.as_str(),
        ]
    }

    /// Returns the full Polars Schema for a query result.
    pub fn schema() -> Schema {
        schema_from_arrays(&Self::colnames(), &[
            SumstatCols::Chr.dtype(),
            SumstatCols::Pos.dtype(),
            SumstatCols::TraitId.dtype(),
            SumstatCols::Ea.dtype(),
            SumstatCols::Nea.dtype(),
            SumstatCols::Eaf.dtype(),
            SumstatCols::Beta.dtype(),
            SumstatCols::Se.dtype(),
            SumstatCols::Mlog10P.dtype(),
        ])
    }

    pub fn has_name(name: &str) -> bool {
        Self::colnames().contains(&name)
    }

    /// Creates a Polars expression referencing this column.
    #[inline(always)]
    pub fn col(&self) -> Expr {
        col(self.as_str())
    }

    pub fn empty_series(&self) -> Series {
        Series::new_empty(plsmallstr!(self.as_str()), &self.dtype())
    }
}

/// The registry of attributes a caller may request from the store.
///
/// `Snpid` is accepted in requested attribute lists but is never queried:
/// it is synthesized from `CHR:POS:EA:NEA` during post-processing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Attribute {
    Beta,
    Se,
    Eaf,
    Ea,
    Nea,
    Mlog10P,
    Snpid,
}

impl Attribute {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Attribute::Beta => "BETA",
            Attribute::Se => "SE",
            Attribute::Eaf => "EAF",
            Attribute::Ea => "EA",
            Attribute::Nea => "NEA",
            Attribute::Mlog10P => "MLOG10P",
            Attribute::Snpid => "SNPID",
        }
    }

    /// Whether the attribute can be served by the store at all.
    pub const fn is_stored(&self) -> bool {
        !matches!(self, Attribute::Snpid)
    }

    /// Every attribute a store may materialize.
    pub const fn all_stored() -> [Attribute; 6] {
        [
            Attribute::Beta,
            Attribute::Se,
            Attribute::Eaf,
            Attribute::Ea,
            Attribute::Nea,
            Attribute::Mlog10P,
        ]
    }
}

impl FromStr for Attribute {
    type Err = GwasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BETA" => Ok(Attribute::Beta),
            "SE" => Ok(Attribute::Se),
            "EAF" => Ok(Attribute::Eaf),
            "EA" => Ok(Attribute::Ea),
            "NEA" => Ok(Attribute::Nea),
            "MLOG10P" => Ok(Attribute::Mlog10P),
            "SNPID" => Ok(Attribute::Snpid),
            other => Err(GwasError::UnknownAttribute(other.to_string())),
        }
    }
}

impl Display for Attribute {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses a comma-delimited attribute list against the registry.
///
/// Fails with [`GwasError::UnknownAttribute`] on the first name outside the
/// registry. Duplicates are collapsed, order of first occurrence is kept.
pub fn parse_attributes(attrs: &str) -> Result<Vec<Attribute>, GwasError> {
    let mut parsed = Vec::new();
    for name in attrs.split(',').filter(|s| !s.trim().is_empty()) {
        let attr = name.parse::<Attribute>()?;
        if !parsed.contains(&attr) {
            parsed.push(attr);
        }
    }
    Ok(parsed)
}
