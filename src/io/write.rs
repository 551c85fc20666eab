use std::fmt::Display;
use std::fs::File;
use std::io::{
    BufWriter,
    Write,
};
use std::path::PathBuf;
use std::str::FromStr;

use log::debug;
use polars::prelude::*;

/// Output formats for extracted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputFormat {
    Parquet,
    Csv,
    CsvGz,
}

impl OutputFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
            OutputFormat::CsvGz => "csv.gz",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parquet" => Ok(OutputFormat::Parquet),
            "csv" => Ok(OutputFormat::Csv),
            "csv.gz" | "csvgz" | "gz" => Ok(OutputFormat::CsvGz),
            other => anyhow::bail!("unsupported output format: {}", other),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Writes a table to `{prefix}.{ext}` and returns the written path.
///
/// Each scheduler task writes to a distinct, precomputed prefix, so no two
/// tasks ever target the same file.
pub fn write_table(
    df: &mut DataFrame,
    prefix: &str,
    format: OutputFormat,
) -> anyhow::Result<PathBuf> {
    let path = PathBuf::from(format!("{}.{}", prefix, format.extension()));
    debug!("writing {} rows to {}", df.height(), path.display());
    df.rechunk_mut();

    match format {
        OutputFormat::Parquet => {
            let file = File::create(&path)?;
            ParquetWriter::new(file).finish(df)?;
        },
        OutputFormat::Csv => {
            let file = File::create(&path)?;
            CsvWriter::new(BufWriter::new(file))
                .include_header(true)
                .finish(df)?;
        },
        OutputFormat::CsvGz => {
            // Render to memory first so the gzip trailer can be flushed
            // explicitly instead of relying on drop order.
            let mut buf = Vec::new();
            CsvWriter::new(&mut buf).include_header(true).finish(df)?;
            let file = File::create(&path)?;
            let mut encoder = flate2::write::GzEncoder::new(
                BufWriter::new(file),
                flate2::Compression::default(),
            );
            encoder.write_all(&buf)?;
            encoder.try_finish()?;
        },
    }

    Ok(path)
}
