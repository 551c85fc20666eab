//! The end-to-end export pipeline: catalog search, metadata summary table,
//! then one scheduled extraction task per matched trait.

use anyhow::Context;
use log::info;

use crate::catalog::{
    records_to_df,
    SearchCriteria,
    TraitCatalog,
};
use crate::data_structs::schema::Attribute;
use crate::data_structs::typedef::EffectType;
use crate::extract::{
    run_strategy,
    ExtractionMode,
    ExtractionOutput,
};
use crate::io::{
    write_table,
    OutputFormat,
};
use crate::scheduler::{
    BatchScheduler,
    WorkItem,
};
use crate::store::StoreOpener;
use crate::with_field_fn;

/// Everything one export run needs, fixed before the first task starts.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExportConfig {
    /// Attributes to materialize in tabular outputs.
    pub attrs:         Vec<Attribute>,
    /// Minor-allele-frequency band half-width, locus-breaker runs only.
    pub maf:           Option<EffectType>,
    /// Strategy applied to every matched trait.
    pub mode:          ExtractionMode,
    /// Per-trait output paths are `{output_prefix}_{trait}.{ext}`.
    pub output_prefix: String,
    pub output_format: OutputFormat,
    /// Catalog fields tabulated into the metadata summary.
    pub output_fields: Vec<String>,
    pub batch_size:    usize,
    /// `0` sizes the worker pool to the available cores.
    pub n_workers:     usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            attrs:         vec![Attribute::Beta, Attribute::Se, Attribute::Eaf],
            maf:           None,
            mode:          ExtractionMode::Full { pvalue_thr: None },
            output_prefix: "gwaslocus_out".to_string(),
            output_format: OutputFormat::Csv,
            output_fields: Vec::new(),
            batch_size:    4,
            n_workers:     0,
        }
    }
}

impl ExportConfig {
    with_field_fn!(with_attrs, attrs, Vec<Attribute>);

    with_field_fn!(with_maf, maf, Option<EffectType>);

    with_field_fn!(with_mode, mode, ExtractionMode);

    with_field_fn!(with_output_prefix, output_prefix, String);

    with_field_fn!(with_output_format, output_format, OutputFormat);

    with_field_fn!(with_output_fields, output_fields, Vec<String>);

    with_field_fn!(with_batch_size, batch_size, usize);

    with_field_fn!(with_n_workers, n_workers, usize);
}

/// Runs a full export: searches the catalog, writes the metadata summary
/// to `{output_prefix}_meta.csv`, then executes one extraction task per
/// matched trait through the batch scheduler.
///
/// An empty catalog match is an error; a run that extracts nothing is
/// almost always a mistyped search term.
pub fn run_export<O, C>(
    opener: &O,
    catalog: &C,
    criteria: &SearchCriteria,
    config: &ExportConfig,
) -> anyhow::Result<()>
where
    O: StoreOpener,
    C: TraitCatalog + ?Sized,
{
    let records = catalog.query(criteria)?;
    anyhow::ensure!(
        !records.is_empty(),
        "metadata search matched no traits"
    );
    info!(
        "metadata search matched {} trait(s); mode: {}",
        records.len(),
        config.mode.name()
    );

    let mut meta = records_to_df(&config.output_fields, &records)?;
    let meta_path = write_table(
        &mut meta,
        &format!("{}_meta", config.output_prefix),
        OutputFormat::Csv,
    )?;
    info!("metadata summary written to {}", meta_path.display());

    let items = records
        .into_iter()
        .map(|record| {
            WorkItem {
                trait_id: record.data_id,
                mode:     config.mode.clone(),
            }
        })
        .collect::<Vec<_>>();

    let scheduler = BatchScheduler::try_new(config.batch_size, config.n_workers)?;
    scheduler.run(&items, |item| run_task(opener, item, config))
}

fn run_task<O: StoreOpener>(
    opener: &O,
    item: &WorkItem,
    config: &ExportConfig,
) -> anyhow::Result<()> {
    let store = opener
        .open()
        .with_context(|| format!("opening store for trait {}", item.trait_id))?;
    let output = run_strategy(
        &store,
        &item.trait_id,
        &item.mode,
        &config.attrs,
        config.maf,
    )?;
    let prefix = format!("{}_{}", config.output_prefix, item.trait_id);

    match output {
        ExtractionOutput::Table(batch) => {
            let mut df = batch.into_inner();
            write_table(&mut df, &prefix, config.output_format)?;
        },
        ExtractionOutput::Loci {
            mut segments,
            mut intervals,
        } => {
            // Trait identity lives in the file name; the column would be
            // constant within each table.
            for df in [&mut segments, &mut intervals] {
                if df.get_column_names().iter().any(|n| n.as_str() == "TRAITID") {
                    df.drop_in_place("TRAITID")?;
                }
            }
            write_table(
                &mut segments,
                &format!("{}_segments", prefix),
                config.output_format,
            )?;
            write_table(
                &mut intervals,
                &format!("{}_intervals", prefix),
                config.output_format,
            )?;
        },
    }
    Ok(())
}
