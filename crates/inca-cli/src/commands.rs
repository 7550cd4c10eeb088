use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::runtime::Runtime;
use tracing::{info, info_span};

use inca_db::{
    ColumnComparison, DEFAULT_COMPARE_COLUMNS, DbConfig, compare_columns, connect,
    fetch_column_values, insert_records, load_dump, write_comparison_tsv, write_dump,
};
use inca_ingest::{read_manifest, write_mapping_table};
use inca_map::CodeTable;
use inca_model::ImportRecord;
use inca_transform::SampleResolutions;

use inca_cli::import::{ImportInputs, PanelInputs, PanelTables, mapping_from_dump, run_import};
use inca_cli::types::ImportResult;

use crate::cli::{CompareArgs, GenerateMappingArgs, ImportArgs, LoadDumpArgs, PanelArgs, ResolveArgs};

pub fn run_import_command(args: &ImportArgs) -> Result<ImportResult> {
    let inputs = ImportInputs {
        reports: args.reports.clone(),
        field_map: args.field_map.clone(),
        panels: panel_inputs(&args.panels),
    };
    let progress = report_progress();
    let mut result = run_import(&inputs, &progress)?;

    if let Some(path) = &args.write {
        write_dump(path, &result.records).context("write dump")?;
        result.dump = Some(path.clone());
    }
    if args.db {
        let config_path = args
            .config
            .as_deref()
            .context("--db needs --config")?;
        let config = DbConfig::load(config_path)?;
        result.inserted = Some(insert(&config, &result.records)?);
    }
    Ok(result)
}

pub fn run_load_dump(args: &LoadDumpArgs) -> Result<u64> {
    let _span = info_span!("load_dump", dump = %args.dump.display()).entered();
    let records = load_dump(&args.dump)?;
    let config = DbConfig::load(&args.config)?;
    insert(&config, &records)
}

pub fn run_generate_mapping(args: &GenerateMappingArgs) -> Result<CodeTable> {
    let manifest = read_manifest(&args.manifest)
        .with_context(|| format!("load manifest {}", args.manifest.display()))?;
    let mapping = mapping_from_dump(&args.panel_dump, &manifest)?;
    write_mapping_table(&args.output, &mapping)
        .with_context(|| format!("write mapping {}", args.output.display()))?;
    info!(entries = mapping.len(), output = %args.output.display(), "mapping written");
    Ok(mapping)
}

pub fn run_resolve(args: &ResolveArgs) -> Result<SampleResolutions> {
    let tables = PanelTables::load(&panel_inputs(&args.panels))?;
    Ok(SampleResolutions::build(&tables.manifest, &tables.resolver)
        .with_curated_conditions(&tables.curated_conditions))
}

pub fn run_compare(args: &CompareArgs) -> Result<Vec<ColumnComparison>> {
    let dev = DbConfig::load(&args.config_dev)?;
    let prod = DbConfig::load(&args.config_prod)?;
    let runtime = runtime()?;
    let (dev_values, prod_values) = runtime.block_on(async {
        let dev_pool = connect(&dev).await?;
        let prod_pool = connect(&prod).await?;
        let dev_values =
            fetch_column_values(&dev_pool, &dev.table_ref()?, &DEFAULT_COMPARE_COLUMNS).await?;
        let prod_values =
            fetch_column_values(&prod_pool, &prod.table_ref()?, &DEFAULT_COMPARE_COLUMNS).await?;
        Ok::<_, inca_db::DbError>((dev_values, prod_values))
    })?;
    let comparisons = compare_columns(&dev_values, &prod_values, &DEFAULT_COMPARE_COLUMNS);
    write_comparison_tsv(&args.output, &comparisons)?;
    info!(output = %args.output.display(), "comparison written");
    Ok(comparisons)
}

fn insert(config: &DbConfig, records: &[ImportRecord]) -> Result<u64> {
    let table = config.table_ref()?;
    let runtime = runtime()?;
    let inserted = runtime.block_on(async {
        let pool = connect(config).await?;
        let inserted = insert_records(&pool, &table, records).await;
        pool.close().await;
        inserted
    })?;
    Ok(inserted)
}

fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")
}

fn panel_inputs(args: &PanelArgs) -> PanelInputs {
    PanelInputs {
        manifest: args.manifest.clone(),
        panel_dump: args.panel_dump.clone(),
        manual_overrides: args.manual_overrides.clone(),
        mapping: args.mapping.clone(),
    }
}

fn report_progress() -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}") {
        progress.set_style(style.progress_chars("=> "));
    }
    progress.enable_steady_tick(Duration::from_millis(120));
    progress
}
