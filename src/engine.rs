use crate::error::Result;
use crate::ingestion::{load_fx_table, load_nfa_table};
use crate::reconciler::convert_to_usd;
use crate::schema::{FxSourceSchema, NfaSourceSchema};
use crate::table::YearTable;
use log::{debug, info};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything the pipeline needs to build the datasets: the two source
/// paths and their layout descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub nfa_path: PathBuf,
    pub fx_path: PathBuf,
    pub nfa_schema: NfaSourceSchema,
    pub fx_schema: FxSourceSchema,
}

impl PipelineConfig {
    /// Config for the default source layouts.
    pub fn new(nfa_path: impl Into<PathBuf>, fx_path: impl Into<PathBuf>) -> Self {
        Self {
            nfa_path: nfa_path.into(),
            fx_path: fx_path.into(),
            nfa_schema: NfaSourceSchema::default(),
            fx_schema: FxSourceSchema::default(),
        }
    }
}

/// The whole-value artifact of a pipeline run. Immutable once built; the
/// year keys are shared by all three tables (the USD table's countries
/// are a subset of the NFA table's).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledData {
    pub nfa_local: YearTable,
    pub fx_rates: YearTable,
    pub nfa_usd: YearTable,
    pub years: Vec<String>,
}

/// Runs Loader -> Reconciler once and returns the three datasets.
///
/// Any loader failure aborts before reconciliation, so a partially built
/// triple is never observable.
pub fn build_datasets(config: &PipelineConfig) -> Result<ReconciledData> {
    let nfa_local = load_nfa_table(&config.nfa_path, &config.nfa_schema)?;
    let fx_rates = load_fx_table(&config.fx_path, &config.fx_schema)?;

    debug!(
        "Reconciling {} NFA rows against {} FX rows",
        nfa_local.len(),
        fx_rates.len()
    );
    let nfa_usd = convert_to_usd(&nfa_local, &fx_rates);

    let years = nfa_local.years().to_vec();
    info!(
        "Reconciled datasets ready: {} countries convertible across {} years",
        nfa_usd.len(),
        years.len()
    );

    Ok(ReconciledData {
        nfa_local,
        fx_rates,
        nfa_usd,
        years,
    })
}

/// Session-scoped handle over the pipeline result.
///
/// The first `datasets()` call builds; every later call returns the same
/// cached value without touching the sources again. A failed build leaves
/// nothing cached, so consumers see the error on every call until the
/// sources are fixed. Pass the context to consumers explicitly; there is
/// no process-global instance.
pub struct DataContext {
    config: PipelineConfig,
    built: OnceCell<ReconciledData>,
}

impl DataContext {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            built: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn is_built(&self) -> bool {
        self.built.get().is_some()
    }

    /// Builds at most once and returns the shared, read-only result.
    pub fn datasets(&self) -> Result<&ReconciledData> {
        self.built.get_or_try_init(|| build_datasets(&self.config))
    }

    /// Discards the cached result so the next `datasets()` call rebuilds
    /// from the source files.
    pub fn reset(&mut self) {
        self.built.take();
    }
}
