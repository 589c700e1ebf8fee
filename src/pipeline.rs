use crate::categorizer::categorize_accounts;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::forecast::generate_forecast;
use crate::ingestion::{load_grid, reconstruct_table};
use crate::issues::identify_cash_flow_issues;
use crate::metrics::calculate_financial_metrics;
use crate::schema::{FinancialTable, ForecastSeries, Issue, MetricsSeries, RawGrid};
use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything the presentation layer consumes from one ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub table: FinancialTable,
    pub metrics: MetricsSeries,
    pub issues: Vec<Issue>,
    pub forecast: ForecastSeries,
}

/// Runs every stage over an in-memory grid: reconstruct, categorize, metrics, then issues and
/// forecast. Fails on an invalid config or when no table can be found.
pub fn run_pipeline(grid: &RawGrid, config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;

    let table = reconstruct_table(grid, config)?;
    let table = categorize_accounts(table);
    let metrics = calculate_financial_metrics(&table);
    let issues = identify_cash_flow_issues(&table, &metrics, config);
    let forecast = generate_forecast(&table, &metrics, config);

    info!(
        "Pipeline complete: {} accounts, {} months, {} issues, {} forecast months",
        table.len(),
        metrics.len(),
        issues.len(),
        forecast.len()
    );

    Ok(PipelineOutput {
        table,
        metrics,
        issues,
        forecast,
    })
}

/// Reads the input file and runs the pipeline over it. The config is checked before the file
/// is opened.
pub fn load_and_process(
    path: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<PipelineOutput> {
    config.validate()?;
    let grid = load_grid(path, config)?;
    run_pipeline(&grid, config)
}

/// Memoizes pipeline results per input file.
///
/// An entry is computed on first request and handed out unchanged afterwards until it is
/// invalidated. Failed runs are never stored.
#[derive(Debug, Default)]
pub struct PipelineCache {
    config: PipelineConfig,
    entries: HashMap<PathBuf, Arc<PipelineOutput>>,
}

impl PipelineCache {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            entries: HashMap::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn get(&self, key: impl AsRef<Path>) -> Option<Arc<PipelineOutput>> {
        self.entries.get(key.as_ref()).cloned()
    }

    pub fn get_or_load(&mut self, path: impl AsRef<Path>) -> Result<Arc<PipelineOutput>> {
        let path = path.as_ref();
        self.get_or_compute(path, |config| load_and_process(path, config))
    }

    /// Returns the cached output for `key`, running `compute` only on a miss.
    pub fn get_or_compute<F>(
        &mut self,
        key: impl AsRef<Path>,
        compute: F,
    ) -> Result<Arc<PipelineOutput>>
    where
        F: FnOnce(&PipelineConfig) -> Result<PipelineOutput>,
    {
        let key = key.as_ref();
        if let Some(hit) = self.entries.get(key) {
            debug!("Pipeline cache hit for {}", key.display());
            return Ok(Arc::clone(hit));
        }

        debug!("Pipeline cache miss for {}", key.display());
        let output = Arc::new(compute(&self.config)?);
        self.entries.insert(key.to_path_buf(), Arc::clone(&output));
        Ok(output)
    }

    /// Drops the entry for `key`. Returns whether one was present.
    pub fn invalidate(&mut self, key: impl AsRef<Path>) -> bool {
        self.entries.remove(key.as_ref()).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
