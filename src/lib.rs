//! # Monthly Financial Insights
//!
//! A library for turning a semi-structured monthly financial spreadsheet into a clean account
//! table, monthly metrics, cash-flow warnings and a short-horizon forecast.
//!
//! ## Core Concepts
//!
//! - **Raw Grid**: The sheet read as untyped cells; no header inference by the reader
//! - **Anchor Row**: The header row, found by the fiscal year's first month name (e.g. "July")
//! - **Normalization**: Currency text, thousands separators and `(negative)` amounts become floats;
//!   blanks become 0.0
//! - **Categories**: Accounts are classified as Revenue, Expenses, Assets, Liabilities or Other by
//!   keyword rules
//! - **Metrics, Issues, Forecast**: Revenue/expenses per month, three cash-flow rules, and a linear
//!   trend projection over the months after the actual window
//!
//! ## Example
//!
//! ```rust
//! use monthly_financial_insights::*;
//!
//! let grid = grid_from_strings(&[
//!     vec!["", "", "July", "August"],
//!     vec!["", "Sales Revenue", "1,000", "(200)"],
//! ]);
//!
//! let output = process_financial_grid(&grid, &PipelineConfig::default()).unwrap();
//! assert_eq!(output.table.records[0].category, Some(Category::Revenue));
//! assert_eq!(output.metrics.get("August").unwrap().revenue, -200.0);
//! ```

pub mod analysis;
pub mod categorizer;
pub mod config;
pub mod error;
pub mod export;
pub mod forecast;
pub mod ingestion;
pub mod issues;
pub mod metrics;
pub mod normalizer;
pub mod pipeline;
pub mod schema;
pub mod utils;

pub use analysis::{
    category_monthly_totals, category_totals, headline_month, top_accounts, AccountTotal,
};
pub use categorizer::{categorize, categorize_accounts, CATEGORY_RULES};
pub use config::PipelineConfig;
pub use error::{FinancialInsightsError, Result};
pub use export::{
    forecast_to_csv, metrics_to_csv, output_to_json, table_to_csv, write_table_csv,
};
pub use forecast::{generate_forecast, split_actual_months};
pub use ingestion::{inspect_workbook, load_grid, read_csv_grid, reconstruct_table, SheetSummary};
pub use issues::identify_cash_flow_issues;
pub use metrics::calculate_financial_metrics;
pub use normalizer::{clean_numeric_text, normalize_cell, parse_amount};
pub use pipeline::{load_and_process, run_pipeline, PipelineCache, PipelineOutput};
pub use schema::*;
pub use utils::*;

use log::{debug, info};
use std::path::Path;

pub struct FinancialInsightsProcessor;

impl FinancialInsightsProcessor {
    pub fn process(grid: &RawGrid, config: &PipelineConfig) -> Result<PipelineOutput> {
        debug!(
            "Processing grid with {} rows, anchor month '{}'",
            grid.len(),
            config.anchor_month
        );

        run_pipeline(grid, config)
    }

    pub fn process_file(
        path: impl AsRef<Path>,
        config: &PipelineConfig,
    ) -> Result<PipelineOutput> {
        let path = path.as_ref();
        info!("Processing financial workbook: {}", path.display());

        load_and_process(path, config)
    }
}

pub fn process_financial_grid(grid: &RawGrid, config: &PipelineConfig) -> Result<PipelineOutput> {
    FinancialInsightsProcessor::process(grid, config)
}

pub fn process_financial_file(
    path: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<PipelineOutput> {
    FinancialInsightsProcessor::process_file(path, config)
}
