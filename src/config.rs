use crate::error::{FinancialInsightsError, Result};
use crate::utils::parse_month_name;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable heuristics for the ingestion and metrics pipeline.
///
/// Every field has a default reproducing the layout of the monthly management workbook this
/// crate was built for (July-June fiscal year, 10 actual months, 2 forecast months).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PipelineConfig {
    #[schemars(
        description = "Worksheet to read. When absent, the first sheet of the workbook is used."
    )]
    pub sheet_name: Option<String>,

    #[schemars(
        description = "Name of the fiscal year's first month. The first row containing a cell equal to this token (case-sensitive, after trimming) is the header row."
    )]
    pub anchor_month: String,

    #[schemars(
        description = "Marker text of the informational fiscal-year row above the header. Its cells are captured as a caption only."
    )]
    pub fiscal_year_marker: String,

    #[schemars(
        description = "Account-name text meaning 'no value' in exported sheets. Rows with this name are skipped."
    )]
    pub missing_value_token: String,

    #[schemars(
        description = "If the first account name contains this text, the row is a section heading and is dropped."
    )]
    pub section_heading_marker: String,

    #[schemars(
        description = "Header labels that are summary columns rather than months (e.g. 'Total'). They are kept in the table but excluded from metrics, issues and forecasts."
    )]
    pub summary_labels: Vec<String>,

    #[schemars(
        description = "How many leading months hold recorded data. Months after these are forecast months."
    )]
    pub actual_months: usize,

    #[schemars(description = "Minimum number of actual months needed to produce a forecast.")]
    pub min_actual_months: usize,

    #[schemars(
        description = "Number of trailing months that must show strictly decreasing revenue to raise a Declining Revenue issue."
    )]
    pub declining_revenue_window: usize,

    #[schemars(
        description = "Expenses-to-revenue ratio above which a month raises a High Expense Ratio issue."
    )]
    pub expense_ratio_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sheet_name: None,
            anchor_month: "July".to_string(),
            fiscal_year_marker: "Financial Year".to_string(),
            missing_value_token: "nan".to_string(),
            section_heading_marker: "Financial Status".to_string(),
            summary_labels: vec!["Total".to_string()],
            actual_months: 10,
            min_actual_months: 3,
            declining_revenue_window: 3,
            expense_ratio_threshold: 0.8,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn with_sheet(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = Some(sheet_name.into());
        self
    }

    pub fn with_actual_months(mut self, actual_months: usize) -> Self {
        self.actual_months = actual_months;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if parse_month_name(&self.anchor_month).is_none() {
            return Err(FinancialInsightsError::InvalidConfig(format!(
                "anchor_month '{}' is not a month name",
                self.anchor_month
            )));
        }

        if self.anchor_month.trim() != self.anchor_month {
            return Err(FinancialInsightsError::InvalidConfig(
                "anchor_month must not have surrounding whitespace".to_string(),
            ));
        }

        if self.actual_months == 0 {
            return Err(FinancialInsightsError::InvalidConfig(
                "actual_months must be at least 1".to_string(),
            ));
        }

        if self.min_actual_months < 2 {
            return Err(FinancialInsightsError::InvalidConfig(format!(
                "min_actual_months {} is too small to fit a trend (need at least 2)",
                self.min_actual_months
            )));
        }

        if self.declining_revenue_window < 2 {
            return Err(FinancialInsightsError::InvalidConfig(format!(
                "declining_revenue_window {} must be at least 2",
                self.declining_revenue_window
            )));
        }

        if !self.expense_ratio_threshold.is_finite() || self.expense_ratio_threshold <= 0.0 {
            return Err(FinancialInsightsError::InvalidConfig(format!(
                "expense_ratio_threshold {} must be a positive number",
                self.expense_ratio_threshold
            )));
        }

        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PipelineConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
