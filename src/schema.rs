use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A single untyped spreadsheet cell, as read from the workbook with no header inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", tag = "kind", content = "value")]
pub enum Cell {
    Empty,
    Number(f64),
    /// Any text, including currency-formatted amounts like `"$1,200"` or `"(350.00)"`.
    Text(String),
}

impl Cell {
    /// Trimmed textual view of the cell. Used for header and account-name extraction,
    /// which must never go through numeric normalization. Whole numbers render without a
    /// fractional part (`4000.0` gives `"4000"`).
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.trim().to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(_) => false,
            Cell::Text(s) => s.trim().is_empty(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::from(value.as_str())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Rows of cells exactly as they appear in the sheet. Rows may differ in length.
pub type RawGrid = Vec<Vec<Cell>>;

/// Builds a [`RawGrid`] from string literals; empty strings become [`Cell::Empty`].
pub fn grid_from_strings<R, S>(rows: &[R]) -> RawGrid
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    rows.iter()
        .map(|row| row.as_ref().iter().map(|c| Cell::from(c.as_ref())).collect())
        .collect()
}

/// An ordered month-label mapping.
///
/// Iteration follows insertion order, which is the sheet's column order. Inserting a label that
/// already exists replaces its value but keeps its original position.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSeries<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for MonthSeries<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MonthSeries<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, label: impl Into<String>, value: T) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v))
    }
}

impl<T> FromIterator<(String, T)> for MonthSeries<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut series = MonthSeries::new();
        for (label, value) in iter {
            series.insert(label, value);
        }
        series
    }
}

impl<T: Serialize> Serialize for MonthSeries<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Category {
    Revenue,
    Expenses,
    Assets,
    Liabilities,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Revenue,
        Category::Expenses,
        Category::Assets,
        Category::Liabilities,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Revenue => "Revenue",
            Category::Expenses => "Expenses",
            Category::Assets => "Assets",
            Category::Liabilities => "Liabilities",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ledger line of the reconstructed table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountRecord {
    pub account_name: String,
    pub monthly_values: MonthSeries<f64>,
    /// Set by the categorizer; `None` straight out of the reconstructor.
    pub category: Option<Category>,
}

impl AccountRecord {
    pub fn new(account_name: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            monthly_values: MonthSeries::new(),
            category: None,
        }
    }

    /// Value for a month label, 0.0 when the label is unknown.
    pub fn value(&self, label: &str) -> f64 {
        self.monthly_values.get(label).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialTable {
    /// Every label from the anchor row, in column order. Encodes chronology.
    pub month_labels: Vec<String>,
    /// Labels among `month_labels` that are summary columns (e.g. `Total`) rather than months.
    pub summary_labels: Vec<String>,
    pub records: Vec<AccountRecord>,
    /// Text of the informational "Financial Year" row above the header, if any.
    pub fiscal_year_caption: Option<String>,
}

impl FinancialTable {
    /// Month labels with summary columns removed. Metrics, issues and the forecast run over these.
    pub fn period_labels(&self) -> Vec<&str> {
        self.month_labels
            .iter()
            .filter(|label| !self.summary_labels.contains(label))
            .map(String::as_str)
            .collect()
    }

    /// Total for one record: its summary column when the sheet has one, else the sum of periods.
    pub fn record_total(&self, record: &AccountRecord) -> f64 {
        match self.summary_labels.first() {
            Some(total_label) => record.value(total_label),
            None => self
                .period_labels()
                .iter()
                .map(|label| record.value(label))
                .sum(),
        }
    }

    pub fn records_in(&self, category: Category) -> impl Iterator<Item = &AccountRecord> {
        self.records
            .iter()
            .filter(move |r| r.category == Some(category))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthMetrics {
    pub revenue: f64,
    pub expenses: f64,
    pub net_income: f64,
    /// Percentage; 0 when revenue is exactly 0.
    pub profit_margin: f64,
}

pub type MetricsSeries = MonthSeries<MonthMetrics>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    #[serde(rename = "Negative Net Income")]
    NegativeNetIncome,
    #[serde(rename = "Declining Revenue")]
    DecliningRevenue,
    #[serde(rename = "High Expense Ratio")]
    HighExpenseRatio,
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IssueType::NegativeNetIncome => "Negative Net Income",
            IssueType::DecliningRevenue => "Declining Revenue",
            IssueType::HighExpenseRatio => "High Expense Ratio",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub description: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Projected revenue, floored at 0.
    pub revenue: f64,
    /// Projected expenses, floored at 0.
    pub expenses: f64,
    /// Difference of the projections before flooring; can be negative while both fields read 0.
    pub net_income: f64,
}

pub type ForecastSeries = MonthSeries<ForecastPoint>;
