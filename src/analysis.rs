//! Summary calculations over a categorized table and its metrics: the headline month shown on
//! summary cards, category breakdowns and the largest accounts.

use crate::schema::{Category, FinancialTable, MetricsSeries, MonthMetrics, MonthSeries};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountTotal {
    pub account_name: String,
    pub category: Option<Category>,
    pub total: f64,
}

/// The latest actual month: third from last when there are at least three months (the last two
/// are forecast columns), otherwise the last one.
pub fn headline_month(metrics: &MetricsSeries) -> Option<(&str, &MonthMetrics)> {
    let months: Vec<(&str, &MonthMetrics)> = metrics.iter().collect();
    let idx = match months.len() {
        0 => return None,
        n if n >= 3 => n - 3,
        n => n - 1,
    };
    months.get(idx).copied()
}

/// Sum of record totals per category. Categories without accounts are omitted.
pub fn category_totals(table: &FinancialTable) -> BTreeMap<Category, f64> {
    let mut totals = BTreeMap::new();
    for record in &table.records {
        let category = record.category.unwrap_or(Category::Other);
        *totals.entry(category).or_insert(0.0) += table.record_total(record);
    }
    totals
}

/// Per category, the sum of every period's values.
pub fn category_monthly_totals(table: &FinancialTable) -> BTreeMap<Category, MonthSeries<f64>> {
    let periods = table.period_labels();
    let mut trends: BTreeMap<Category, MonthSeries<f64>> = BTreeMap::new();

    for record in &table.records {
        let category = record.category.unwrap_or(Category::Other);
        let series = trends.entry(category).or_default();
        for label in &periods {
            let running = series.get(label).copied().unwrap_or(0.0);
            series.insert(*label, running + record.value(label));
        }
    }

    trends
}

/// The `n` accounts with the largest totals, largest first.
pub fn top_accounts(table: &FinancialTable, n: usize) -> Vec<AccountTotal> {
    let mut totals: Vec<AccountTotal> = table
        .records
        .iter()
        .map(|record| AccountTotal {
            account_name: record.account_name.clone(),
            category: record.category,
            total: table.record_total(record),
        })
        .collect();

    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals.truncate(n);
    totals
}
