use crate::schema::{Category, FinancialTable, MetricsSeries, MonthMetrics};

impl MonthMetrics {
    pub fn from_totals(revenue: f64, expenses: f64) -> Self {
        let net_income = revenue - expenses;
        let profit_margin = if revenue != 0.0 {
            net_income / revenue * 100.0
        } else {
            0.0
        };

        Self {
            revenue,
            expenses,
            net_income,
            profit_margin,
        }
    }

    /// `expenses / revenue`, or `None` for a month without revenue.
    pub fn expense_ratio(&self) -> Option<f64> {
        if self.revenue != 0.0 {
            Some(self.expenses / self.revenue)
        } else {
            None
        }
    }
}

/// Sums Revenue and Expenses accounts per period, in column order.
///
/// Uncategorized records and the other categories do not contribute. A month with no revenue
/// accounts has revenue 0 and profit margin 0.
pub fn calculate_financial_metrics(table: &FinancialTable) -> MetricsSeries {
    let mut metrics = MetricsSeries::new();

    for label in table.period_labels() {
        let revenue: f64 = table
            .records_in(Category::Revenue)
            .map(|r| r.value(label))
            .sum();
        let expenses: f64 = table
            .records_in(Category::Expenses)
            .map(|r| r.value(label))
            .sum();

        metrics.insert(label, MonthMetrics::from_totals(revenue, expenses));
    }

    metrics
}
