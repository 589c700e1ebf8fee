use crate::config::PipelineConfig;
use crate::schema::{FinancialTable, Issue, IssueType, MetricsSeries, Severity};
use log::debug;

/// Evaluates the cash-flow rules over the metrics series.
///
/// Rules are independent and all applicable issues are returned, ordered as:
/// negative net income (one issue for all months), declining revenue, then one high expense
/// ratio issue per offending month in column order.
pub fn identify_cash_flow_issues(
    table: &FinancialTable,
    metrics: &MetricsSeries,
    config: &PipelineConfig,
) -> Vec<Issue> {
    let months: Vec<&str> = table
        .period_labels()
        .into_iter()
        .filter(|label| metrics.contains_key(label))
        .collect();

    let mut issues = Vec::new();
    issues.extend(negative_net_income(&months, metrics));
    issues.extend(declining_revenue(
        &months,
        metrics,
        config.declining_revenue_window,
    ));
    issues.extend(high_expense_ratios(
        &months,
        metrics,
        config.expense_ratio_threshold,
    ));

    debug!("Identified {} potential issues", issues.len());
    issues
}

fn negative_net_income(months: &[&str], metrics: &MetricsSeries) -> Option<Issue> {
    let negative: Vec<&str> = months
        .iter()
        .copied()
        .filter(|m| metrics.get(m).is_some_and(|mm| mm.net_income < 0.0))
        .collect();

    if negative.is_empty() {
        return None;
    }

    Some(Issue {
        issue_type: IssueType::NegativeNetIncome,
        description: format!("Negative net income in: {}", negative.join(", ")),
        severity: Severity::High,
    })
}

fn declining_revenue(months: &[&str], metrics: &MetricsSeries, window: usize) -> Option<Issue> {
    // A trend needs at least one pair of months.
    if window < 2 || months.len() < window {
        return None;
    }

    let revenues: Vec<f64> = months[months.len() - window..]
        .iter()
        .filter_map(|m| metrics.get(m).map(|mm| mm.revenue))
        .collect();

    let strictly_decreasing = revenues.windows(2).all(|pair| pair[0] > pair[1]);
    if !strictly_decreasing {
        return None;
    }

    Some(Issue {
        issue_type: IssueType::DecliningRevenue,
        description: format!("Revenue has been declining for the last {} months", window),
        severity: Severity::Medium,
    })
}

fn high_expense_ratios(months: &[&str], metrics: &MetricsSeries, threshold: f64) -> Vec<Issue> {
    months
        .iter()
        .filter_map(|m| {
            let ratio = metrics.get(m)?.expense_ratio()?;
            (ratio > threshold).then(|| Issue {
                issue_type: IssueType::HighExpenseRatio,
                description: format!("Expenses are {:.1}% of revenue in {}", ratio * 100.0, m),
                severity: Severity::Medium,
            })
        })
        .collect()
}
