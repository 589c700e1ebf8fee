use crate::config::PipelineConfig;
use crate::schema::{FinancialTable, ForecastPoint, ForecastSeries, MetricsSeries};
use crate::utils::linear_trend_slope;
use log::{debug, info};

/// Splits period labels positionally into (actual, forecast) months.
pub fn split_actual_months<'a>(
    labels: &[&'a str],
    actual_months: usize,
) -> (Vec<&'a str>, Vec<&'a str>) {
    let cut = actual_months.min(labels.len());
    (labels[..cut].to_vec(), labels[cut..].to_vec())
}

/// Projects revenue and expenses for the months after the actual window.
///
/// Each series gets its own least-squares slope over the actual months; projections extend from
/// the last actual value. Revenue and expenses are floored at 0 but `net_income` is taken from
/// the unfloored projections. Returns an empty series when there are fewer than
/// `config.min_actual_months` actual months.
pub fn generate_forecast(
    table: &FinancialTable,
    metrics: &MetricsSeries,
    config: &PipelineConfig,
) -> ForecastSeries {
    let labels: Vec<&str> = table
        .period_labels()
        .into_iter()
        .filter(|label| metrics.contains_key(label))
        .collect();
    let (actual, forecast_months) = split_actual_months(&labels, config.actual_months);

    let mut forecast = ForecastSeries::new();
    if actual.len() < config.min_actual_months {
        info!(
            "Insufficient data for forecast: {} actual months, need {}",
            actual.len(),
            config.min_actual_months
        );
        return forecast;
    }

    let revenues: Vec<f64> = actual
        .iter()
        .filter_map(|m| metrics.get(m).map(|mm| mm.revenue))
        .collect();
    let expenses: Vec<f64> = actual
        .iter()
        .filter_map(|m| metrics.get(m).map(|mm| mm.expenses))
        .collect();

    let (Some(revenue_slope), Some(expense_slope)) =
        (linear_trend_slope(&revenues), linear_trend_slope(&expenses))
    else {
        return forecast;
    };
    let last_revenue = revenues.last().copied().unwrap_or(0.0);
    let last_expenses = expenses.last().copied().unwrap_or(0.0);

    debug!(
        "Trend slopes over {} actual months: revenue {:.2}, expenses {:.2}",
        actual.len(),
        revenue_slope,
        expense_slope
    );

    for (i, month) in forecast_months.iter().enumerate() {
        let step = (i + 1) as f64;
        let projected_revenue = last_revenue + revenue_slope * step;
        let projected_expenses = last_expenses + expense_slope * step;

        forecast.insert(
            *month,
            ForecastPoint {
                revenue: projected_revenue.max(0.0),
                expenses: projected_expenses.max(0.0),
                net_income: projected_revenue - projected_expenses,
            },
        );
    }

    forecast
}
