use crate::error::{FinancialInsightsError, Result};
use crate::pipeline::PipelineOutput;
use crate::schema::{FinancialTable, ForecastSeries, MetricsSeries};
use std::io::Write;

/// Writes the table as CSV: `Account`, one column per month label, then `Category`.
pub fn write_table_csv<W: Write>(table: &FinancialTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["Account".to_string()];
    header.extend(table.month_labels.iter().cloned());
    header.push("Category".to_string());
    csv_writer.write_record(&header)?;

    for record in &table.records {
        let mut row = vec![record.account_name.clone()];
        row.extend(
            table
                .month_labels
                .iter()
                .map(|label| record.value(label).to_string()),
        );
        row.push(
            record
                .category
                .map(|c| c.to_string())
                .unwrap_or_default(),
        );
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn table_to_csv(table: &FinancialTable) -> Result<String> {
    let mut buffer = Vec::new();
    write_table_csv(table, &mut buffer)?;
    into_utf8(buffer)
}

pub fn metrics_to_csv(metrics: &MetricsSeries) -> Result<String> {
    let mut buffer = Vec::new();
    {
        let mut csv_writer = csv::Writer::from_writer(&mut buffer);
        csv_writer.write_record([
            "Month",
            "Revenue",
            "Expenses",
            "Net Income",
            "Profit Margin (%)",
        ])?;
        for (month, m) in metrics.iter() {
            csv_writer.write_record([
                month.to_string(),
                format!("{:.2}", m.revenue),
                format!("{:.2}", m.expenses),
                format!("{:.2}", m.net_income),
                format!("{:.2}", m.profit_margin),
            ])?;
        }
        csv_writer.flush()?;
    }
    into_utf8(buffer)
}

pub fn forecast_to_csv(forecast: &ForecastSeries) -> Result<String> {
    let mut buffer = Vec::new();
    {
        let mut csv_writer = csv::Writer::from_writer(&mut buffer);
        csv_writer.write_record([
            "Month",
            "Forecasted Revenue",
            "Forecasted Expenses",
            "Forecasted Net Income",
        ])?;
        for (month, point) in forecast.iter() {
            csv_writer.write_record([
                month.to_string(),
                format!("{:.2}", point.revenue),
                format!("{:.2}", point.expenses),
                format!("{:.2}", point.net_income),
            ])?;
        }
        csv_writer.flush()?;
    }
    into_utf8(buffer)
}

pub fn output_to_json(output: &PipelineOutput) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

fn into_utf8(buffer: Vec<u8>) -> Result<String> {
    String::from_utf8(buffer).map_err(|e| FinancialInsightsError::Export(e.to_string()))
}
