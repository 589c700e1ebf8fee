use anyhow::Context;
use monthly_financial_insights::*;
use std::env;

fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "MMC - Monthly Financial Data.xlsx".to_string());

    let config = match env::args().nth(2) {
        Some(config_path) => PipelineConfig::from_json_file(&config_path)
            .with_context(|| format!("Cannot load config {}", config_path))?,
        None => PipelineConfig::default().with_sheet("MMC"),
    };

    if path.ends_with(".xlsx") || path.ends_with(".xls") {
        if let Ok(sheets) = inspect_workbook(&path) {
            println!("Sheets ({}):", sheets.len());
            for sheet in &sheets {
                println!("  {} (rows={}, cols={})", sheet.name, sheet.rows, sheet.columns);
            }
        }
    }

    let mut cache = PipelineCache::new(config).context("Invalid pipeline config")?;
    let output = match cache.get_or_load(&path) {
        Ok(output) => output,
        Err(e) if e.is_no_data() => {
            println!("Failed to load financial data: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(caption) = &output.table.fiscal_year_caption {
        println!("\n{}", caption);
    }
    println!(
        "Loaded {} accounts across {} months",
        output.table.len(),
        output.metrics.len()
    );

    for (category, total) in category_totals(&output.table) {
        println!("  {:<12} {:>14.2}", category.as_str(), total);
    }

    if let Some((month, m)) = headline_month(&output.metrics) {
        println!("\nKey metrics ({})", month);
        println!("  Revenue:       ${:.0}", m.revenue);
        println!("  Expenses:      ${:.0}", m.expenses);
        println!("  Net Income:    ${:.0}", m.net_income);
        println!("  Profit Margin: {:.1}%", m.profit_margin);
    }

    if output.issues.is_empty() {
        println!("\nNo major financial issues identified");
    } else {
        println!("\n{} potential issues identified:", output.issues.len());
        for issue in &output.issues {
            println!(
                "  [{}] {}: {}",
                issue.severity, issue.issue_type, issue.description
            );
        }
    }

    if output.forecast.is_empty() {
        println!("\nInsufficient data for forecast");
    } else {
        println!("\nForecast");
        print!("{}", forecast_to_csv(&output.forecast)?);
    }

    println!("\nTop accounts by total:");
    for account in top_accounts(&output.table, 10) {
        println!("  {:<40} {:>14.0}", account.account_name, account.total);
    }

    Ok(())
}
