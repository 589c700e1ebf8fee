use chrono::Month;
use monthly_financial_insights::*;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}_{}.csv", name, std::process::id()));
    let mut file = File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

/// A sheet shaped like the monthly management report: title rows, a fiscal-year caption, the
/// month header, a section heading, accounts with mixed encodings, and a trailing total column.
fn management_report_grid() -> RawGrid {
    let months = fiscal_month_labels(Month::July, 12);

    let mut header = vec![Cell::Empty, Cell::Empty];
    header.extend(months.iter().map(|m| Cell::from(m.as_str())));
    header.push(Cell::from("Total"));

    let revenue: Vec<f64> = (0..12).map(|i| 10_000.0 + 500.0 * i as f64).collect();
    let wages: Vec<f64> = (0..12).map(|_| 6_000.0).collect();
    let rent: Vec<f64> = (0..12).map(|_| 1_500.0).collect();

    let mut rows: RawGrid = vec![
        vec![Cell::Empty, Cell::from("Mering Management Corporation Pty Ltd")],
        vec![Cell::Empty, Cell::Empty, Cell::from("Financial Year 2025")],
        header,
        vec![Cell::Empty, Cell::from("Financial Status")],
    ];

    rows.push(account_row("Sales Revenue", &revenue, |v| {
        Cell::Text(format!("${}", format_thousands(v)))
    }));
    rows.push(account_row("Wages Expense", &wages, Cell::Number));
    rows.push(account_row("Rent Expense", &rent, |v| {
        Cell::Text(format_thousands(v))
    }));
    rows.push(vec![Cell::Empty, Cell::Empty]);
    rows.push(account_row("Cash at Bank", &[25_000.0; 12], Cell::Number));
    rows.push(account_row("Bank Loan", &[-40_000.0; 12], |v| {
        Cell::Text(format!("({})", format_thousands(-v)))
    }));
    rows.push(account_row("Retained Earnings", &[1_000.0; 12], Cell::Number));
    rows
}

fn account_row(name: &str, values: &[f64], encode: impl Fn(f64) -> Cell) -> Vec<Cell> {
    let mut row = vec![Cell::Empty, Cell::from(name)];
    row.extend(values.iter().map(|v| encode(*v)));
    row.push(Cell::Number(values.iter().sum()));
    row
}

fn format_thousands(value: f64) -> String {
    let whole = value.round() as i64;
    let digits = whole.abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if whole < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

#[test]
fn test_two_month_sheet_end_to_end() {
    let grid = grid_from_strings(&[
        vec!["", "", "July", "August"],
        vec!["", "Sales Revenue", "1,000", "(200)"],
    ]);

    let output = process_financial_grid(&grid, &PipelineConfig::default()).unwrap();

    assert_eq!(output.table.len(), 1);
    let record = &output.table.records[0];
    assert_eq!(record.account_name, "Sales Revenue");
    assert_eq!(record.monthly_values.get("July"), Some(&1000.0));
    assert_eq!(record.monthly_values.get("August"), Some(&-200.0));
    assert_eq!(record.category, Some(Category::Revenue));
    assert_eq!(output.metrics.get("July").unwrap().revenue, 1000.0);
    assert_eq!(output.metrics.get("August").unwrap().revenue, -200.0);
}

#[test]
fn test_management_report_reconstruction() {
    let output =
        process_financial_grid(&management_report_grid(), &PipelineConfig::default()).unwrap();
    let table = &output.table;

    assert_eq!(table.fiscal_year_caption.as_deref(), Some("Financial Year 2025"));
    assert_eq!(table.month_labels.len(), 13);
    assert_eq!(table.summary_labels, vec!["Total"]);
    assert_eq!(table.period_labels().len(), 12);

    let names: Vec<&str> = table.records.iter().map(|r| r.account_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Sales Revenue",
            "Wages Expense",
            "Rent Expense",
            "Cash at Bank",
            "Bank Loan",
            "Retained Earnings"
        ]
    );

    for record in &table.records {
        let keys: Vec<&str> = record.monthly_values.labels().collect();
        assert_eq!(keys, table.month_labels);
    }

    let loan = &table.records[4];
    assert_eq!(loan.category, Some(Category::Liabilities));
    assert_eq!(loan.value("July"), -40_000.0);
    assert_eq!(table.records[0].value("June"), 15_500.0);
}

#[test]
fn test_management_report_metrics_issues_and_forecast() {
    let output =
        process_financial_grid(&management_report_grid(), &PipelineConfig::default()).unwrap();

    let labels: Vec<&str> = output.metrics.labels().collect();
    assert_eq!(labels.first(), Some(&"July"));
    assert_eq!(labels.last(), Some(&"June"));
    assert!(!output.metrics.contains_key("Total"));

    let july = output.metrics.get("July").unwrap();
    assert_eq!(july.revenue, 10_000.0);
    assert_eq!(july.expenses, 7_500.0);
    assert_eq!(july.net_income, 2_500.0);
    assert!((july.profit_margin - 25.0).abs() < 1e-9);

    // July's ratio is 75%, August's 71.4%: nothing crosses 80%, revenue only grows.
    assert!(output.issues.is_empty());

    let forecast_months: Vec<&str> = output.forecast.labels().collect();
    assert_eq!(forecast_months, vec!["May", "June"]);
    let may = output.forecast.get("May").unwrap();
    assert!((may.revenue - 15_000.0).abs() < 1e-6);
    assert!((may.expenses - 7_500.0).abs() < 1e-6);
    assert!((may.net_income - 7_500.0).abs() < 1e-6);
}

#[test]
fn test_analysis_over_management_report() {
    let output =
        process_financial_grid(&management_report_grid(), &PipelineConfig::default()).unwrap();

    let (month, headline) = headline_month(&output.metrics).unwrap();
    assert_eq!(month, "April");
    assert_eq!(headline.revenue, 14_500.0);

    let totals = category_totals(&output.table);
    assert_eq!(totals[&Category::Expenses], 90_000.0);
    assert_eq!(totals[&Category::Other], 12_000.0);

    let top = top_accounts(&output.table, 3);
    let names: Vec<&str> = top.iter().map(|a| a.account_name.as_str()).collect();
    assert_eq!(names, vec!["Cash at Bank", "Sales Revenue", "Wages Expense"]);

    let trends = category_monthly_totals(&output.table);
    assert_eq!(trends[&Category::Expenses].get("July"), Some(&7_500.0));
}

#[test]
fn test_cash_flow_warnings() {
    let grid = grid_from_strings(&[
        vec!["", "", "July", "August", "September", "October"],
        vec!["", "Consulting Fees", "1,000", "950", "900", "800"],
        vec!["", "Cost of Goods Sold", "850", "500", "(100)", "900"],
    ]);

    let output = process_financial_grid(&grid, &PipelineConfig::default()).unwrap();
    let summary: Vec<(IssueType, Severity)> = output
        .issues
        .iter()
        .map(|i| (i.issue_type, i.severity))
        .collect();

    assert_eq!(
        summary,
        vec![
            (IssueType::NegativeNetIncome, Severity::High),
            (IssueType::DecliningRevenue, Severity::Medium),
            (IssueType::HighExpenseRatio, Severity::Medium),
            (IssueType::HighExpenseRatio, Severity::Medium),
        ]
    );
    assert_eq!(output.issues[0].description, "Negative net income in: October");
    assert_eq!(
        output.issues[2].description,
        "Expenses are 85.0% of revenue in July"
    );
    assert_eq!(
        output.issues[3].description,
        "Expenses are 112.5% of revenue in October"
    );
}

#[test]
fn test_no_anchor_means_no_data() {
    let grid = grid_from_strings(&[
        vec!["", "Account", "Q1", "Q2"],
        vec!["", "Sales", "1", "2"],
    ]);
    let err = process_financial_grid(&grid, &PipelineConfig::default()).unwrap_err();
    assert!(err.is_no_data());
}

#[test]
fn test_csv_file_through_cache() {
    let path = write_temp_csv(
        "ledger",
        concat!(
            "MMC,,,,\n",
            ",,Financial Year 2025,,\n",
            ",,July,August,September\n",
            ",Sales Revenue,\"$1,200\",\"$1,100\",\"$1,000\"\n",
            ",Admin Costs,400,,(50)\n",
        ),
    );

    let mut cache = PipelineCache::new(PipelineConfig::default()).unwrap();
    let first = cache.get_or_load(&path).unwrap();
    let second = cache.get_or_load(&path).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    assert_eq!(first.table.records[1].value("August"), 0.0);
    assert_eq!(first.table.records[1].value("September"), -50.0);
    assert_eq!(first.metrics.get("September").unwrap().net_income, 1_050.0);
    assert_eq!(first.issues.len(), 1);
    assert_eq!(first.issues[0].issue_type, IssueType::DecliningRevenue);

    cache.clear();
    assert!(cache.is_empty());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_cache_rejects_zero_decline_window() {
    let path = write_temp_csv("rising", ",,July,August\n,Sales Revenue,100,200\n");

    let config = PipelineConfig {
        declining_revenue_window: 0,
        ..Default::default()
    };
    let err = PipelineCache::new(config).unwrap_err();
    assert!(matches!(err, FinancialInsightsError::InvalidConfig(_)));

    let output = PipelineCache::new(PipelineConfig::default())
        .unwrap()
        .get_or_load(&path)
        .unwrap();
    assert!(output.issues.is_empty());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_workbook_sheet_through_processor() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("monthly_report.xlsx");

    let config = PipelineConfig::default().with_sheet("MMC");
    let output = process_financial_file(&path, &config).unwrap();

    assert_eq!(output.metrics.len(), 3);
    assert_eq!(output.metrics.get("August").unwrap().net_income, 1_750.0);
    let types: Vec<IssueType> = output.issues.iter().map(|i| i.issue_type).collect();
    assert_eq!(types, vec![IssueType::DecliningRevenue]);

    let err = process_financial_file(&path, &PipelineConfig::default().with_sheet("Budget"))
        .unwrap_err();
    assert!(err.is_no_data());
}

#[test]
fn test_exports() {
    let output =
        process_financial_grid(&management_report_grid(), &PipelineConfig::default()).unwrap();

    let csv = table_to_csv(&output.table).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.get(0), Some("Account"));
    assert_eq!(headers.get(1), Some("July"));
    assert_eq!(headers.get(headers.len() - 1), Some("Category"));
    assert_eq!(reader.records().count(), output.table.len());

    let metrics_csv = metrics_to_csv(&output.metrics).unwrap();
    assert_eq!(metrics_csv.lines().count(), 13);

    let forecast_csv = forecast_to_csv(&output.forecast).unwrap();
    assert!(forecast_csv.starts_with("Month,Forecasted Revenue"));

    let json = output_to_json(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metrics"]["July"]["revenue"], 10_000.0);
    assert_eq!(value["table"]["records"][0]["category"], "Revenue");
}

#[test]
fn test_repeated_runs_are_deterministic() {
    let grid = management_report_grid();
    let config = PipelineConfig::default();
    let a = run_pipeline(&grid, &config).unwrap();
    let b = run_pipeline(&grid, &config).unwrap();
    assert_eq!(a, b);
}
