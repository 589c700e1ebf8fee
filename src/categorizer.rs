use crate::schema::{Category, FinancialTable};
use log::debug;

/// Keyword rules evaluated top to bottom; the first category with a matching keyword wins.
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Revenue, &["Revenue", "Income", "Sales", "Fee"]),
    (
        Category::Expenses,
        &[
            "Expense",
            "Cost",
            "Administrative",
            "Operating",
            "Interest",
            "Tax",
            "Depreciation",
        ],
    ),
    (
        Category::Assets,
        &[
            "Cash",
            "Account Receivable",
            "Inventory",
            "Asset",
            "Equipment",
            "Property",
        ],
    ),
    (
        Category::Liabilities,
        &["Account Payable", "Loan", "Liability", "Debt", "Payable"],
    ),
];

/// Case-insensitive substring match of an account name against [`CATEGORY_RULES`].
pub fn categorize(account_name: &str) -> Category {
    let name = account_name.to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|keyword| name.contains(&keyword.to_lowercase()))
        })
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// Assigns a category to every record of a freshly reconstructed table.
pub fn categorize_accounts(mut table: FinancialTable) -> FinancialTable {
    for record in &mut table.records {
        record.category = Some(categorize(&record.account_name));
    }

    debug!(
        "Categorized {} accounts: {}",
        table.records.len(),
        Category::ALL
            .iter()
            .map(|c| format!("{}={}", c, table.records_in(*c).count()))
            .collect::<Vec<_>>()
            .join(", ")
    );

    table
}
