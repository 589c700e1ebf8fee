//! Cell normalization: turns spreadsheet cells in mixed encodings into numbers.
//!
//! Handles plain numbers, currency-formatted text (`"$1,200.00"`), accounting negatives
//! (`"(350)"`) and blanks. Text that is not numeric is reported as `None`; callers pick the
//! fallback.

use crate::schema::Cell;

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

/// Strips thousands separators and currency symbols, and rewrites accounting-style parentheses
/// as a leading minus. `"(1,234.50)"` becomes `"-1234.50"`.
pub fn clean_numeric_text(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != ',' && *c != ')' && !CURRENCY_SYMBOLS.contains(c))
        .map(|c| if c == '(' { '-' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parses already-stringified cell content. `None` when the text is not a finite number.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = clean_numeric_text(raw);
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalizes a cell to a float.
///
/// Empty and whitespace-only cells are `Some(0.0)`. Numbers pass through. Text goes through
/// [`parse_amount`] and yields `None` when it is not numeric.
pub fn normalize_cell(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) if !cell.is_blank() => parse_amount(s),
        _ => Some(0.0),
    }
}

/// [`normalize_cell`] with the reconstructor's fallback: anything unparseable is 0.0.
pub fn normalize_or_zero(cell: Option<&Cell>) -> f64 {
    let Some(cell) = cell else {
        return 0.0;
    };

    match normalize_cell(cell) {
        Some(value) => value,
        None => {
            log::trace!("Non-numeric cell {:?} treated as 0.0", cell);
            0.0
        }
    }
}
