//! # Row Cells
//!
//! Reading and writing single cells of a table row.
//!
//! Tables are hand-edited, so cells arrive as numbers, decorated strings
//! (`"$1,250.50"`, `"35%"`), blanks or nothing at all. Reads are lenient and
//! default to zero or the empty string; writes always produce strings.
//!
//! ```text
//! {"Costo de Compra": "$20.00"}   ──money──►    Money(2000)
//! {"Costo de Compra": 20}         ──money──►    Money(2000)
//! {}                              ──money──►    Money(0)
//! Money(2000)                     ──fmt_money─► "20.00"
//! 0.02                            ──fmt_quantity(4)─► "0.0200"
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};

use pantry_core::text::{parse_decimal, try_parse_decimal};
use pantry_core::Money;

/// One table row: column name → cell.
pub type Row = Map<String, Value>;

/// Decimal places used for stock levels and component quantities.
pub const QUANTITY_DP: u32 = 4;

/// Cell as trimmed text. Numbers and booleans are rendered, null is empty.
pub fn text(row: &Row, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Cell as a decimal; blank, missing or malformed is zero.
pub fn decimal(row: &Row, column: &str) -> Decimal {
    parse_decimal(&text(row, column))
}

/// Cell as a decimal, `None` when blank or malformed.
pub fn optional_decimal(row: &Row, column: &str) -> Option<Decimal> {
    let raw = text(row, column);
    if raw.is_empty() {
        return None;
    }
    try_parse_decimal(&raw)
}

/// Cell as money, rounded to the cent.
pub fn money(row: &Row, column: &str) -> Money {
    Money::from_decimal(decimal(row, column))
}

/// Money as a plain two-decimal string.
pub fn fmt_money(amount: Money) -> Value {
    fmt_decimal(amount.to_decimal(), 2)
}

/// Decimal as a string with exactly `dp` decimal places.
pub fn fmt_decimal(value: Decimal, dp: u32) -> Value {
    let mut value = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(dp);
    Value::String(value.to_string())
}

/// Quantity at [`QUANTITY_DP`] places.
pub fn fmt_quantity(value: Decimal) -> Value {
    fmt_decimal(value, QUANTITY_DP)
}

/// Decimal without trailing zeros.
pub fn fmt_plain(value: Decimal) -> Value {
    Value::String(value.normalize().to_string())
}

/// Builds a row from `(column, value)` pairs.
pub fn row_of<const N: usize>(cells: [(&str, Value); N]) -> Row {
    cells
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_text_cells() {
        let r = row(json!({"a": "  Flour ", "b": 12, "c": null, "d": true}));
        assert_eq!(text(&r, "a"), "Flour");
        assert_eq!(text(&r, "b"), "12");
        assert_eq!(text(&r, "c"), "");
        assert_eq!(text(&r, "d"), "true");
        assert_eq!(text(&r, "missing"), "");
    }

    #[test]
    fn test_numeric_cells_are_lenient() {
        let r = row(json!({"a": "$1,250.50", "b": 0.02, "c": "n/a", "d": "", "e": "35%"}));
        assert_eq!(decimal(&r, "a"), dec!(1250.50));
        assert_eq!(decimal(&r, "b"), dec!(0.02));
        assert_eq!(decimal(&r, "c"), Decimal::ZERO);
        assert_eq!(decimal(&r, "d"), Decimal::ZERO);
        assert_eq!(decimal(&r, "e"), dec!(35));
        assert_eq!(money(&r, "a").cents(), 125050);

        assert_eq!(optional_decimal(&r, "d"), None);
        assert_eq!(optional_decimal(&r, "c"), None);
        assert_eq!(optional_decimal(&r, "b"), Some(dec!(0.02)));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(fmt_money(Money::from_cents(2000)), json!("20.00"));
        assert_eq!(fmt_money(Money::from_cents(-5)), json!("-0.05"));
        assert_eq!(fmt_quantity(dec!(0.02)), json!("0.0200"));
        assert_eq!(fmt_quantity(dec!(1.23456)), json!("1.2346"));
        assert_eq!(fmt_decimal(dec!(35), 2), json!("35.00"));
        assert_eq!(fmt_plain(dec!(2.500)), json!("2.5"));
    }

    #[test]
    fn test_row_of() {
        let r = row_of([("Producto", json!("Cake")), ("Cantidad", json!("2"))]);
        assert_eq!(r.len(), 2);
        assert_eq!(text(&r, "Producto"), "Cake");
    }
}
