//! # Text Helpers
//!
//! Name normalization and lenient number parsing for values coming out of
//! hand-edited tables.
//!
//! ```text
//! "  Azúcar   Glass "  ──normalize_name──►  "azucar glass"
//! "$1,250.50"          ──parse_decimal───►  1250.50
//! "n/a"                ──parse_decimal───►  0
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;

/// Lowercases, trims, collapses internal whitespace, strips Latin accents
/// and drops every character outside `[a-z0-9 ]`.
pub fn normalize_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| {
            let c = fold_accent(c);
            (c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' ').then_some(c)
        })
        .collect()
}

/// Maps an accented Latin letter to its base letter.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Parses a possibly decorated number.
///
/// Strips `$`, `,`, `%` and whitespace before parsing. Blank or malformed
/// input yields zero.
pub fn parse_decimal(raw: &str) -> Decimal {
    try_parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

/// Like [`parse_decimal`] but reports malformed input as `None`.
///
/// Blank input is `Some(0)`.
pub fn try_parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Some(Decimal::ZERO);
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Splits a `;`-separated list, trimming and dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Azúcar   Glass "), "azucar glass");
        assert_eq!(normalize_name("Piña-Colada!"), "pinacolada");
        assert_eq!(normalize_name("CAFÉ 2x"), "cafe 2x");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_parse_decimal_strips_decorations() {
        assert_eq!(parse_decimal("$1,250.50"), dec!(1250.50));
        assert_eq!(parse_decimal(" 16 % "), dec!(16));
        assert_eq!(parse_decimal("0.0004"), dec!(0.0004));
        assert_eq!(parse_decimal("-3.5"), dec!(-3.5));
        assert_eq!(parse_decimal("1e3"), dec!(1000));
    }

    #[test]
    fn test_parse_decimal_defaults_to_zero() {
        assert_eq!(parse_decimal(""), Decimal::ZERO);
        assert_eq!(parse_decimal("n/a"), Decimal::ZERO);
        assert_eq!(try_parse_decimal("n/a"), None);
        assert_eq!(try_parse_decimal("  "), Some(Decimal::ZERO));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("Extra Cheese; Bacon ;;"), vec!["Extra Cheese", "Bacon"]);
        assert!(split_list("").is_empty());
    }
}
