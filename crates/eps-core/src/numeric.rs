//! 寬鬆數值解析
//!
//! 外部輸入（表單字串、JSON 數字）統一在邊界轉換：
//! - 接受 `.` 或 `,` 作為小數點
//! - 空白或無法解析的值回傳 [`NUMERIC_FALLBACK`]

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 空白或無效輸入的預設值
pub const NUMERIC_FALLBACK: f64 = 0.0;

/// 2^64，數量欄位的上界（不含）
const COUNT_CEILING: f64 = 18_446_744_073_709_551_616.0;

/// 寬鬆數值欄位（數字或字串）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    /// JSON 數字
    Number(f64),
    /// 表單字串，例如 `"12,5"`
    Text(String),
}

impl NumericField {
    /// 解析為 f64，無效時回傳 None
    pub fn parse(&self) -> Option<f64> {
        match self {
            NumericField::Number(value) if value.is_finite() => Some(*value),
            NumericField::Number(_) => None,
            NumericField::Text(raw) => parse_lenient(raw),
        }
    }

    /// 解析為 f64，無效時回傳指定預設值
    pub fn value_or(&self, fallback: f64) -> f64 {
        self.parse().unwrap_or(fallback)
    }

    /// 解析為 f64，無效時回傳 [`NUMERIC_FALLBACK`]
    pub fn value(&self) -> f64 {
        self.value_or(NUMERIC_FALLBACK)
    }

    /// 解析為 Decimal（字串直接轉換，避免經過 f64）
    pub fn parse_decimal(&self) -> Option<Decimal> {
        match self {
            NumericField::Number(value) => to_decimal(*value),
            NumericField::Text(raw) => {
                let normalized = normalize(raw)?;
                Decimal::from_str(&normalized)
                    .or_else(|_| Decimal::from_scientific(&normalized))
                    .ok()
            }
        }
    }

    /// 解析為非負整數數量（小數無條件進位，負值或超出 `u64` 範圍視為無效）
    pub fn parse_count(&self) -> Option<u64> {
        self.parse()
            .filter(|value| *value >= 0.0)
            .map(f64::ceil)
            .filter(|value| *value < COUNT_CEILING)
            .map(|value| value as u64)
    }

    /// 數值可解析為非負數但超出 `u64` 範圍
    pub fn exceeds_count_range(&self) -> bool {
        self.parse()
            .is_some_and(|value| value >= 0.0 && value.ceil() >= COUNT_CEILING)
    }
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        NumericField::Number(value)
    }
}

impl From<u64> for NumericField {
    fn from(value: u64) -> Self {
        NumericField::Number(value as f64)
    }
}

impl From<&str> for NumericField {
    fn from(value: &str) -> Self {
        NumericField::Text(value.to_string())
    }
}

/// 解析字串數值，接受 `.` 或 `,` 小數點
///
/// ```
/// use eps_core::numeric::parse_lenient;
/// assert_eq!(parse_lenient("12,5"), Some(12.5));
/// assert_eq!(parse_lenient("  "), None);
/// ```
pub fn parse_lenient(raw: &str) -> Option<f64> {
    normalize(raw)?
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// 解析字串數值，無效時回傳預設值
pub fn coerce(raw: &str, fallback: f64) -> f64 {
    parse_lenient(raw).unwrap_or(fallback)
}

/// f64 轉 Decimal
pub fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::try_from(value).ok()
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.replace(',', "."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("30", Some(30.0))]
    #[case("30.5", Some(30.5))]
    #[case("30,5", Some(30.5))]
    #[case(" 2,0 ", Some(2.0))]
    #[case("", None)]
    #[case("abc", None)]
    #[case("1,2,3", None)]
    fn test_parse_lenient(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_lenient(raw), expected);
    }

    #[test]
    fn test_coerce_fallback() {
        assert_eq!(coerce("", NUMERIC_FALLBACK), 0.0);
        assert_eq!(coerce("x", 16.0), 16.0);
        assert_eq!(coerce("44", 0.0), 44.0);
    }

    #[test]
    fn test_numeric_field_deserialize() {
        let number: NumericField = serde_json::from_str("12.5").unwrap();
        let text: NumericField = serde_json::from_str("\"12,5\"").unwrap();

        assert_eq!(number.value(), 12.5);
        assert_eq!(text.value(), 12.5);
        assert_eq!(NumericField::from("").value(), NUMERIC_FALLBACK);
    }

    #[test]
    fn test_parse_decimal_from_text() {
        let field = NumericField::from("0,0625");
        assert_eq!(field.parse_decimal(), Some(Decimal::new(625, 4)));
        assert_eq!(NumericField::from("-").parse_decimal(), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(NumericField::from(12.0).parse_count(), Some(12));
        assert_eq!(NumericField::from(12.5).parse_count(), Some(13));
        assert_eq!(NumericField::from(-3.0).parse_count(), None);
        assert_eq!(NumericField::from("abc").parse_count(), None);
    }

    #[rstest]
    #[case(NumericField::from(1e30))]
    #[case(NumericField::from("1e30"))]
    #[case(NumericField::from(18_446_744_073_709_551_616.0))]
    fn test_parse_count_beyond_u64_is_invalid(#[case] field: NumericField) {
        assert_eq!(field.parse_count(), None);
        assert!(field.exceeds_count_range());
    }
}
