//! Форматирование ячеек по типу колонки

use contracts::shared::data_row::CellValue;
use contracts::shared::page_config::ColumnType;
use std::collections::BTreeMap;

/// Текст для отсутствующего значения
pub const MISSING_VALUE: &str = "N/A";

const DEFAULT_BADGE_COLOR: &str = "informative";

#[derive(Debug, Clone, PartialEq)]
pub enum CellDisplay {
    Text(String),
    Badge { text: String, color: String },
    Missing,
}

impl CellDisplay {
    pub fn text(&self) -> &str {
        match self {
            CellDisplay::Text(text) | CellDisplay::Badge { text, .. } => text,
            CellDisplay::Missing => MISSING_VALUE,
        }
    }
}

pub fn format_cell(
    value: Option<&CellValue>,
    column_type: ColumnType,
    status_colors: &BTreeMap<String, String>,
) -> CellDisplay {
    let Some(value) = value.filter(|v| !v.is_blank()) else {
        return CellDisplay::Missing;
    };

    match column_type {
        ColumnType::Currency => match value.as_f64() {
            Some(amount) => CellDisplay::Text(format_money(amount)),
            None => CellDisplay::Text(value.as_plain_string()),
        },
        ColumnType::Badge => {
            let text = value.as_plain_string();
            CellDisplay::Badge {
                color: badge_color(&text, status_colors),
                text,
            }
        }
        // даты выводятся как есть
        ColumnType::Date
        | ColumnType::Text
        | ColumnType::Number
        | ColumnType::Select
        | ColumnType::Action => CellDisplay::Text(value.as_plain_string()),
    }
}

pub fn badge_color(status: &str, status_colors: &BTreeMap<String, String>) -> String {
    status_colors
        .get(status)
        .cloned()
        .unwrap_or_else(|| DEFAULT_BADGE_COLOR.to_string())
}

/// Сумма с двумя знаками и пробелом между разрядами: `1 234 567.89`
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_has_two_decimals_and_grouping() {
        assert_eq!(format_money(1234.567), "1 234.57");
        assert_eq!(format_money(1234567.89), "1 234 567.89");
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(-1234.5), "-1 234.50");
        assert_eq!(format_money(999.0), "999.00");
    }

    #[test]
    fn missing_values_fall_back_to_literal() {
        let colors = BTreeMap::new();
        assert_eq!(format_cell(None, ColumnType::Text, &colors), CellDisplay::Missing);
        assert_eq!(
            format_cell(Some(&CellValue::from("  ")), ColumnType::Text, &colors).text(),
            MISSING_VALUE
        );
    }

    #[test]
    fn currency_and_date_formatting() {
        let colors = BTreeMap::new();
        assert_eq!(
            format_cell(Some(&CellValue::Number(12500.0)), ColumnType::Currency, &colors),
            CellDisplay::Text("12 500.00".into())
        );
        assert_eq!(
            format_cell(Some(&CellValue::from("2024-01-05")), ColumnType::Date, &colors),
            CellDisplay::Text("2024-01-05".into())
        );
    }

    #[test]
    fn badge_color_comes_from_configuration() {
        let mut colors = BTreeMap::new();
        colors.insert("Open".to_string(), "brand".to_string());
        assert_eq!(
            format_cell(Some(&CellValue::from("Open")), ColumnType::Badge, &colors),
            CellDisplay::Badge {
                text: "Open".into(),
                color: "brand".into()
            }
        );
        assert_eq!(badge_color("Unknown", &colors), "informative");
    }
}
