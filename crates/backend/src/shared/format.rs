/// Размер ответа для журнала запросов: байты с разделителями тысяч (точками)
///
/// # Примеры
/// ```
/// use backend::shared::format::format_size;
/// assert_eq!(format_size(1234567), "1.234.567 B");
/// assert_eq!(format_size(0), "0 B");
/// ```
pub fn format_size(bytes: usize) -> String {
    let s = bytes.to_string();
    let mut grouped = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{} B", grouped.chars().rev().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(999), "999 B");
        assert_eq!(format_size(1000), "1.000 B");
        assert_eq!(format_size(48213), "48.213 B");
    }
}
