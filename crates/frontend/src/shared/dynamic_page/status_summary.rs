use contracts::shared::data_row::DataRow;
use contracts::shared::page_config::StatusSummary;

/// Карточка сводки по группе статуса
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCard {
    pub key: String,
    pub label: String,
    pub color: Option<String>,
    pub count: usize,
    pub total_amount: f64,
    pub over_threshold: bool,
}

/// Количество строк и сумма `amountKey` по каждой настроенной группе
pub fn summarize(rows: &[DataRow], summary: &StatusSummary) -> Vec<StatusCard> {
    summary
        .cards
        .iter()
        .map(|group| {
            let members = rows
                .iter()
                .filter(|row| row.text(&summary.group_key) == group.key);
            let (count, total_amount) = members.fold((0usize, 0.0f64), |(count, sum), row| {
                let amount = summary
                    .amount_key
                    .as_deref()
                    .and_then(|key| row.get(key))
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0);
                (count + 1, sum + amount)
            });
            StatusCard {
                key: group.key.clone(),
                label: group.display_label().to_string(),
                color: group.color.clone(),
                count,
                total_amount,
                over_threshold: group.threshold.map(|t| count > t).unwrap_or(false),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::data_row::CellValue;

    fn summary() -> StatusSummary {
        serde_json::from_value(serde_json::json!({
            "groupKey": "status",
            "amountKey": "totalAmount",
            "cards": [
                { "key": "Open", "threshold": 1 },
                { "key": "Completed", "label": "Done" }
            ]
        }))
        .unwrap()
    }

    fn row(status: &str, amount: f64) -> DataRow {
        DataRow::from_pairs([
            ("status", CellValue::from(status)),
            ("totalAmount", CellValue::from(amount)),
        ])
    }

    #[test]
    fn counts_and_sums_per_group() {
        let rows = vec![row("Open", 100.0), row("Open", 50.5), row("Completed", 10.0), row("Lost", 1.0)];
        let cards = summarize(&rows, &summary());
        assert_eq!(cards.len(), 2);
        assert_eq!((cards[0].count, cards[0].total_amount), (2, 150.5));
        assert!(cards[0].over_threshold);
        assert_eq!(cards[1].label, "Done");
        assert_eq!((cards[1].count, cards[1].total_amount), (1, 10.0));
        assert!(!cards[1].over_threshold);
    }

    #[test]
    fn text_amounts_are_parsed() {
        let rows = vec![DataRow::from_pairs([("status", "Open"), ("totalAmount", "12.5")])];
        let cards = summarize(&rows, &summary());
        assert_eq!(cards[0].total_amount, 12.5);
    }
}
