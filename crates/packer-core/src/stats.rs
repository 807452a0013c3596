use crate::item::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackingStats {
    pub total: usize,
    pub packed: usize,
    pub percentage: u32,
}

impl PackingStats {
    pub fn of(items: &[Item]) -> Self {
        let total = items.len();
        let packed = items.iter().filter(|item| item.packed).count();
        let percentage = if total == 0 {
            0
        } else {
            (packed as f64 / total as f64 * 100.0).round() as u32
        };

        Self {
            total,
            packed,
            percentage,
        }
    }

    pub fn message(&self) -> String {
        if self.total == 0 {
            return "Start adding some items to your packing list 🚀".to_string();
        }
        if self.percentage == 100 {
            return "You got everything! Ready to go ✈️".to_string();
        }
        format!(
            "💼 You have {} items on your list, and you already packed {} ({}%)",
            self.total, self.packed, self.percentage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::PackingStats;
    use crate::item::Item;

    fn items(packed: &[bool]) -> Vec<Item> {
        packed
            .iter()
            .enumerate()
            .map(|(idx, packed)| Item {
                packed: *packed,
                ..Item::new(idx as i64, format!("item {idx}"), 1)
            })
            .collect()
    }

    #[test]
    fn empty_list_prompts_to_start() {
        let stats = PackingStats::of(&[]);
        assert_eq!(stats.percentage, 0);
        assert!(stats.message().starts_with("Start adding"));
    }

    #[test]
    fn partial_progress_rounds_percentage() {
        let stats = PackingStats::of(&items(&[true, false, false]));
        assert_eq!((stats.total, stats.packed, stats.percentage), (3, 1, 33));
        assert_eq!(
            stats.message(),
            "💼 You have 3 items on your list, and you already packed 1 (33%)"
        );

        let stats = PackingStats::of(&items(&[true, true, false]));
        assert_eq!(stats.percentage, 67);
    }

    #[test]
    fn everything_packed_is_ready() {
        let stats = PackingStats::of(&items(&[true, true]));
        assert_eq!(stats.message(), "You got everything! Ready to go ✈️");
    }
}
