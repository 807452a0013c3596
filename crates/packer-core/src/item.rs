use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ItemId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub description: String,
    pub quantity: u32,
    pub packed: bool,
}

impl Item {
    pub fn new(id: ItemId, description: String, quantity: u32) -> Self {
        Self {
            id,
            description,
            quantity,
            packed: false,
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.quantity, self.description)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.description)
    }
}

pub fn mint_id(existing: &[Item], now: DateTime<Utc>) -> ItemId {
    let candidate = now.timestamp_millis();
    let Some(max) = existing.iter().map(|item| item.id).max() else {
        return candidate;
    };
    if max < candidate {
        return candidate;
    }
    if let Some(next) = max.checked_add(1) {
        return next;
    }

    // The top of the id space is taken; reuse the highest free id below `now`.
    let taken: BTreeSet<ItemId> = existing.iter().map(|item| item.id).collect();
    (ItemId::MIN..=candidate)
        .rev()
        .find(|id| !taken.contains(id))
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{Item, mint_id};

    #[test]
    fn label_puts_quantity_first() {
        let item = Item::new(1, "Toothbrush".to_string(), 2);
        assert_eq!(item.label(), "2 Toothbrush");
        assert_eq!(item.to_string(), "2 Toothbrush");
        assert!(!item.packed);
    }

    #[test]
    fn minted_ids_use_millis_and_stay_unique() {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 1, 8, 0, 0)
            .single()
            .expect("valid now");
        let millis = now.timestamp_millis();

        assert_eq!(mint_id(&[], now), millis);

        let existing = vec![Item::new(millis, "Socks".to_string(), 4)];
        assert_eq!(mint_id(&existing, now), millis + 1);

        let older = vec![Item::new(millis - 10, "Hat".to_string(), 1)];
        assert_eq!(mint_id(&older, now), millis);
    }

    #[test]
    fn minting_past_the_largest_id_does_not_overflow() {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 1, 8, 0, 0)
            .single()
            .expect("valid now");
        let millis = now.timestamp_millis();

        let existing = vec![Item::new(i64::MAX, "Hat".to_string(), 1)];
        assert_eq!(mint_id(&existing, now), millis);

        let crowded = vec![
            Item::new(i64::MAX, "Hat".to_string(), 1),
            Item::new(millis, "Socks".to_string(), 2),
            Item::new(millis - 1, "Scarf".to_string(), 1),
        ];
        let id = mint_id(&crowded, now);
        assert_eq!(id, millis - 2);
        assert!(crowded.iter().all(|item| item.id != id));
    }

    #[test]
    fn persisted_field_names_are_stable() {
        let item = Item::new(7, "Passport".to_string(), 1);
        let json = serde_json::to_value(&item).expect("encode");
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "description": "Passport",
                "quantity": 1,
                "packed": false
            })
        );
    }
}
