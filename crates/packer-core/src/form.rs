use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::item::{Item, mint_id};

pub const QUANTITY_RANGE: RangeInclusive<u32> = 1..=20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddForm {
    description: String,
    quantity: u32,
}

impl Default for AddForm {
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: *QUANTITY_RANGE.start(),
        }
    }
}

impl AddForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.clamp(*QUANTITY_RANGE.start(), *QUANTITY_RANGE.end());
    }

    pub fn submit(&mut self, existing: &[Item], now: DateTime<Utc>) -> Option<Item> {
        let description = self.description.trim();
        if description.is_empty() {
            debug!("ignoring submit with empty description");
            return None;
        }

        let item = Item::new(
            mint_id(existing, now),
            description.to_string(),
            self.quantity,
        );
        *self = Self::default();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::AddForm;
    use crate::item::Item;

    #[test]
    fn submit_mints_item_and_resets_fields() {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 1, 8, 0, 0)
            .single()
            .expect("valid now");
        let mut form = AddForm::new();
        form.set_description("Toothbrush");
        form.set_quantity(2);

        let item = form.submit(&[], now).expect("item");
        assert_eq!(item, Item::new(now.timestamp_millis(), "Toothbrush".to_string(), 2));
        assert_eq!(form, AddForm::default());
        assert_eq!(form.quantity(), 1);
        assert_eq!(form.description(), "");
    }

    #[test]
    fn blank_description_is_ignored() {
        let mut form = AddForm::new();
        form.set_description("  ");
        form.set_quantity(3);

        assert!(form.submit(&[], Utc::now()).is_none());
        assert_eq!(form.quantity(), 3);
    }

    #[test]
    fn submitted_description_is_trimmed() {
        let mut form = AddForm::new();
        form.set_description("  Socks  ");

        let item = form.submit(&[], Utc::now()).expect("item");
        assert_eq!(item.description, "Socks");
        assert_eq!(item.label(), "1 Socks");
    }

    #[test]
    fn quantity_is_clamped_to_selector() {
        let mut form = AddForm::new();
        form.set_quantity(0);
        assert_eq!(form.quantity(), 1);
        form.set_quantity(50);
        assert_eq!(form.quantity(), 20);
    }
}
