use thiserror::Error;
use tracing::{debug, info};

use crate::item::{Item, ItemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Description cannot be empty")]
    EmptyDescription,

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Quantity must be at most {}", u32::MAX)]
    QuantityTooLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Description,
    Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub description: String,
    pub quantity: i64,
    pub error: Option<EditError>,
    pub focus: DraftField,
}

impl EditDraft {
    pub fn seeded_from(item: &Item) -> Self {
        Self {
            description: item.description.clone(),
            quantity: i64::from(item.quantity),
            error: None,
            focus: DraftField::Description,
        }
    }

    pub fn validate(&self) -> Result<(String, u32), EditError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(EditError::EmptyDescription);
        }
        if self.quantity < 1 {
            return Err(EditError::InvalidQuantity);
        }
        let quantity = u32::try_from(self.quantity).map_err(|_| EditError::QuantityTooLarge)?;
        Ok((description.to_string(), quantity))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySignal {
    Commit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEvent {
    BeginEdit,
    SetDescription(String),
    SetQuantity(i64),
    // Blank or non-numeric text reads as 0.
    SetQuantityText(String),
    Save,
    Cancel,
    Key(KeySignal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCommit {
    pub id: ItemId,
    pub description: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowState {
    #[default]
    Viewing,
    Editing(EditDraft),
}

impl RowState {
    pub fn is_editing(&self) -> bool {
        matches!(self, RowState::Editing(_))
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        match self {
            RowState::Editing(draft) => Some(draft),
            RowState::Viewing => None,
        }
    }

    pub fn error(&self) -> Option<EditError> {
        self.draft().and_then(|draft| draft.error)
    }

    #[tracing::instrument(skip(self, item), fields(id = item.id))]
    pub fn handle(&mut self, item: &Item, event: RowEvent) -> Option<EditCommit> {
        let draft = match self {
            RowState::Viewing => {
                if event == RowEvent::BeginEdit {
                    debug!("entering edit mode");
                    *self = RowState::Editing(EditDraft::seeded_from(item));
                }
                return None;
            }
            RowState::Editing(draft) => draft,
        };

        match event {
            RowEvent::BeginEdit => None,
            RowEvent::SetDescription(text) => {
                draft.description = text;
                draft.focus = DraftField::Description;
                None
            }
            RowEvent::SetQuantity(quantity) => {
                draft.quantity = quantity;
                draft.focus = DraftField::Quantity;
                None
            }
            RowEvent::SetQuantityText(text) => {
                draft.quantity = parse_quantity_text(&text);
                draft.focus = DraftField::Quantity;
                None
            }
            RowEvent::Save | RowEvent::Key(KeySignal::Commit) => self.save(item.id),
            RowEvent::Cancel | RowEvent::Key(KeySignal::Cancel) => {
                debug!("edit cancelled; draft discarded");
                *self = RowState::Viewing;
                None
            }
        }
    }

    fn save(&mut self, id: ItemId) -> Option<EditCommit> {
        let RowState::Editing(draft) = self else {
            return None;
        };

        match draft.validate() {
            Ok((description, quantity)) => {
                info!(quantity, "edit saved");
                *self = RowState::Viewing;
                Some(EditCommit {
                    id,
                    description,
                    quantity,
                })
            }
            Err(error) => {
                debug!(%error, "edit rejected");
                draft.error = Some(error);
                None
            }
        }
    }
}

fn parse_quantity_text(text: &str) -> i64 {
    text.trim().parse::<i64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{DraftField, EditCommit, EditError, KeySignal, RowEvent, RowState};
    use crate::item::Item;

    fn toothbrush() -> Item {
        Item::new(1, "Toothbrush".to_string(), 2)
    }

    fn editing(item: &Item) -> RowState {
        let mut row = RowState::default();
        assert!(row.handle(item, RowEvent::BeginEdit).is_none());
        row
    }

    #[test]
    fn begin_edit_seeds_draft_and_focuses_description() {
        let item = toothbrush();
        let row = editing(&item);

        let draft = row.draft().expect("editing");
        assert_eq!(draft.description, "Toothbrush");
        assert_eq!(draft.quantity, 2);
        assert_eq!(draft.error, None);
        assert_eq!(draft.focus, DraftField::Description);
    }

    #[test]
    fn save_commits_changed_quantity() {
        let item = toothbrush();
        let mut row = editing(&item);

        row.handle(&item, RowEvent::SetQuantityText("5".to_string()));
        let commit = row.handle(&item, RowEvent::Save);

        assert_eq!(
            commit,
            Some(EditCommit {
                id: 1,
                description: "Toothbrush".to_string(),
                quantity: 5,
            })
        );
        assert_eq!(row, RowState::Viewing);
    }

    #[test]
    fn enter_key_saves_like_the_button() {
        let item = toothbrush();
        let mut row = editing(&item);

        row.handle(&item, RowEvent::SetDescription("Toothpaste".to_string()));
        let commit = row
            .handle(&item, RowEvent::Key(KeySignal::Commit))
            .expect("commit");

        assert_eq!(commit.description, "Toothpaste");
        assert_eq!(commit.quantity, 2);
        assert!(!row.is_editing());
    }

    #[test]
    fn both_fields_commit_together() {
        let item = toothbrush();
        let mut row = editing(&item);

        row.handle(&item, RowEvent::SetDescription("Toothpaste".to_string()));
        row.handle(&item, RowEvent::SetQuantity(5));
        let commit = row.handle(&item, RowEvent::Save).expect("commit");

        assert_eq!((commit.description.as_str(), commit.quantity), ("Toothpaste", 5));
    }

    #[test]
    fn empty_description_is_rejected() {
        let item = toothbrush();
        let mut row = editing(&item);

        row.handle(&item, RowEvent::SetDescription("   ".to_string()));
        assert!(row.handle(&item, RowEvent::Save).is_none());
        assert!(row.is_editing());
        assert_eq!(row.error(), Some(EditError::EmptyDescription));
        assert_eq!(
            row.error().map(|error| error.to_string()).as_deref(),
            Some("Description cannot be empty")
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let item = toothbrush();
        let mut row = editing(&item);

        row.handle(&item, RowEvent::SetQuantityText("0".to_string()));
        assert!(row.handle(&item, RowEvent::Save).is_none());
        assert!(row.is_editing());
        assert_eq!(row.error(), Some(EditError::InvalidQuantity));

        row.handle(&item, RowEvent::SetQuantityText(String::new()));
        assert!(row.handle(&item, RowEvent::Key(KeySignal::Commit)).is_none());
        assert_eq!(row.error(), Some(EditError::InvalidQuantity));
    }

    #[test]
    fn oversized_quantity_has_its_own_message() {
        let item = toothbrush();
        let mut row = editing(&item);

        row.handle(&item, RowEvent::SetQuantity(i64::from(u32::MAX) + 1));
        assert!(row.handle(&item, RowEvent::Save).is_none());
        assert_eq!(row.error(), Some(EditError::QuantityTooLarge));
        assert_eq!(
            row.error().map(|error| error.to_string()).as_deref(),
            Some("Quantity must be at most 4294967295")
        );

        row.handle(&item, RowEvent::SetQuantity(i64::from(u32::MAX)));
        let commit = row.handle(&item, RowEvent::Save).expect("commit");
        assert_eq!(commit.quantity, u32::MAX);
    }

    #[test]
    fn cancel_and_escape_discard_the_draft() {
        let item = toothbrush();

        for cancel in [RowEvent::Cancel, RowEvent::Key(KeySignal::Cancel)] {
            let mut row = editing(&item);
            row.handle(&item, RowEvent::SetDescription("Toothpaste".to_string()));
            row.handle(&item, RowEvent::SetQuantity(5));

            assert!(row.handle(&item, cancel).is_none());
            assert_eq!(row, RowState::Viewing);
            assert_eq!(item.label(), "2 Toothbrush");
        }
    }

    #[test]
    fn re_entering_edit_reseeds_from_item() {
        let item = toothbrush();
        let mut row = editing(&item);
        row.handle(&item, RowEvent::SetQuantity(0));
        row.handle(&item, RowEvent::Save);
        row.handle(&item, RowEvent::Cancel);

        row.handle(&item, RowEvent::BeginEdit);
        let draft = row.draft().expect("editing");
        assert_eq!(draft.quantity, 2);
        assert_eq!(draft.error, None);
    }

    #[test]
    fn viewing_ignores_edit_events() {
        let item = toothbrush();
        let mut row = RowState::default();

        assert!(row.handle(&item, RowEvent::Save).is_none());
        assert!(row.handle(&item, RowEvent::SetQuantity(4)).is_none());
        assert_eq!(row, RowState::Viewing);
    }
}
