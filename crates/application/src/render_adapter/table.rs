use metaform_core::AppResult;
use metaform_domain::{EntityRecord, FieldConfiguration};
use serde_json::Value;

use crate::EntityStore;

/// Title of the trailing column carrying row actions.
pub const ACTIONS_COLUMN_TITLE: &str = "Actions";

const ACTIONS_COLUMN_KEY: &str = "actions";
const ROW_ACTIONS: [RowAction; 2] = [RowAction::Edit, RowAction::Delete];

/// Texts of the confirmation step guarding a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteConfirmation {
    /// Question shown to the user.
    pub prompt: &'static str,
    /// Label of the confirming button.
    pub confirm_label: &'static str,
    /// Label of the cancelling button.
    pub cancel_label: &'static str,
}

/// Confirmation shown before any delete.
pub const DELETE_CONFIRMATION: DeleteConfirmation = DeleteConfirmation {
    prompt: "Are you sure you want to delete?",
    confirm_label: "Yes",
    cancel_label: "No",
};

/// Action offered for every table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Opens the edit form for the row.
    Edit,
    /// Deletes the row after confirmation.
    Delete,
}

impl RowAction {
    /// Returns the action's tooltip label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }
}

/// Table-column contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn<'a> {
    /// Column showing one field of each record.
    Field {
        /// Record property shown in the column.
        key: &'a str,
        /// Header text.
        title: &'a str,
    },
    /// Trailing column with edit and delete actions.
    Actions,
}

impl TableColumn<'_> {
    /// Returns the stable column key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Field { key, .. } => *key,
            Self::Actions => ACTIONS_COLUMN_KEY,
        }
    }

    /// Returns the header text.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Field { title, .. } => *title,
            Self::Actions => ACTIONS_COLUMN_TITLE,
        }
    }

    /// Returns the actions rendered in the column's cells.
    #[must_use]
    pub fn actions(&self) -> &'static [RowAction] {
        match self {
            Self::Field { .. } => &[],
            Self::Actions => &ROW_ACTIONS,
        }
    }

    /// Renders the cell text of a record; action cells have no text.
    #[must_use]
    pub fn cell_text(&self, record: &EntityRecord) -> String {
        match self {
            Self::Field { key, .. } => match record.get(*key) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(text)) => text.clone(),
                Some(other) => other.to_string(),
            },
            Self::Actions => String::new(),
        }
    }
}

/// Derives table columns: one per `show_in_table` field in configuration
/// order, then the actions column.
#[must_use]
pub fn table_columns(configuration: &FieldConfiguration) -> Vec<TableColumn<'_>> {
    configuration
        .table_fields()
        .map(|field| TableColumn::Field {
            key: field.name(),
            title: field.label(),
        })
        .chain(std::iter::once(TableColumn::Actions))
        .collect()
}

/// Delete requested from a row, waiting for the user's confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending delete does nothing until confirmed"]
pub struct PendingDelete {
    entity_type: String,
    record_id: String,
}

impl PendingDelete {
    /// Starts the confirmation step for a row.
    pub fn new(entity_type: impl Into<String>, record: &EntityRecord) -> Self {
        Self {
            entity_type: entity_type.into(),
            record_id: record.id().to_owned(),
        }
    }

    /// Returns the texts to show.
    #[must_use]
    pub fn confirmation(&self) -> &'static DeleteConfirmation {
        &DELETE_CONFIRMATION
    }

    /// Returns the id of the record to delete.
    #[must_use]
    pub fn record_id(&self) -> &str {
        self.record_id.as_str()
    }

    /// Confirms and runs the delete.
    pub async fn confirm(self, store: &EntityStore) -> AppResult<()> {
        store
            .delete(self.entity_type.as_str(), self.record_id.as_str())
            .await
    }

    /// Dismisses the request without deleting.
    pub fn cancel(self) {}
}
