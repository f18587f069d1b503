use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use metaform_application::EntityStore;
use metaform_application::render_adapter::{
    FormState, InputWidget, PendingDelete, TableColumn, WidgetControl, form_layout, table_columns,
};
use metaform_core::{AppError, AppResult};
use metaform_domain::EntityRecord;
use serde_json::Value;
use tracing::{info, warn};

use crate::entity_definition::EntityDefinition;
use crate::field_input::widget_event;

/// Feedback shown after a create, update or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageNotice {
    Success(String),
    Error(String),
}

impl PageNotice {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl Display for PageNotice {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success(message) | Self::Error(message) => formatter.write_str(message),
        }
    }
}

#[derive(Debug)]
enum Editor {
    Closed,
    Creating(FormState),
    Editing { id: String, form: FormState },
}

/// Management page for one entity type: a table plus an add/edit form.
pub struct EntityPage {
    store: EntityStore,
    definition: EntityDefinition,
    editor: Editor,
}

impl EntityPage {
    #[must_use]
    pub fn new(store: EntityStore, definition: EntityDefinition) -> Self {
        Self {
            store,
            definition,
            editor: Editor::Closed,
        }
    }

    pub async fn load(&self) -> AppResult<()> {
        self.store.list(self.collection()).await
    }

    /// Records shown in the table, newest (highest numeric id) first.
    pub async fn rows(&self) -> Vec<EntityRecord> {
        let mut rows = self
            .store
            .collection(self.collection())
            .await
            .map(|collection| collection.items)
            .unwrap_or_default();
        rows.sort_by(newest_first);
        rows
    }

    /// Returns the form drawer's title, or `None` while it is closed.
    #[must_use]
    pub fn drawer_title(&self) -> Option<String> {
        match self.editor {
            Editor::Closed => None,
            Editor::Creating(_) => Some(format!("Add {}", self.definition.label)),
            Editor::Editing { .. } => Some(format!("Edit {}", self.definition.label)),
        }
    }

    #[must_use]
    pub fn form(&self) -> Option<&FormState> {
        match &self.editor {
            Editor::Closed => None,
            Editor::Creating(form) | Editor::Editing { form, .. } => Some(form),
        }
    }

    /// Renders the open form: title, then one line per field with its current value.
    #[must_use]
    pub fn render_form(&self) -> Option<String> {
        let title = self.drawer_title()?;
        let form = self.form()?;
        let mut lines = vec![title];
        for widget in form_layout(form.configuration()) {
            lines.push(form_line(&widget, form));
        }
        Some(lines.join("\n"))
    }

    pub fn open_create(&mut self) {
        self.editor = Editor::Creating(FormState::new(self.definition.configuration.clone()));
    }

    /// Opens the edit form for a cached record.
    pub async fn open_edit(&mut self, id: &str) -> AppResult<()> {
        let record = self.cached_record(id).await?;
        self.editor = Editor::Editing {
            id: record.id().to_owned(),
            form: FormState::for_record(self.definition.configuration.clone(), &record),
        };
        Ok(())
    }

    pub fn close(&mut self) {
        self.editor = Editor::Closed;
    }

    /// Types a raw value into a field of the open form and leaves the field.
    pub fn fill(&mut self, field_name: &str, raw_value: &str) -> AppResult<()> {
        let form = match &mut self.editor {
            Editor::Closed => {
                return Err(AppError::Validation("no form is open".to_owned()));
            }
            Editor::Creating(form) | Editor::Editing { form, .. } => form,
        };
        let field = self
            .definition
            .configuration
            .field(field_name)
            .ok_or_else(|| AppError::NotFound(format!("form has no field named '{field_name}'")))?;

        form.change(field_name, widget_event(field, raw_value)?)?;
        form.blur(field_name)
    }

    /// Submits the open form.
    ///
    /// Invalid input keeps the form open and returns its errors. A store
    /// failure also keeps it open and is reported as an error notice.
    pub async fn submit(&mut self) -> AppResult<PageNotice> {
        let collection = self.definition.collection.clone();
        let label = self.definition.label;
        let (payload, editing_id) = match &mut self.editor {
            Editor::Closed => {
                return Err(AppError::Validation("no form is open".to_owned()));
            }
            Editor::Creating(form) => (form.submit(), None),
            Editor::Editing { id, form } => (form.submit(), Some(id.clone())),
        };
        let Some(payload) = payload else {
            let errors = self
                .form()
                .map(|form| form.errors().to_string())
                .unwrap_or_default();
            return Err(AppError::Validation(errors));
        };

        let outcome = match editing_id.as_deref() {
            Some(id) => self
                .store
                .update(collection.as_str(), id, payload)
                .await
                .map(|record| (record, "updated")),
            None => self
                .store
                .create(collection.as_str(), payload)
                .await
                .map(|record| (record, "created")),
        };

        match outcome {
            Ok((record, verb)) => {
                info!(entity = %collection, record_id = %record.id(), "{label} {verb}");
                self.close();
                Ok(PageNotice::Success(format!("{label} {verb} successfully")))
            }
            Err(error) => {
                warn!(entity = %collection, error = %error, "failed to save record");
                Ok(PageNotice::Error("Operation failed".to_owned()))
            }
        }
    }

    /// Starts the delete confirmation for a cached record.
    pub async fn request_delete(&self, id: &str) -> AppResult<PendingDelete> {
        let record = self.cached_record(id).await?;
        Ok(PendingDelete::new(self.collection(), &record))
    }

    pub async fn confirm_delete(&self, pending: PendingDelete) -> PageNotice {
        let record_id = pending.record_id().to_owned();
        match pending.confirm(&self.store).await {
            Ok(()) => PageNotice::Success(format!(
                "{} deleted successfully",
                self.definition.label
            )),
            Err(error) => {
                warn!(
                    entity = %self.collection(),
                    record_id = %record_id,
                    error = %error,
                    "failed to delete record"
                );
                PageNotice::Error("Delete failed".to_owned())
            }
        }
    }

    /// Renders the table as aligned text columns.
    pub async fn render_table(&self) -> String {
        let state = self.store.collection(self.collection()).await;
        if state.as_ref().is_some_and(|state| state.loading) {
            return "Loading...".to_owned();
        }

        let columns = table_columns(&self.definition.configuration);
        let mut lines: Vec<Vec<String>> = vec![
            columns
                .iter()
                .map(|column| column.title().to_owned())
                .collect(),
        ];
        for record in self.rows().await {
            lines.push(
                columns
                    .iter()
                    .map(|column| cell(column, &record))
                    .collect::<Vec<String>>(),
            );
        }
        if lines.len() == 1 {
            return "No data".to_owned();
        }

        let widths: Vec<usize> = (0..columns.len())
            .map(|index| {
                lines
                    .iter()
                    .map(|line| line[index].chars().count())
                    .max()
                    .unwrap_or_default()
            })
            .collect();
        lines
            .iter()
            .map(|line| {
                line.iter()
                    .zip(widths.iter().copied())
                    .map(|(text, width)| format!("{text:<width$}"))
                    .collect::<Vec<String>>()
                    .join(" | ")
                    .trim_end()
                    .to_owned()
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    fn collection(&self) -> &str {
        self.definition.collection.as_str()
    }

    async fn cached_record(&self, id: &str) -> AppResult<EntityRecord> {
        self.store
            .collection(self.collection())
            .await
            .and_then(|state| state.find(id).cloned())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{} '{id}' is not in the loaded list",
                    self.definition.label
                ))
            })
    }
}

fn cell(column: &TableColumn<'_>, record: &EntityRecord) -> String {
    match column {
        TableColumn::Field { .. } => column.cell_text(record),
        TableColumn::Actions => column
            .actions()
            .iter()
            .map(|action| action.label())
            .collect::<Vec<&str>>()
            .join(" / "),
    }
}

fn form_line(widget: &InputWidget<'_>, form: &FormState) -> String {
    let marker = if widget.required { "*" } else { "" };
    let control = match widget.control {
        WidgetControl::TextInput { input_type } => input_type,
        WidgetControl::TextArea => "textarea",
        WidgetControl::Checkbox => "checkbox",
        WidgetControl::Select { .. } => "select",
        WidgetControl::RadioGroup { .. } => "radio",
        WidgetControl::NumberInput => "number",
        WidgetControl::DatePicker => "date",
    };
    let value = match form.value(widget.name) {
        None | Some(Value::Null) => widget.placeholder.unwrap_or_default().to_owned(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };
    let mut line = format!("{}{marker} ({control}): {value}", widget.label);
    if widget.disabled {
        line.push_str(" [disabled]");
    }
    if let Some(error) = form.help_text(widget.name) {
        line.push_str(&format!(" <- {error}"));
    }
    line
}

fn newest_first(left: &EntityRecord, right: &EntityRecord) -> Ordering {
    match (left.id().parse::<f64>(), right.id().parse::<f64>()) {
        (Ok(left_id), Ok(right_id)) => right_id.total_cmp(&left_id),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => right.id().cmp(left.id()),
    }
}

#[cfg(test)]
mod tests;
