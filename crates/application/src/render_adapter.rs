//! Mapping from field descriptors to input-widget and table-column contracts.
//!
//! The adapter is widget-library agnostic: it defines the values a widget
//! displays, how widget events flow back into stored record values, and
//! which columns a table shows. Painting is left to the caller.

mod form_state;
mod table;
mod widgets;

pub use form_state::FormState;
pub use table::{
    ACTIONS_COLUMN_TITLE, DELETE_CONFIRMATION, DeleteConfirmation, PendingDelete, RowAction,
    TableColumn, table_columns,
};
pub use widgets::{
    InputWidget, WidgetControl, WidgetValue, blur_value, change_value, display_value,
    form_layout, input_widget,
};
