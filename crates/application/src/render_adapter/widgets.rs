use chrono::{DateTime, NaiveDate};
use metaform_core::{AppError, AppResult};
use metaform_domain::{FieldConfiguration, FieldDescriptor, FieldKind, FieldOption, OptionValue};
use serde_json::{Number, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_PLACEHOLDER: &str = "Select date";
// Largest integer an f64 represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Concrete input control used to edit a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetControl<'a> {
    /// Single-line input with an HTML input type.
    TextInput {
        /// `text`, `email`, `tel` or `password`.
        input_type: &'static str,
    },
    /// Multi-line input.
    TextArea,
    /// Boolean toggle labelled with the field label.
    Checkbox,
    /// Dropdown.
    Select {
        /// Selectable entries in configuration order.
        options: &'a [FieldOption],
    },
    /// Radio group.
    RadioGroup {
        /// Selectable entries in configuration order.
        options: &'a [FieldOption],
    },
    /// Numeric input.
    NumberInput,
    /// Calendar picker.
    DatePicker,
}

/// Input-widget contract derived from one field descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputWidget<'a> {
    /// Record property edited by the widget.
    pub name: &'a str,
    /// Form item label.
    pub label: &'a str,
    /// Control to paint.
    pub control: WidgetControl<'a>,
    /// Placeholder hint.
    pub placeholder: Option<&'a str>,
    /// Read-only flag.
    pub disabled: bool,
    /// Shows the required marker.
    pub required: bool,
}

/// Value shown by, or emitted from, a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetValue {
    /// Text-like inputs; empty when the stored value is not a string.
    Text(String),
    /// Checkbox state.
    Checked(bool),
    /// Selected option value, if any.
    Choice(Option<OptionValue>),
    /// Numeric input; `None` is an empty input.
    Number(Option<f64>),
    /// Picked calendar date; `None` is an empty picker.
    Date(Option<NaiveDate>),
}

/// Derives the input widget for a field.
#[must_use]
pub fn input_widget(field: &FieldDescriptor) -> InputWidget<'_> {
    let control = match field.kind() {
        FieldKind::Text => WidgetControl::TextInput { input_type: "text" },
        FieldKind::Email => WidgetControl::TextInput {
            input_type: "email",
        },
        FieldKind::Tel => WidgetControl::TextInput { input_type: "tel" },
        FieldKind::Password => WidgetControl::TextInput {
            input_type: "password",
        },
        FieldKind::Textarea => WidgetControl::TextArea,
        FieldKind::Number => WidgetControl::NumberInput,
        FieldKind::Date => WidgetControl::DatePicker,
        FieldKind::Select => WidgetControl::Select {
            options: field.options(),
        },
        FieldKind::Checkbox => WidgetControl::Checkbox,
        FieldKind::Radio => WidgetControl::RadioGroup {
            options: field.options(),
        },
    };

    let placeholder = match field.kind() {
        FieldKind::Date => Some(field.placeholder().unwrap_or(DATE_PLACEHOLDER)),
        _ => field.placeholder(),
    };

    InputWidget {
        name: field.name(),
        label: field.label(),
        control,
        placeholder,
        disabled: field.is_disabled(),
        required: field.is_required(),
    }
}

/// Derives every input widget in configuration order.
#[must_use]
pub fn form_layout(configuration: &FieldConfiguration) -> Vec<InputWidget<'_>> {
    configuration.fields().iter().map(input_widget).collect()
}

/// Projects a stored value into what the field's widget displays.
#[must_use]
pub fn display_value(field: &FieldDescriptor, stored: Option<&Value>) -> WidgetValue {
    match field.kind() {
        FieldKind::Text
        | FieldKind::Email
        | FieldKind::Tel
        | FieldKind::Password
        | FieldKind::Textarea => WidgetValue::Text(
            stored
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_default(),
        ),
        FieldKind::Checkbox => WidgetValue::Checked(stored.is_some_and(is_truthy)),
        FieldKind::Select | FieldKind::Radio => {
            WidgetValue::Choice(stored.and_then(OptionValue::from_json))
        }
        FieldKind::Number => WidgetValue::Number(stored.and_then(Value::as_f64)),
        FieldKind::Date => WidgetValue::Date(stored.and_then(Value::as_str).and_then(parse_date)),
    }
}

/// Projects a widget change event into the stored value.
///
/// `None` means the property becomes absent.
pub fn change_value(field: &FieldDescriptor, event: WidgetValue) -> AppResult<Option<Value>> {
    match (field.kind(), event) {
        (
            FieldKind::Text
            | FieldKind::Email
            | FieldKind::Tel
            | FieldKind::Password
            | FieldKind::Textarea,
            WidgetValue::Text(text),
        ) => Ok(Some(Value::String(text))),
        (FieldKind::Checkbox, WidgetValue::Checked(checked)) => Ok(Some(Value::Bool(checked))),
        (FieldKind::Select | FieldKind::Radio, WidgetValue::Choice(choice)) => {
            Ok(choice.as_ref().map(OptionValue::to_json))
        }
        (FieldKind::Number, WidgetValue::Number(number)) => Ok(number.and_then(number_value)),
        (FieldKind::Date, WidgetValue::Date(date)) => Ok(Some(
            date.map(|date| Value::String(date.format(DATE_FORMAT).to_string()))
                .unwrap_or(Value::Null),
        )),
        (kind, event) => Err(AppError::Validation(format!(
            "widget value {event:?} does not match {kind} field '{}'",
            field.name()
        ))),
    }
}

/// Normalizes a stored value when its widget loses focus.
#[must_use]
pub fn blur_value(field: &FieldDescriptor, stored: Option<Value>) -> Option<Value> {
    match field.kind() {
        FieldKind::Text
        | FieldKind::Email
        | FieldKind::Tel
        | FieldKind::Password
        | FieldKind::Textarea => stored.map(|value| match value {
            Value::String(text) => Value::String(text.trim().to_owned()),
            other => other,
        }),
        FieldKind::Number
        | FieldKind::Date
        | FieldKind::Select
        | FieldKind::Checkbox
        | FieldKind::Radio => stored,
    }
}

/// Parses a stored date; full timestamps contribute their calendar date.
fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

fn number_value(number: f64) -> Option<Value> {
    if !number.is_finite() {
        return None;
    }

    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        return Some(Value::from(number as i64));
    }

    Number::from_f64(number).map(Value::Number)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
