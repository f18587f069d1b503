use chrono::NaiveDate;
use metaform_application::render_adapter::WidgetValue;
use metaform_core::{AppError, AppResult};
use metaform_domain::{FieldDescriptor, FieldKind};

/// Turns a command-line value into the event the field's widget would emit.
pub fn widget_event(field: &FieldDescriptor, raw_value: &str) -> AppResult<WidgetValue> {
    let trimmed = raw_value.trim();
    match field.kind() {
        FieldKind::Text
        | FieldKind::Email
        | FieldKind::Tel
        | FieldKind::Password
        | FieldKind::Textarea => Ok(WidgetValue::Text(raw_value.to_owned())),
        FieldKind::Checkbox => match trimmed.to_ascii_lowercase().as_str() {
            "" | "false" | "no" | "0" => Ok(WidgetValue::Checked(false)),
            "true" | "yes" | "1" => Ok(WidgetValue::Checked(true)),
            _ => Err(AppError::Validation(format!(
                "{} must be true or false",
                field.label()
            ))),
        },
        FieldKind::Number => {
            if trimmed.is_empty() {
                return Ok(WidgetValue::Number(None));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(|number| WidgetValue::Number(Some(number)))
                .ok_or_else(|| {
                    AppError::Validation(format!("{} must be a number", field.label()))
                })
        }
        FieldKind::Date => {
            if trimmed.is_empty() {
                return Ok(WidgetValue::Date(None));
            }
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(|date| WidgetValue::Date(Some(date)))
                .map_err(|_| {
                    AppError::Validation(format!("{} must be a YYYY-MM-DD date", field.label()))
                })
        }
        FieldKind::Select | FieldKind::Radio => {
            if trimmed.is_empty() {
                return Ok(WidgetValue::Choice(None));
            }
            field
                .options()
                .iter()
                .find(|option| option.value.to_string() == trimmed || option.label == trimmed)
                .map(|option| WidgetValue::Choice(Some(option.value.clone())))
                .ok_or_else(|| {
                    let choices: Vec<String> = field
                        .options()
                        .iter()
                        .map(|option| option.value.to_string())
                        .collect();
                    AppError::Validation(format!(
                        "{} must be one of: {}",
                        field.label(),
                        choices.join(", ")
                    ))
                })
        }
    }
}
