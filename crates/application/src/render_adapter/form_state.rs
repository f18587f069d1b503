use metaform_core::{AppError, AppResult};
use metaform_domain::{EntityPayload, EntityRecord, FieldConfiguration, FieldDescriptor};
use serde_json::{Map, Value};

use super::widgets::{WidgetValue, blur_value, change_value, display_value};
use crate::schema_compiler::{CompiledSchema, ValidationErrors, compile};

/// Editable values of one add or edit form, validated on blur and on submit.
///
/// Validation errors stay inside the form: `submit` hands out a payload only
/// when every field is valid.
#[derive(Debug, Clone)]
pub struct FormState {
    configuration: FieldConfiguration,
    schema: CompiledSchema,
    values: Map<String, Value>,
    errors: ValidationErrors,
    submitted: bool,
}

impl FormState {
    /// Opens an add form seeded with configured default values.
    #[must_use]
    pub fn new(configuration: FieldConfiguration) -> Self {
        let values = configuration
            .fields()
            .iter()
            .filter_map(|field| {
                field
                    .default_value()
                    .map(|value| (field.name().to_owned(), value.clone()))
            })
            .collect();

        Self {
            schema: compile(&configuration),
            configuration,
            values,
            errors: ValidationErrors::default(),
            submitted: false,
        }
    }

    /// Opens an edit form: defaults overlaid with the record's values.
    #[must_use]
    pub fn for_record(configuration: FieldConfiguration, record: &EntityRecord) -> Self {
        let mut form = Self::new(configuration);
        for (name, value) in record.fields() {
            form.values.insert(name.clone(), value.clone());
        }
        form
    }

    /// Returns the field configuration backing the form.
    #[must_use]
    pub fn configuration(&self) -> &FieldConfiguration {
        &self.configuration
    }

    /// Returns the stored value of a field.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns what the field's widget displays.
    pub fn display_value(&self, name: &str) -> AppResult<WidgetValue> {
        let field = self.field(name)?;
        Ok(display_value(field, self.values.get(name)))
    }

    /// Applies a widget change event.
    ///
    /// After the first submit attempt the field is revalidated immediately.
    pub fn change(&mut self, name: &str, event: WidgetValue) -> AppResult<()> {
        let field = self.field(name)?;
        let stored = change_value(field, event)?;
        self.store(name, stored);

        if self.submitted {
            self.validate_field(name);
        }
        Ok(())
    }

    /// Normalizes the field value on focus loss and validates it.
    pub fn blur(&mut self, name: &str) -> AppResult<()> {
        let field = self.field(name)?;
        let normalized = blur_value(field, self.values.get(name).cloned());
        self.store(name, normalized);
        self.validate_field(name);
        Ok(())
    }

    /// Validates every field; returns the payload to send when all pass.
    ///
    /// Optional fields left empty are sent as `null`; properties without a
    /// configured field are dropped.
    pub fn submit(&mut self) -> Option<EntityPayload> {
        self.submitted = true;
        match self.schema.validate(&self.values) {
            Ok(()) => {
                self.errors = ValidationErrors::default();
                Some(self.payload())
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    /// Returns the current validation errors.
    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Returns the help text shown under a field: its first error.
    #[must_use]
    pub fn help_text(&self, name: &str) -> Option<&str> {
        self.errors.first(name)
    }

    fn field(&self, name: &str) -> AppResult<&FieldDescriptor> {
        self.configuration
            .field(name)
            .ok_or_else(|| AppError::NotFound(format!("form has no field named '{name}'")))
    }

    fn store(&mut self, name: &str, value: Option<Value>) {
        match value {
            Some(value) => {
                self.values.insert(name.to_owned(), value);
            }
            None => {
                self.values.remove(name);
            }
        }
    }

    fn validate_field(&mut self, name: &str) {
        let messages = self.schema.validate_field(name, self.values.get(name));
        self.errors.set(name, messages);
    }

    fn payload(&self) -> EntityPayload {
        let fields = self
            .configuration
            .fields()
            .iter()
            .map(|field| {
                let value = match self.values.get(field.name()) {
                    None => Value::Null,
                    Some(Value::String(text)) if text.is_empty() => Value::Null,
                    Some(value) => value.clone(),
                };
                (field.name().to_owned(), value)
            })
            .collect();

        EntityPayload::new(fields)
    }
}
