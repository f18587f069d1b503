use std::collections::HashSet;

use metaform_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::FieldDescriptor;

/// Ordered field list describing one entity type.
///
/// List order is significant: form layout and table columns follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldDescriptor>", into = "Vec<FieldDescriptor>")]
pub struct FieldConfiguration {
    fields: Vec<FieldDescriptor>,
}

impl FieldConfiguration {
    /// Creates a configuration with invariant checks.
    pub fn new(fields: Vec<FieldDescriptor>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(AppError::Validation(format!(
                    "duplicate field name '{}' in field configuration",
                    field.name()
                )));
            }

            field.check_invariants()?;
        }

        Ok(Self { fields })
    }

    /// Returns all fields in configuration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Finds a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Iterates the fields that derive a table column.
    pub fn table_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.show_in_table())
    }
}

impl TryFrom<Vec<FieldDescriptor>> for FieldConfiguration {
    type Error = AppError;

    fn try_from(fields: Vec<FieldDescriptor>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<FieldConfiguration> for Vec<FieldDescriptor> {
    fn from(configuration: FieldConfiguration) -> Self {
        configuration.fields
    }
}

impl<'a> IntoIterator for &'a FieldConfiguration {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
