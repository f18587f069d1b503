//! Translation of a field configuration into an executable validator.
//!
//! Compilation is infallible: every well-formedness concern (unique names,
//! option lists, regular expressions) is settled when the
//! [`FieldConfiguration`] is constructed. Only candidate data can fail, and
//! it fails with a [`ValidationErrors`] value rather than an `AppError`.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use metaform_domain::{FieldConfiguration, FieldDescriptor, FieldKind, PatternRule};
use serde::Serialize;
use serde_json::{Map, Value};

/// Field name to ordered list of human-readable messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Returns whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns every message reported for a field.
    #[must_use]
    pub fn messages(&self, field_name: &str) -> Option<&[String]> {
        self.0.get(field_name).map(Vec::as_slice)
    }

    /// Returns the first message reported for a field.
    #[must_use]
    pub fn first(&self, field_name: &str) -> Option<&str> {
        self.0
            .get(field_name)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Iterates failing fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    /// Replaces the messages of one field; an empty list clears it.
    pub(crate) fn set(&mut self, field_name: &str, messages: Vec<String>) {
        if messages.is_empty() {
            self.0.remove(field_name);
        } else {
            self.0.insert(field_name.to_owned(), messages);
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (name, messages) in &self.0 {
            for message in messages {
                if !first {
                    formatter.write_str("; ")?;
                }
                write!(formatter, "{name}: {message}")?;
                first = false;
            }
        }

        Ok(())
    }
}

/// How a non-string JSON value is projected to the string the rule chain sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringProjection {
    Strict,
    Boolean,
    OptionValue,
}

#[derive(Debug, Clone, PartialEq)]
struct TextRules {
    projection: StringProjection,
    password: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<PatternRule>,
    email: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum FieldRule {
    Number,
    Date,
    Text(TextRules),
}

/// Compiled rule chain for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidator {
    name: String,
    label: String,
    required: bool,
    rule: FieldRule,
}

impl FieldValidator {
    fn compile(field: &FieldDescriptor) -> Self {
        let rule = match field.kind() {
            FieldKind::Number => FieldRule::Number,
            FieldKind::Date => FieldRule::Date,
            FieldKind::Text | FieldKind::Email | FieldKind::Tel | FieldKind::Textarea => {
                FieldRule::Text(TextRules::from_field(field, StringProjection::Strict, false))
            }
            FieldKind::Password => {
                FieldRule::Text(TextRules::from_field(field, StringProjection::Strict, true))
            }
            FieldKind::Checkbox => {
                FieldRule::Text(TextRules::from_field(field, StringProjection::Boolean, false))
            }
            FieldKind::Select | FieldKind::Radio => FieldRule::Text(TextRules::from_field(
                field,
                StringProjection::OptionValue,
                false,
            )),
        };

        Self {
            name: field.name().to_owned(),
            label: field.label().to_owned(),
            required: field.is_required(),
            rule,
        }
    }

    /// Returns the validated field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns whether the field rejects empty values.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Validates one value; `None` means the property is absent.
    ///
    /// Returns every failing message in rule-chain order; empty means valid.
    #[must_use]
    pub fn validate(&self, value: Option<&Value>) -> Vec<String> {
        let value = value.filter(|value| !value.is_null());

        match &self.rule {
            FieldRule::Number => match value {
                None => self.required_messages(),
                Some(Value::Number(_)) => Vec::new(),
                Some(_) => vec![format!("{} must be a number", self.label)],
            },
            FieldRule::Date => match value {
                None => self.required_messages(),
                Some(Value::String(text)) if text.is_empty() => self.required_messages(),
                Some(Value::String(_)) => Vec::new(),
                Some(_) => vec![self.not_a_string()],
            },
            FieldRule::Text(rules) => {
                let Some(value) = value else {
                    return self.required_messages();
                };
                let Some(text) = rules.project(value) else {
                    return vec![self.not_a_string()];
                };
                if text.is_empty() {
                    return self.required_messages();
                }

                rules.check(self.label.as_str(), text.as_str())
            }
        }
    }

    fn required_messages(&self) -> Vec<String> {
        if self.required {
            vec![format!("{} is required", self.label)]
        } else {
            Vec::new()
        }
    }

    fn not_a_string(&self) -> String {
        format!("{} must be a string", self.label)
    }
}

impl TextRules {
    fn from_field(field: &FieldDescriptor, projection: StringProjection, password: bool) -> Self {
        let validation = field.validation();
        Self {
            projection,
            password,
            min_length: validation.and_then(|rules| rules.min_length),
            max_length: validation.and_then(|rules| rules.max_length),
            pattern: validation.and_then(|rules| rules.pattern.clone()),
            email: validation.is_some_and(|rules| rules.email),
        }
    }

    fn project(&self, value: &Value) -> Option<String> {
        match (value, self.projection) {
            (Value::String(text), _) => Some(text.clone()),
            (Value::Bool(flag), StringProjection::Boolean) => Some(flag.to_string()),
            (Value::Number(number), StringProjection::OptionValue) => Some(number.to_string()),
            _ => None,
        }
    }

    fn check(&self, label: &str, text: &str) -> Vec<String> {
        let mut messages = Vec::new();

        if self.password {
            if !text.chars().any(|character| character.is_ascii_alphabetic()) {
                messages.push(format!("{label} must contain at least one letter"));
            }
            if !text.chars().any(|character| character.is_ascii_digit()) {
                messages.push(format!("{label} must contain at least one number"));
            }
            if text
                .chars()
                .all(|character| character.is_ascii_alphanumeric())
            {
                messages.push(format!(
                    "{label} must contain at least one special character"
                ));
            }
        }

        let length = text.chars().count();
        if let Some(min_length) = self.min_length
            && length < min_length
        {
            messages.push(format!(
                "{label} must be at least {min_length} characters"
            ));
        }
        if let Some(max_length) = self.max_length
            && length > max_length
        {
            messages.push(format!("{label} must be at most {max_length} characters"));
        }

        if let Some(pattern) = &self.pattern
            && !pattern.regex().is_match(text)
        {
            messages.push(pattern.message().to_owned());
        }

        if self.email && !looks_like_email(text) {
            messages.push(format!("{label} must be a valid email address"));
        }

        messages
    }
}

/// Structural check: one `@`, non-empty local part, dotted domain, no whitespace.
fn looks_like_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty())
}

/// Object-level validator compiled from a field configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchema {
    fields: Vec<FieldValidator>,
}

impl CompiledSchema {
    /// Returns the per-field validators in configuration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldValidator] {
        &self.fields
    }

    /// Returns the validator of one field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValidator> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Validates one field of a candidate record. Unknown names are valid.
    #[must_use]
    pub fn validate_field(&self, name: &str, value: Option<&Value>) -> Vec<String> {
        self.field(name)
            .map(|field| field.validate(value))
            .unwrap_or_default()
    }

    /// Validates a candidate record, collecting the errors of every field.
    ///
    /// Properties without a configured field are ignored.
    pub fn validate(&self, candidate: &Map<String, Value>) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for field in &self.fields {
            errors.set(field.name(), field.validate(candidate.get(field.name())));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Compiles a field configuration into a validator.
#[must_use]
pub fn compile(configuration: &FieldConfiguration) -> CompiledSchema {
    CompiledSchema {
        fields: configuration
            .fields()
            .iter()
            .map(FieldValidator::compile)
            .collect(),
    }
}
