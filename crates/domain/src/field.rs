use std::fmt::{Display, Formatter};
use std::str::FromStr;

use metaform_core::{AppError, AppResult, NonEmptyString};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Supported input field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text input.
    Text,
    /// Email address input.
    Email,
    /// Telephone number input.
    Tel,
    /// Masked password input.
    Password,
    /// Multi-line text input.
    Textarea,
    /// Numeric input.
    Number,
    /// Calendar date stored as `YYYY-MM-DD`.
    Date,
    /// Dropdown over a fixed option list.
    Select,
    /// Boolean toggle.
    Checkbox,
    /// Radio group over a fixed option list.
    Radio,
}

impl FieldKind {
    /// Every field kind in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Text,
        Self::Email,
        Self::Tel,
        Self::Password,
        Self::Textarea,
        Self::Number,
        Self::Date,
        Self::Select,
        Self::Checkbox,
        Self::Radio,
    ];

    /// Returns a stable storage value for the field kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Password => "password",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Date => "date",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
        }
    }

    /// Returns whether the kind picks its value from `options`.
    #[must_use]
    pub fn uses_options(&self) -> bool {
        match self {
            Self::Select | Self::Radio => true,
            Self::Text
            | Self::Email
            | Self::Tel
            | Self::Password
            | Self::Textarea
            | Self::Number
            | Self::Date
            | Self::Checkbox => false,
        }
    }

    /// Returns whether a stored value has the JSON shape this kind persists.
    #[must_use]
    pub fn accepts_stored_value(&self, value: &Value) -> bool {
        match self {
            Self::Text | Self::Email | Self::Tel | Self::Password | Self::Textarea | Self::Date => {
                value.is_string()
            }
            Self::Number => value.is_number(),
            Self::Checkbox => value.is_boolean(),
            Self::Select | Self::Radio => value.is_string() || value.is_number(),
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown field kind '{value}'")))
    }
}

/// Raw value carried by a select or radio option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// String option value.
    Text(String),
    /// Numeric option value.
    Number(Number),
}

impl OptionValue {
    /// Returns the value as stored on an entity record.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(number) => Value::Number(number.clone()),
        }
    }

    /// Reads an option value back from a stored JSON value.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Number(number) => Some(Self::Number(number.clone())),
            _ => None,
        }
    }
}

impl Display for OptionValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => formatter.write_str(text),
            Self::Number(number) => write!(formatter, "{number}"),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

/// One selectable entry of a select or radio field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Display label.
    pub label: String,
    /// Stored value.
    pub value: OptionValue,
}

impl FieldOption {
    /// Creates an option.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Regular expression rule with its caller-supplied failure message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PatternRuleDocument", into = "PatternRuleDocument")]
pub struct PatternRule {
    regex: Regex,
    message: String,
}

#[derive(Serialize, Deserialize)]
struct PatternRuleDocument {
    value: String,
    message: String,
}

impl PatternRule {
    /// Compiles a pattern rule, rejecting invalid regular expressions.
    pub fn new(pattern: &str, message: impl Into<String>) -> AppResult<Self> {
        let regex = Regex::new(pattern).map_err(|error| {
            AppError::Validation(format!("invalid pattern '{pattern}': {error}"))
        })?;

        Ok(Self {
            regex,
            message: message.into(),
        })
    }

    /// Returns the compiled expression.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl PartialEq for PatternRule {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str() && self.message == other.message
    }
}

impl TryFrom<PatternRuleDocument> for PatternRule {
    type Error = AppError;

    fn try_from(document: PatternRuleDocument) -> Result<Self, Self::Error> {
        Self::new(document.value.as_str(), document.message)
    }
}

impl From<PatternRule> for PatternRuleDocument {
    fn from(rule: PatternRule) -> Self {
        Self {
            value: rule.regex.as_str().to_owned(),
            message: rule.message,
        }
    }
}

/// Optional validation bundle attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationRules {
    /// Marks the field mandatory in addition to `FieldDescriptor::required`.
    pub required: bool,
    /// Minimum length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Requires an email-shaped value.
    pub email: bool,
    /// Regular expression the value must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternRule>,
}

/// Declarative description of one input field of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    name: NonEmptyString,
    label: NonEmptyString,
    #[serde(rename = "type")]
    kind: FieldKind,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    show_in_table: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validation: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_value: Option<Value>,
    #[serde(default)]
    disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
}

impl FieldDescriptor {
    /// Creates a descriptor with every optional attribute unset.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
    ) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            label: NonEmptyString::new(label)?,
            kind,
            required: false,
            show_in_table: false,
            options: Vec::new(),
            validation: None,
            default_value: None,
            disabled: false,
            placeholder: None,
        })
    }

    /// Marks the field mandatory.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Derives a table column for the field.
    #[must_use]
    pub fn shown_in_table(mut self) -> Self {
        self.show_in_table = true;
        self
    }

    /// Sets the option list for select and radio fields.
    #[must_use]
    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    /// Attaches a validation bundle.
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationRules) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Sets the initial form value.
    #[must_use]
    pub fn with_default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Sets the placeholder hint.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Renders the input read-only.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Returns the field name, also the record property name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns whether either required marker is set.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
            || self
                .validation
                .as_ref()
                .is_some_and(|validation| validation.required)
    }

    /// Returns whether a table column is derived for the field.
    #[must_use]
    pub fn show_in_table(&self) -> bool {
        self.show_in_table
    }

    /// Returns the configured options.
    #[must_use]
    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }

    /// Returns the validation bundle.
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationRules> {
        self.validation.as_ref()
    }

    /// Returns the initial form value.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Returns whether the input is read-only.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns the placeholder hint.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub(crate) fn check_invariants(&self) -> AppResult<()> {
        if self.kind.uses_options() && self.options.is_empty() {
            return Err(AppError::Validation(format!(
                "{} field '{}' requires at least one option",
                self.kind,
                self.name()
            )));
        }

        if let Some(validation) = &self.validation
            && let (Some(min_length), Some(max_length)) =
                (validation.min_length, validation.max_length)
            && min_length > max_length
        {
            return Err(AppError::Validation(format!(
                "field '{}' has minLength {min_length} greater than maxLength {max_length}",
                self.name()
            )));
        }

        if let Some(default_value) = &self.default_value
            && !default_value.is_null()
            && !self.kind.accepts_stored_value(default_value)
        {
            return Err(AppError::Validation(format!(
                "default value of field '{}' does not match field kind '{}'",
                self.name(),
                self.kind
            )));
        }

        Ok(())
    }
}
