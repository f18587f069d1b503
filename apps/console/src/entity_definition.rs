use chrono::{SecondsFormat, Utc};
use metaform_core::{AppError, AppResult};
use metaform_domain::{FieldConfiguration, FieldDescriptor, FieldKind, PatternRule, ValidationRules};
use serde_json::Value;

/// Entity type the console can manage: its collection, display label and form.
#[derive(Debug, Clone)]
pub struct EntityDefinition {
    pub collection: String,
    pub label: &'static str,
    pub configuration: FieldConfiguration,
}

/// Looks up the definition registered for a collection name.
pub fn entity_definition(collection: &str) -> AppResult<EntityDefinition> {
    match collection {
        "users" => Ok(EntityDefinition {
            collection: collection.to_owned(),
            label: "User",
            configuration: users_configuration()?,
        }),
        other => Err(AppError::Validation(format!(
            "no field configuration registered for entity '{other}'"
        ))),
    }
}

pub fn users_configuration() -> AppResult<FieldConfiguration> {
    let letters_only = r"^[A-Za-z\s]+$";

    FieldConfiguration::new(vec![
        FieldDescriptor::new("firstName", "First Name", FieldKind::Text)?
            .required()
            .with_placeholder("Enter first name")
            .with_validation(name_rules(PatternRule::new(
                letters_only,
                "First name must contain only letters and spaces",
            )?))
            .shown_in_table(),
        FieldDescriptor::new("lastName", "Last Name", FieldKind::Text)?
            .required()
            .with_placeholder("Enter last name")
            .with_validation(name_rules(PatternRule::new(
                letters_only,
                "Last name must contain only letters and spaces",
            )?))
            .shown_in_table(),
        FieldDescriptor::new("email", "Email Address", FieldKind::Email)?
            .required()
            .with_placeholder("example@email.com")
            .with_validation(ValidationRules {
                pattern: Some(PatternRule::new(
                    r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$",
                    "Please enter a valid email address",
                )?),
                ..ValidationRules::default()
            })
            .shown_in_table(),
        FieldDescriptor::new("phone", "Phone Number", FieldKind::Tel)?
            .required()
            .with_placeholder("10 digit phone number")
            .with_validation(ValidationRules {
                pattern: Some(PatternRule::new(
                    r"^[0-9]{10}$",
                    "Phone number must be exactly 10 digits",
                )?),
                ..ValidationRules::default()
            })
            .shown_in_table(),
        FieldDescriptor::new("createdDate", "Created Date", FieldKind::Date)?.with_default_value(
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        ),
    ])
}

fn name_rules(pattern: PatternRule) -> ValidationRules {
    ValidationRules {
        min_length: Some(2),
        max_length: Some(30),
        pattern: Some(pattern),
        ..ValidationRules::default()
    }
}
