//! Field configuration model and entity record types.

#![forbid(unsafe_code)]

mod configuration;
mod entity_type;
mod field;
mod record;

pub use configuration::FieldConfiguration;
pub use entity_type::EntityType;
pub use field::{
    FieldDescriptor, FieldKind, FieldOption, OptionValue, PatternRule, ValidationRules,
};
pub use record::{EntityPayload, EntityRecord};
