//! Schema compiler, generic entity store and render adapter.

#![forbid(unsafe_code)]

mod entity_ports;
mod entity_store;
pub mod render_adapter;
pub mod schema_compiler;
mod typed_entity_store;

pub use entity_ports::{EntityGateway, GatewayOperation};
pub use entity_store::{CollectionState, EntityStore};
pub use schema_compiler::{CompiledSchema, FieldValidator, ValidationErrors, compile};
pub use typed_entity_store::TypedEntityStore;
