//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_entity_gateway;
mod in_memory_entity_gateway;

pub use http_entity_gateway::HttpEntityGateway;
pub use in_memory_entity_gateway::InMemoryEntityGateway;
