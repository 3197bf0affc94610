// Adapters layer: concrete implementations for external systems (http plumbing, registry).

pub mod http;
pub mod registry;
