pub mod resource;
pub mod tracing;
