//! dbt project discovery and descriptor handling
//!
//! This crate handles:
//! - Discovering SQL models under `models/` (the model registry)
//! - Parsing sibling descriptor files (schema.yml)
//! - Merging declared descriptions and tests onto extracted models

pub mod registry;
pub mod descriptor;

pub use registry::{Catalog, ModelRegistry, RegistryError, SQL_EXTENSION};
pub use descriptor::{Descriptor, DescriptorColumn, DescriptorError, DescriptorModel};
