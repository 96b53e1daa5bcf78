//! Product entity module

pub mod descriptor;
pub mod model;

pub use descriptor::ProductDescriptor;
pub use model::{Product, ProductDraft};

use crate::core::manager::ResourceManager;

/// Products: list sorted by name, empty list is not found, delete exposed
pub type ProductManager = ResourceManager<Product>;
