//! Customer entity module

pub mod descriptor;
pub mod model;

pub use descriptor::CustomerDescriptor;
pub use model::{Customer, CustomerDraft, DEFAULT_MEMBERSHIP};

use crate::core::manager::ResourceManager;

pub type CustomerManager = ResourceManager<Customer>;
