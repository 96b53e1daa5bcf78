//! Entity descriptor for Customer

use super::CustomerManager;
use super::model::Customer;
use crate::core::service::Record;
use crate::entities::crud;
use crate::server::EntityDescriptor;
use axum::Router;

/// Descriptor for the Customer entity (no delete route)
pub struct CustomerDescriptor {
    pub manager: CustomerManager,
}

impl CustomerDescriptor {
    pub fn new(manager: CustomerManager) -> Self {
        Self { manager }
    }
}

impl EntityDescriptor for CustomerDescriptor {
    fn entity_type(&self) -> &str {
        Customer::ENTITY_TYPE
    }

    fn plural(&self) -> &str {
        Customer::PLURAL
    }

    fn build_routes(&self) -> Router {
        crud::routes(self.manager.clone(), false)
    }
}
