//! Entity descriptor for Product

use super::ProductManager;
use super::model::Product;
use crate::core::service::Record;
use crate::entities::crud;
use crate::server::EntityDescriptor;
use axum::Router;

/// Descriptor for the Product entity
pub struct ProductDescriptor {
    pub manager: ProductManager,
}

impl ProductDescriptor {
    pub fn new(manager: ProductManager) -> Self {
        Self { manager }
    }
}

impl EntityDescriptor for ProductDescriptor {
    fn entity_type(&self) -> &str {
        Product::ENTITY_TYPE
    }

    fn plural(&self) -> &str {
        Product::PLURAL
    }

    fn build_routes(&self) -> Router {
        crud::routes(self.manager.clone(), true)
    }
}
