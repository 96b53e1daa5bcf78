//! Entity registry collecting each resource's routes

use axum::Router;
use std::collections::BTreeMap;

/// Describes how to build routes for one resource
///
/// Each resource (customer, product, order, order item) implements this
/// trait to contribute its routes.
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g. "product")
    fn entity_type(&self) -> &str;

    /// Route segment (e.g. "products")
    fn plural(&self) -> &str;

    /// Routes under `/{plural}`
    fn build_routes(&self) -> Router;
}

/// Registry for every resource served by the application
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any previous one for the same type
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge every registered resource's routes into one router
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Registered entity types, in name order
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }

    /// Route segments of the registered resources
    pub fn plurals(&self) -> Vec<&str> {
        self.descriptors.values().map(|d| d.plural()).collect()
    }
}
