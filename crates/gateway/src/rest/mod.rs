//! REST API endpoints for the gateway
//!
//! Resources are not discovered: each one is added to a [`ResourceRegistry`]
//! at startup and the registry is handed to the router builder.

pub mod groups;
pub mod health;
pub mod users;

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{routing::get, Json, Router};

use crate::state::GatewayState;

pub use groups::GroupResponse;
pub use health::HealthResponse;
pub use users::{AccountResponse, CreateAccountRequest, ListAccountsQuery, UpdateAccountRequest};

/// Prefix every resource is mounted under
pub const API_ROOT: &str = "/api";

/// Builds the routes of one resource
pub type ResourceRoutes = fn() -> Router<Arc<GatewayState>>;

/// A named API resource
#[derive(Clone, Copy)]
pub struct Resource {
    pub name: &'static str,
    pub routes: ResourceRoutes,
}

impl Resource {
    pub fn url(&self) -> String {
        format!("{API_ROOT}/{}", self.name)
    }
}

/// Ordered list of the resources served by the API
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    resources: Vec<Resource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource; registering a name twice replaces the earlier entry
    pub fn register(mut self, name: &'static str, routes: ResourceRoutes) -> Self {
        let resource = Resource { name, routes };
        match self.resources.iter_mut().find(|r| r.name == name) {
            Some(existing) => *existing = resource,
            None => self.resources.push(resource),
        }
        self
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.iter().any(|r| r.name == name)
    }

    /// Resource name to collection URL, served at the API root
    pub fn index(&self) -> BTreeMap<String, String> {
        self.resources
            .iter()
            .map(|r| (r.name.to_string(), r.url()))
            .collect()
    }

    /// Routes of every registered resource plus the API root index
    pub fn routes(&self) -> Router<Arc<GatewayState>> {
        let index = Arc::new(self.index());
        let index_handler = move || {
            let index = Arc::clone(&index);
            async move { Json(index.as_ref().clone()) }
        };

        let router = Router::new()
            .route(API_ROOT, get(index_handler.clone()))
            .route(&format!("{API_ROOT}/"), get(index_handler));

        self.resources
            .iter()
            .fold(router, |router, resource| router.merge((resource.routes)()))
    }
}

/// The resources Bunch serves: accounts and groups
pub fn default_registry() -> ResourceRegistry {
    ResourceRegistry::new()
        .register(users::RESOURCE, users::create_account_routes)
        .register(groups::RESOURCE, groups::create_group_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_order_and_index() {
        let registry = default_registry();

        let names: Vec<_> = registry.resources().iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["user", "group"]);

        let index = registry.index();
        assert_eq!(index.get("user").map(String::as_str), Some("/api/user"));
        assert_eq!(index.get("group").map(String::as_str), Some("/api/group"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let registry = ResourceRegistry::new()
            .register("user", users::create_account_routes)
            .register("user", users::create_account_routes);

        assert_eq!(registry.resources().len(), 1);
        assert!(registry.contains("user"));
        assert!(!registry.contains("group"));
    }
}
