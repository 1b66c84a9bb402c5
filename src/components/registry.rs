// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::traits::Component;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry mapping component names to their implementations.
///
/// Components are held as `Arc<dyn Component>` so the engine can clone a
/// handle out of the registry and invoke it while the runtime state is
/// mutably borrowed.
///
/// # Examples
/// ```
/// use sceneflow::components::{ComponentRegistry, NodeComponent, SceneGateway, SocketDecl};
///
/// let mut registry = ComponentRegistry::new();
/// registry.register(SceneGateway);
/// registry.register(NodeComponent::new(
///     "OUT",
///     vec![SocketDecl::input("input", "Any").exposed()],
/// ));
///
/// assert!(registry.contains("OUT"));
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct ComponentRegistry(HashMap<String, Arc<dyn Component>>);

impl ComponentRegistry {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Register a component under its own name. A later registration with
    /// the same name replaces the earlier one.
    pub fn register(&mut self, component: impl Component + 'static) -> &mut Self {
        self.register_arc(Arc::new(component))
    }

    pub fn register_arc(&mut self, component: Arc<dyn Component>) -> &mut Self {
        self.0.insert(component.name().to_string(), component);
        self
    }

    /// Register every component of a package.
    pub fn register_package<C, I>(&mut self, package: I) -> &mut Self
    where
        C: Component + 'static,
        I: IntoIterator<Item = C>,
    {
        for component in package {
            self.register(component);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Component>> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.0.keys().collect();
        names.sort();
        f.debug_struct("ComponentRegistry")
            .field("component_count", &self.0.len())
            .field("component_names", &names)
            .finish()
    }
}
