use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::route::Endpoint;

/// Resolves `Handler::Named` references to something callable.
pub trait HandlerRegistry: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Arc<dyn Endpoint>>;
}

/// For dispatchers whose routes only carry direct handlers.
impl HandlerRegistry for () {
    fn resolve(&self, _name: &str) -> Option<Arc<dyn Endpoint>> {
        None
    }
}

/// Name-to-endpoint map.
#[derive(Clone, Default)]
pub struct Registry {
    handlers: HashMap<String, Arc<dyn Endpoint>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `endpoint` under `name`, replacing any previous entry.
    pub fn register<E>(&mut self, name: &str, endpoint: E)
    where
        E: Endpoint + 'static,
    {
        if self
            .handlers
            .insert(name.to_string(), Arc::new(endpoint))
            .is_some()
        {
            warn!(
                handler_name = %name,
                total_handlers = self.handlers.len(),
                "Replaced existing handler"
            );
        } else {
            info!(
                handler_name = %name,
                total_handlers = self.handlers.len(),
                "Handler registered successfully"
            );
        }
    }

    #[must_use]
    pub fn with<E>(mut self, name: &str, endpoint: E) -> Self
    where
        E: Endpoint + 'static,
    {
        self.register(name, endpoint);
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl HandlerRegistry for Registry {
    fn resolve(&self, name: &str) -> Option<Arc<dyn Endpoint>> {
        self.handlers.get(name).map(Arc::clone)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("handlers", &self.names())
            .finish()
    }
}
