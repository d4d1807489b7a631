use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::classifier::{classify, ClassifiedEvent};
use crate::error::{DispatchError, UnregisteredRouteError};
use crate::handler::SharedHandler;
use crate::normalizer::normalize;
use crate::registry::Registry;

/// Resolves inbound events to registered handlers and invokes them.
///
/// Holds no per-invocation state; clones share the same registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Classifies `event`, looks up its handler, and calls it with the
    /// normalized arguments. Handler errors come back as
    /// [`DispatchError::Handler`] without modification.
    pub async fn dispatch(&self, event: Value) -> Result<Value, DispatchError> {
        let classified = classify(&self.registry, event)?;
        let handler = self.resolve(&classified)?;
        let scheme = classified.scheme();
        let key = classified.key().to_string();
        let arguments = normalize(classified)?;

        debug!(%scheme, key = %key, "start");
        handler.call(arguments).await.map_err(DispatchError::Handler)
    }

    fn resolve(&self, event: &ClassifiedEvent) -> Result<SharedHandler, UnregisteredRouteError> {
        let handler = match event {
            ClassifiedEvent::Direct { route, .. } => self
                .registry
                .find_direct(route)
                .map(|entry| entry.handler().clone()),
            ClassifiedEvent::Rest { route_key, .. } => self
                .registry
                .find_rest_key(route_key)
                .map(|entry| entry.handler().clone()),
            ClassifiedEvent::GraphQl { field_name, .. } => self
                .registry
                .find_graphql(field_name)
                .map(|entry| entry.handler().clone()),
        };

        handler.ok_or_else(|| match event {
            ClassifiedEvent::GraphQl { diagnostic, .. } => {
                UnregisteredRouteError::new(diagnostic.clone())
            }
            other => UnregisteredRouteError::new(other.key()),
        })
    }
}
