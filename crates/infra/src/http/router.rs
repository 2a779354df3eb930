//! Logical target → origin client routing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use stakeadmin_domain::{ApiError, BaseTarget, ClientConfig};
use tracing::debug;

use super::client::OriginClient;

/// Maps each [`BaseTarget`] to its origin and memoizes one client per origin.
///
/// Origins are fixed at construction. Targets that share an origin share the
/// client and its connection pool.
#[derive(Debug)]
pub struct BaseRouter {
    origins: HashMap<BaseTarget, String>,
    timeout: Duration,
    clients: RwLock<HashMap<String, Arc<OriginClient>>>,
}

impl BaseRouter {
    pub fn new(config: &ClientConfig) -> Self {
        let origins =
            BaseTarget::ALL.iter().map(|target| (*target, config.origin_for(*target))).collect();
        Self { origins, timeout: config.request_timeout(), clients: RwLock::new(HashMap::new()) }
    }

    /// Origin a target resolves to
    pub fn origin(&self, target: BaseTarget) -> &str {
        self.origins.get(&target).map_or(stakeadmin_domain::constants::DEFAULT_ORIGIN, String::as_str)
    }

    /// Client for `target`, constructed on first use of its origin.
    ///
    /// Concurrent first uses of one origin construct a single client.
    ///
    /// # Errors
    ///
    /// Returns an error only if the TLS backend cannot be initialised.
    pub fn resolve(&self, target: BaseTarget) -> Result<Arc<OriginClient>, ApiError> {
        let origin = self.origin(target);
        if let Some(client) = self.clients.read().get(origin) {
            return Ok(Arc::clone(client));
        }

        let mut clients = self.clients.write();
        if let Some(client) = clients.get(origin) {
            return Ok(Arc::clone(client));
        }
        let client = Arc::new(OriginClient::builder(origin).timeout(self.timeout).build()?);
        clients.insert(origin.to_string(), Arc::clone(&client));
        debug!(%target, origin, "created client for origin");
        Ok(client)
    }

    /// Number of distinct clients created so far
    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }
}
