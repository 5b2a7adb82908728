//! Application registry.

use onboard_state::{Application, ApplicationDocument, Collection, StateStore};
use tracing::{info, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::ids;
use crate::lookup;
use crate::requests::ApplicationRequest;

#[derive(Clone)]
pub struct ApplicationRegistry {
    store: StateStore,
}

impl ApplicationRegistry {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    /// The whole collection, in stored order.
    pub fn list(&self) -> RegistryResult<Vec<Application>> {
        Ok(self.store.load::<ApplicationDocument>()?.applications)
    }

    /// Resolve an application by identifier or name.
    pub fn get(&self, identifier: &str) -> RegistryResult<Application> {
        let doc = self.store.load::<ApplicationDocument>()?;
        lookup::find(&doc.applications, identifier)
            .cloned()
            .ok_or_else(|| RegistryError::ApplicationNotFound(identifier.to_string()))
    }

    /// Register a new application under the next free identifier.
    pub async fn create(&self, request: ApplicationRequest) -> RegistryResult<Application> {
        let _guard = self.store.lock(Collection::Applications).await;
        let mut doc = self.store.load::<ApplicationDocument>()?;

        if lookup::find(&doc.applications, &request.application_name).is_some() {
            warn!(name = %request.application_name, "application already exists");
            return Err(RegistryError::ApplicationExists(request.application_name));
        }

        let id = ids::next_id(&doc.applications);
        let app = request.into_application(id);
        doc.applications.push(app.clone());
        self.store.save(&doc)?;

        info!(id = %app.id, name = %app.application_name, "application created");
        Ok(app)
    }
}
