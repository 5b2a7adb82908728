//! Infrastructure registry: one record per (application, environment).
//!
//! The environments are whatever keys the persisted document carries;
//! requests naming any other environment are rejected.

use indexmap::IndexMap;
use onboard_state::{
    Application, Collection, InfrastructureDocument, InfrastructureRecord, StateStore,
};
use tracing::{info, warn};

use crate::applications::ApplicationRegistry;
use crate::error::{RegistryError, RegistryResult};
use crate::lookup;
use crate::requests::InfrastructureRequest;

/// Environment name → records in that environment.
pub type Environments = IndexMap<String, Vec<InfrastructureRecord>>;

#[derive(Clone)]
pub struct InfrastructureRegistry {
    store: StateStore,
    applications: ApplicationRegistry,
}

impl InfrastructureRegistry {
    pub fn new(store: StateStore, applications: ApplicationRegistry) -> Self {
        Self {
            store,
            applications,
        }
    }

    /// Every environment with its records.
    pub fn environments(&self) -> RegistryResult<Environments> {
        Ok(self.store.load::<InfrastructureDocument>()?.environments)
    }

    /// Records of one environment.
    pub fn list_environment(&self, environment: &str) -> RegistryResult<Vec<InfrastructureRecord>> {
        let mut doc = self.store.load::<InfrastructureDocument>()?;
        doc.environments
            .swap_remove(environment)
            .ok_or_else(|| RegistryError::EnvironmentNotFound(environment.to_string()))
    }

    /// One record in one environment.
    pub fn get_in_environment(
        &self,
        environment: &str,
        identifier: &str,
    ) -> RegistryResult<InfrastructureRecord> {
        let records = self.list_environment(environment)?;
        lookup::find(&records, identifier)
            .cloned()
            .ok_or_else(|| RegistryError::InfrastructureNotFoundIn {
                identifier: identifier.to_string(),
                environment: environment.to_string(),
            })
    }

    /// The record of `app` in `environment`, if both exist.
    pub fn find_for(
        &self,
        app: &Application,
        environment: &str,
    ) -> RegistryResult<Option<InfrastructureRecord>> {
        let doc = self.store.load::<InfrastructureDocument>()?;
        Ok(doc
            .environments
            .get(environment)
            .and_then(|records| lookup::find_owned_by(records, app))
            .cloned())
    }

    /// Every environment holding a record for `identifier`.
    ///
    /// Fails with not-found when no environment has one, even if the
    /// application itself exists.
    pub fn get_all_environments_for_app(
        &self,
        identifier: &str,
    ) -> RegistryResult<IndexMap<String, InfrastructureRecord>> {
        let doc = self.store.load::<InfrastructureDocument>()?;
        let found: IndexMap<_, _> = doc
            .environments
            .iter()
            .filter_map(|(environment, records)| {
                lookup::find(records, identifier).map(|record| (environment.clone(), record.clone()))
            })
            .collect();

        if found.is_empty() {
            return Err(RegistryError::InfrastructureNotFound(identifier.to_string()));
        }
        Ok(found)
    }

    /// Attach an infrastructure description for one environment.
    pub async fn create(&self, request: InfrastructureRequest) -> RegistryResult<InfrastructureRecord> {
        let app = self.applications.get(&request.application_name)?;

        let _guard = self.store.lock(Collection::Infrastructure).await;
        let mut doc = self.store.load::<InfrastructureDocument>()?;
        let record = Self::stage(&mut doc, &app, &request)?;
        self.store.save(&doc)?;

        info!(
            id = %record.id,
            application = %record.application_name,
            environment = %request.environment,
            "infrastructure details created"
        );
        Ok(record)
    }

    /// Validate and append a record to an in-memory document without
    /// persisting it.
    pub(crate) fn stage(
        doc: &mut InfrastructureDocument,
        app: &Application,
        request: &InfrastructureRequest,
    ) -> RegistryResult<InfrastructureRecord> {
        if !doc.environments.contains_key(&request.environment) {
            warn!(environment = %request.environment, "invalid environment");
            return Err(RegistryError::InvalidEnvironment {
                environment: request.environment.clone(),
                valid: doc.environment_names(),
            });
        }
        let records = doc
            .environments
            .entry(request.environment.clone())
            .or_default();

        if lookup::find_owned_by(records, app).is_some() {
            warn!(
                application = %app.application_name,
                environment = %request.environment,
                "infrastructure details already exist"
            );
            return Err(RegistryError::InfrastructureExists {
                application: app.application_name.clone(),
                environment: request.environment.clone(),
            });
        }

        let record = request.to_record(app);
        records.push(record.clone());
        Ok(record)
    }
}
