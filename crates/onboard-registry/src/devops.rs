//! DevOps registry. At most one DevOps record per application.

use onboard_state::{Application, Collection, DevOpsDocument, DevOpsRecord, StateStore};
use tracing::{info, warn};

use crate::applications::ApplicationRegistry;
use crate::error::{RegistryError, RegistryResult};
use crate::lookup;
use crate::requests::DevOpsRequest;

#[derive(Clone)]
pub struct DevOpsRegistry {
    store: StateStore,
    applications: ApplicationRegistry,
}

impl DevOpsRegistry {
    pub fn new(store: StateStore, applications: ApplicationRegistry) -> Self {
        Self {
            store,
            applications,
        }
    }

    pub fn list(&self) -> RegistryResult<Vec<DevOpsRecord>> {
        Ok(self.store.load::<DevOpsDocument>()?.applications)
    }

    pub fn get(&self, identifier: &str) -> RegistryResult<DevOpsRecord> {
        let doc = self.store.load::<DevOpsDocument>()?;
        lookup::find(&doc.applications, identifier)
            .cloned()
            .ok_or_else(|| RegistryError::DevOpsNotFound(identifier.to_string()))
    }

    /// The DevOps record of `app`, if one exists.
    pub fn find_for(&self, app: &Application) -> RegistryResult<Option<DevOpsRecord>> {
        let doc = self.store.load::<DevOpsDocument>()?;
        Ok(lookup::find_owned_by(&doc.applications, app).cloned())
    }

    /// Attach DevOps metadata to an existing application.
    pub async fn create(&self, request: DevOpsRequest) -> RegistryResult<DevOpsRecord> {
        let app = self.applications.get(&request.application_name)?;
        self.create_for(&app, request).await
    }

    /// Create for an application that has already been resolved.
    pub(crate) async fn create_for(
        &self,
        app: &Application,
        request: DevOpsRequest,
    ) -> RegistryResult<DevOpsRecord> {
        let _guard = self.store.lock(Collection::DevOps).await;
        let mut doc = self.store.load::<DevOpsDocument>()?;

        if lookup::find_owned_by(&doc.applications, app).is_some() {
            warn!(application = %app.application_name, "devops details already exist");
            return Err(RegistryError::DevOpsExists(app.application_name.clone()));
        }

        let record = request.into_record(app);
        doc.applications.push(record.clone());
        self.store.save(&doc)?;

        info!(id = %record.id, application = %record.application_name, "devops details created");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testutil::*;

    fn registries() -> (StateStore, ApplicationRegistry, DevOpsRegistry) {
        let store = seeded_store();
        let applications = ApplicationRegistry::new(store.clone());
        let devops = DevOpsRegistry::new(store.clone(), applications.clone());
        (store, applications, devops)
    }

    #[tokio::test]
    async fn create_copies_application_identifier() {
        let (_, applications, devops) = registries();
        applications.create(app_request("billing")).await.unwrap();
        let search = applications.create(app_request("search")).await.unwrap();

        let record = devops.create(devops_request("search")).await.unwrap();
        assert_eq!(record.id, search.id);
        assert_eq!(record.application_name, "search");
        assert_eq!(record.monitoring.alerts, vec!["cpu-high", "error-rate"]);
    }

    #[tokio::test]
    async fn create_by_identifier_stores_canonical_name() {
        let (_, applications, devops) = registries();
        applications.create(app_request("billing")).await.unwrap();

        let record = devops.create(devops_request("app-001")).await.unwrap();
        assert_eq!(record.id, "app-001");
        assert_eq!(record.application_name, "billing");
    }

    #[tokio::test]
    async fn missing_application_is_not_found_and_writes_nothing() {
        let (store, _, devops) = registries();
        let before = store.load::<DevOpsDocument>().unwrap();

        let err = devops.create(devops_request("ghost")).await.unwrap_err();
        assert!(matches!(err, RegistryError::ApplicationNotFound(_)));
        assert_eq!(store.load::<DevOpsDocument>().unwrap(), before);
    }

    #[tokio::test]
    async fn second_record_for_application_is_conflict() {
        let (store, applications, devops) = registries();
        applications.create(app_request("billing")).await.unwrap();
        devops.create(devops_request("billing")).await.unwrap();

        let err = devops.create(devops_request("billing")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // Addressing the same application by id is the same conflict.
        let err = devops.create(devops_request("app-001")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(store.load::<DevOpsDocument>().unwrap().applications.len(), 1);
    }

    #[tokio::test]
    async fn get_by_id_or_name() {
        let (_, applications, devops) = registries();
        applications.create(app_request("billing")).await.unwrap();
        let created = devops.create(devops_request("billing")).await.unwrap();

        assert_eq!(devops.get("app-001").unwrap(), created);
        assert_eq!(devops.get("billing").unwrap(), created);
        assert!(matches!(
            devops.get("search"),
            Err(RegistryError::DevOpsNotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_returns_records_in_order() {
        let (_, applications, devops) = registries();
        for name in ["billing", "search"] {
            applications.create(app_request(name)).await.unwrap();
        }
        devops.create(devops_request("search")).await.unwrap();
        devops.create(devops_request("billing")).await.unwrap();

        let names: Vec<_> = devops
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.application_name)
            .collect();
        assert_eq!(names, vec!["search", "billing"]);
    }

    #[tokio::test]
    async fn record_of_application_named_like_another_id_is_not_shared() {
        let (store, applications, devops) = registries();
        let first = applications.create(app_request("app-002")).await.unwrap();
        let search = applications.create(app_request("search")).await.unwrap();
        assert_eq!(first.id, "app-001");
        assert_eq!(search.id, "app-002");

        devops.create(devops_request("app-002")).await.unwrap();
        assert_eq!(devops.find_for(&search).unwrap(), None);

        let record = devops.create(devops_request("search")).await.unwrap();
        assert_eq!(record.id, "app-002");
        assert_eq!(record.application_name, "search");
        assert_eq!(devops.find_for(&search).unwrap(), Some(record));
        assert_eq!(store.load::<DevOpsDocument>().unwrap().applications.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_for_one_application_keep_one_record() {
        let (store, applications, devops) = registries();
        applications.create(app_request("billing")).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let devops = devops.clone();
                tokio::spawn(async move { devops.create(devops_request("billing")).await })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => {
                    assert_eq!(e.kind(), ErrorKind::Conflict);
                    conflicts += 1;
                }
            }
        }
        assert_eq!(created, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(store.load::<DevOpsDocument>().unwrap().applications.len(), 1);
    }
}
