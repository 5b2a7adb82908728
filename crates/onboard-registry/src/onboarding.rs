//! Onboarding orchestrator for DevOps plus multi-environment infrastructure
//! in one call.
//!
//! Only a missing application aborts the call. Every other failure is
//! reported per item: the DevOps step and each infrastructure request get
//! their own [`Outcome`], and infrastructure items are persisted together
//! with a single save at the end.

use onboard_state::{
    Collection, DevOpsRecord, InfrastructureDocument, InfrastructureRecord, StateStore,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::applications::ApplicationRegistry;
use crate::devops::DevOpsRegistry;
use crate::error::{RegistryError, RegistryResult};
use crate::infrastructure::InfrastructureRegistry;
use crate::requests::{DevOpsRequest, InfrastructureRequest};

/// Result of one onboarding step.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome<T> {
    Created { data: T },
    Exists { message: String },
    Error { message: String },
}

impl<T> Outcome<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Outcome::Created { .. })
    }
}

/// Outcome of one infrastructure request, tagged with its environment.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnvironmentOutcome {
    pub environment: String,
    #[serde(flatten)]
    pub outcome: Outcome<InfrastructureRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OnboardingResults {
    pub devops: Outcome<DevOpsRecord>,
    /// One entry per infrastructure request, in request order.
    pub infrastructure: Vec<EnvironmentOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingResult {
    /// Every step ran and the infrastructure document was saved.
    Completed {
        application_name: String,
        results: OnboardingResults,
    },
    /// The DevOps step already persisted, but saving the staged
    /// infrastructure records failed. `results` still lists every item.
    InfrastructureNotSaved {
        application_name: String,
        error: String,
        results: OnboardingResults,
    },
}

impl OnboardingResult {
    pub fn results(&self) -> &OnboardingResults {
        match self {
            OnboardingResult::Completed { results, .. }
            | OnboardingResult::InfrastructureNotSaved { results, .. } => results,
        }
    }
}

#[derive(Clone)]
pub struct Onboarding {
    store: StateStore,
    applications: ApplicationRegistry,
    devops: DevOpsRegistry,
}

impl Onboarding {
    pub fn new(store: StateStore, applications: ApplicationRegistry, devops: DevOpsRegistry) -> Self {
        Self {
            store,
            applications,
            devops,
        }
    }

    /// Onboard DevOps and infrastructure details for an existing application.
    pub async fn onboard(
        &self,
        application_name: &str,
        devops: DevOpsRequest,
        infrastructure: Vec<InfrastructureRequest>,
    ) -> RegistryResult<OnboardingResult> {
        let app = self.applications.get(application_name)?;

        let devops = match self.devops.create_for(&app, devops).await {
            Ok(record) => Outcome::Created { data: record },
            Err(RegistryError::DevOpsExists(_)) => Outcome::Exists {
                message: "DevOps details already exist".to_string(),
            },
            Err(e) => {
                warn!(application = %app.application_name, error = %e, "devops onboarding failed");
                Outcome::Error {
                    message: e.to_string(),
                }
            }
        };

        let _guard = self.store.lock(Collection::Infrastructure).await;
        let mut doc = self.store.load::<InfrastructureDocument>()?;

        let items = infrastructure
            .iter()
            .map(|request| {
                let outcome = match InfrastructureRegistry::stage(&mut doc, &app, request) {
                    Ok(record) => Outcome::Created { data: record },
                    Err(RegistryError::InfrastructureExists { .. }) => Outcome::Exists {
                        message: "Infrastructure details already exist".to_string(),
                    },
                    Err(e) => Outcome::Error {
                        message: e.to_string(),
                    },
                };
                EnvironmentOutcome {
                    environment: request.environment.clone(),
                    outcome,
                }
            })
            .collect::<Vec<_>>();

        let results = OnboardingResults {
            devops,
            infrastructure: items,
        };
        let application_name = app.application_name;

        if let Err(e) = self.store.save(&doc) {
            warn!(application = %application_name, error = %e, "infrastructure save failed");
            return Ok(OnboardingResult::InfrastructureNotSaved {
                application_name,
                error: e.to_string(),
                results,
            });
        }

        let created = results
            .infrastructure
            .iter()
            .filter(|item| item.outcome.is_created())
            .count();
        info!(
            application = %application_name,
            devops_created = results.devops.is_created(),
            infrastructure_created = created,
            "application onboarding completed"
        );
        Ok(OnboardingResult::Completed {
            application_name,
            results,
        })
    }
}
