//! onboard-registry — consistency and composition rules of the catalog.
//!
//! Three registries own the three collections. DevOps and infrastructure
//! records may only be written for an application that already exists and
//! always carry that application's identifier. The [`Onboarding`]
//! orchestrator composes both registries into one call that reports a
//! result per item instead of failing as a whole, and [`Catalog::profile`]
//! joins all three collections for one application.

pub mod applications;
pub mod devops;
pub mod error;
pub mod ids;
pub mod infrastructure;
pub mod lookup;
pub mod onboarding;
pub mod profile;
pub mod requests;

pub use applications::ApplicationRegistry;
pub use devops::DevOpsRegistry;
pub use error::{ErrorKind, RegistryError, RegistryResult};
pub use infrastructure::InfrastructureRegistry;
pub use onboarding::{EnvironmentOutcome, Onboarding, OnboardingResult, OnboardingResults, Outcome};
pub use profile::{DEFAULT_ENVIRONMENT, Profile};
pub use requests::{ApplicationRequest, DevOpsRequest, InfrastructureRequest};

use onboard_state::StateStore;

/// All registries over one store.
#[derive(Clone)]
pub struct Catalog {
    pub applications: ApplicationRegistry,
    pub devops: DevOpsRegistry,
    pub infrastructure: InfrastructureRegistry,
    pub onboarding: Onboarding,
}

impl Catalog {
    pub fn new(store: StateStore) -> Self {
        let applications = ApplicationRegistry::new(store.clone());
        let devops = DevOpsRegistry::new(store.clone(), applications.clone());
        let infrastructure = InfrastructureRegistry::new(store.clone(), applications.clone());
        let onboarding = Onboarding::new(store, applications.clone(), devops.clone());
        Self {
            applications,
            devops,
            infrastructure,
            onboarding,
        }
    }
}
