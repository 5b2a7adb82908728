//! Profile composition: one application joined with its DevOps record and
//! its infrastructure in a single environment.

use onboard_state::{Application, DevOpsRecord, InfrastructureRecord};
use serde::Serialize;
use tracing::warn;

use crate::Catalog;
use crate::error::RegistryResult;

/// Environment used when a profile request names none.
pub const DEFAULT_ENVIRONMENT: &str = "production";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Profile {
    pub application: Application,
    pub devops: Option<DevOpsRecord>,
    pub infrastructure: Option<InfrastructureRecord>,
    pub environment: String,
}

impl Catalog {
    /// Combined view of an application.
    ///
    /// Only a missing application is an error. A missing DevOps record, an
    /// unknown environment, or an unreadable DevOps/infrastructure
    /// collection leave the corresponding field empty.
    pub fn profile(&self, identifier: &str, environment: &str) -> RegistryResult<Profile> {
        let application = self.applications.get(identifier)?;

        let devops = self.devops.find_for(&application).unwrap_or_else(|e| {
            warn!(application = %application.application_name, error = %e, "devops lookup failed");
            None
        });
        let infrastructure = self
            .infrastructure
            .find_for(&application, environment)
            .unwrap_or_else(|e| {
                warn!(
                    application = %application.application_name,
                    environment,
                    error = %e,
                    "infrastructure lookup failed"
                );
                None
            });

        Ok(Profile {
            application,
            devops,
            infrastructure,
            environment: environment.to_string(),
        })
    }
}
