//! Request bodies accepted by the registries.
//!
//! Field values are copied into records verbatim; shape validation happens
//! when the body is deserialized.

use onboard_state::{
    Application, ApplicationId, CicdPipeline, CodeQuality, Components, DevOpsRecord, Extra,
    InfrastructureRecord, Monitoring,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub application_name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub app_type: String,
    pub description: String,
    pub version: String,
    pub status: String,
    pub owner: String,
    pub maintainer: String,
    pub tags: Vec<String>,
}

impl ApplicationRequest {
    pub(crate) fn into_application(self, id: ApplicationId) -> Application {
        Application {
            id,
            application_name: self.application_name,
            display_name: self.display_name,
            app_type: self.app_type,
            description: self.description,
            version: self.version,
            status: self.status,
            owner: self.owner,
            maintainer: self.maintainer,
            tags: self.tags,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DevOpsRequest {
    pub application_name: String,
    pub repository_url: String,
    pub cicd_pipeline: CicdPipeline,
    pub code_quality: CodeQuality,
    pub monitoring: Monitoring,
}

impl DevOpsRequest {
    pub(crate) fn into_record(self, owner: &Application) -> DevOpsRecord {
        DevOpsRecord {
            id: owner.id.clone(),
            application_name: owner.application_name.clone(),
            repository_url: self.repository_url,
            cicd_pipeline: self.cicd_pipeline,
            code_quality: self.code_quality,
            monitoring: self.monitoring,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureRequest {
    pub application_name: String,
    pub environment: String,
    pub cloud: String,
    pub region: String,
    pub resource_group: String,
    pub components: Components,
}

impl InfrastructureRequest {
    pub(crate) fn to_record(&self, owner: &Application) -> InfrastructureRecord {
        InfrastructureRecord {
            id: owner.id.clone(),
            application_name: owner.application_name.clone(),
            cloud: self.cloud.clone(),
            region: self.region.clone(),
            resource_group: self.resource_group.clone(),
            components: self.components.clone(),
            extra: Extra::new(),
        }
    }
}
