//! Domain types for the onboarding catalog.
//!
//! Records serialize with camelCase field names so existing dashboard
//! documents load unchanged. Each collection is one [`Document`].

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::collections::Collection;

/// Canonical application identifier, `app-NNN`.
pub type ApplicationId = String;

/// Free-form infrastructure components: component name → arbitrary JSON.
pub type Components = IndexMap<String, serde_json::Value>;

/// Fields a stored record carries beyond its known schema. Kept as loaded
/// and written back on save.
pub type Extra = serde_json::Map<String, serde_json::Value>;

// ── Application ────────────────────────────────────────────────────

/// A registered application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
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
    #[serde(flatten)]
    pub extra: Extra,
}

// ── DevOps ─────────────────────────────────────────────────────────

/// DevOps metadata for one application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DevOpsRecord {
    /// Copied from the owning [`Application`].
    pub id: ApplicationId,
    pub application_name: String,
    pub repository_url: String,
    pub cicd_pipeline: CicdPipeline,
    pub code_quality: CodeQuality,
    pub monitoring: Monitoring,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CicdPipeline {
    pub provider: String,
    pub build_pipeline: String,
    pub release_pipeline: String,
    pub deployment_strategy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeQuality {
    /// Static-analysis project reference.
    pub sonar_qube: String,
    pub code_coverage: String,
    pub security_scan: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Monitoring {
    pub application_insights: String,
    pub log_analytics: String,
    pub alerts: Vec<String>,
}

// ── Infrastructure ─────────────────────────────────────────────────

/// Infrastructure footprint of one application in one environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureRecord {
    /// Copied from the owning [`Application`].
    pub id: ApplicationId,
    pub application_name: String,
    pub cloud: String,
    pub region: String,
    pub resource_group: String,
    pub components: Components,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Documents ──────────────────────────────────────────────────────

/// A whole persisted collection.
pub trait Document: Serialize + DeserializeOwned {
    const COLLECTION: Collection;
}

/// `application_details`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApplicationDocument {
    pub applications: Vec<Application>,
}

impl Document for ApplicationDocument {
    const COLLECTION: Collection = Collection::Applications;
}

/// `devops_details`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DevOpsDocument {
    pub applications: Vec<DevOpsRecord>,
}

impl Document for DevOpsDocument {
    const COLLECTION: Collection = Collection::DevOps;
}

/// `infrastructure_details`
///
/// The keys of `environments` are the only valid environment names;
/// persisted order is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InfrastructureDocument {
    pub environments: IndexMap<String, Vec<InfrastructureRecord>>,
}

impl InfrastructureDocument {
    /// Empty document with the given environments.
    pub fn with_environments<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            environments: names
                .iter()
                .map(|name| (name.as_ref().to_string(), Vec::new()))
                .collect(),
        }
    }

    pub fn environment_names(&self) -> Vec<String> {
        self.environments.keys().cloned().collect()
    }
}

impl Document for InfrastructureDocument {
    const COLLECTION: Collection = Collection::Infrastructure;
}
