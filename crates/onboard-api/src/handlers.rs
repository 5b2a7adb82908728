//! REST API handlers.
//!
//! Each handler calls one registry operation and returns JSON. Registry
//! errors map to status codes by kind: not found → 404, conflict → 409,
//! invalid environment → 400, storage failures → 500. Malformed bodies are
//! rejected by the `Json` extractor before a handler runs.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::error;

use onboard_registry::*;
use onboard_state::InfrastructureRecord;

use crate::ApiState;

/// Error body for every failed request.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: msg.to_string(),
        }),
    )
}

fn registry_error(e: RegistryError) -> Response {
    let status = match e.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::InvalidEnvironment => StatusCode::BAD_REQUEST,
        ErrorKind::CorruptData | ErrorKind::PersistenceFailure => {
            error!(kind = %e.kind(), error = %e, "storage failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(&e.to_string(), status).into_response()
}

fn respond<T: Serialize>(result: RegistryResult<T>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => registry_error(e),
    }
}

// ── Banner ─────────────────────────────────────────────────────

/// GET /
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Bots Dashboard API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ── Applications ───────────────────────────────────────────────

/// GET /applications
pub async fn list_applications(State(state): State<ApiState>) -> Response {
    respond(state.catalog.applications.list())
}

/// GET /applications/{identifier}
pub async fn get_application(
    State(state): State<ApiState>,
    Path(identifier): Path<String>,
) -> Response {
    respond(state.catalog.applications.get(&identifier))
}

/// POST /applications
pub async fn create_application(
    State(state): State<ApiState>,
    Json(req): Json<ApplicationRequest>,
) -> Response {
    match state.catalog.applications.create(req).await {
        Ok(application) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "Application created successfully",
                "application": application,
            })),
        )
            .into_response(),
        Err(e) => registry_error(e),
    }
}

// ── DevOps ─────────────────────────────────────────────────────

/// GET /devops
pub async fn list_devops(State(state): State<ApiState>) -> Response {
    respond(state.catalog.devops.list())
}

/// GET /devops/{identifier}
pub async fn get_devops(
    State(state): State<ApiState>,
    Path(identifier): Path<String>,
) -> Response {
    respond(state.catalog.devops.get(&identifier))
}

/// POST /devops
pub async fn create_devops(
    State(state): State<ApiState>,
    Json(req): Json<DevOpsRequest>,
) -> Response {
    match state.catalog.devops.create(req).await {
        Ok(devops) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "DevOps details created successfully",
                "devops": devops,
            })),
        )
            .into_response(),
        Err(e) => registry_error(e),
    }
}

// ── Infrastructure ─────────────────────────────────────────────

/// GET /infrastructure
pub async fn list_infrastructure(State(state): State<ApiState>) -> Response {
    respond(state.catalog.infrastructure.environments())
}

/// GET /infrastructure/{environment}
pub async fn list_environment(
    State(state): State<ApiState>,
    Path(environment): Path<String>,
) -> Response {
    respond(state.catalog.infrastructure.list_environment(&environment))
}

/// GET /infrastructure/{environment}/{identifier}
pub async fn get_infrastructure(
    State(state): State<ApiState>,
    Path((environment, identifier)): Path<(String, String)>,
) -> Response {
    respond(
        state
            .catalog
            .infrastructure
            .get_in_environment(&environment, &identifier),
    )
}

/// An application's records keyed by environment.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppInfrastructure {
    application_name: String,
    environments: IndexMap<String, InfrastructureRecord>,
}

/// GET /infrastructure/app/{identifier}
pub async fn get_infrastructure_all_environments(
    State(state): State<ApiState>,
    Path(identifier): Path<String>,
) -> Response {
    let result = state
        .catalog
        .infrastructure
        .get_all_environments_for_app(&identifier)
        .map(|environments| AppInfrastructure {
            application_name: identifier,
            environments,
        });
    respond(result)
}

/// POST /infrastructure
pub async fn create_infrastructure(
    State(state): State<ApiState>,
    Json(req): Json<InfrastructureRequest>,
) -> Response {
    let environment = req.environment.clone();
    match state.catalog.infrastructure.create(req).await {
        Ok(infrastructure) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": format!(
                    "Infrastructure details created successfully for {environment} environment"
                ),
                "infrastructure": infrastructure,
            })),
        )
            .into_response(),
        Err(e) => registry_error(e),
    }
}

// ── Onboarding ─────────────────────────────────────────────────

/// Body of POST /onboard/{application_name}.
#[derive(Debug, Deserialize)]
pub struct OnboardRequest {
    #[serde(alias = "devops_request")]
    pub devops: DevOpsRequest,
    #[serde(alias = "infrastructure_requests")]
    pub infrastructure: Vec<InfrastructureRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OnboardResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    application_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    results: OnboardingResults,
}

impl From<OnboardingResult> for OnboardResponse {
    fn from(result: OnboardingResult) -> Self {
        match result {
            OnboardingResult::Completed {
                application_name,
                results,
            } => Self {
                message: "Application onboarding completed",
                application_name: Some(application_name),
                error: None,
                results,
            },
            OnboardingResult::InfrastructureNotSaved { error, results, .. } => Self {
                message: "Partial success - DevOps saved but infrastructure save failed",
                application_name: None,
                error: Some(error),
                results,
            },
        }
    }
}

/// POST /onboard/{application_name}
pub async fn onboard(
    State(state): State<ApiState>,
    Path(application_name): Path<String>,
    Json(req): Json<OnboardRequest>,
) -> Response {
    let result = state
        .catalog
        .onboarding
        .onboard(&application_name, req.devops, req.infrastructure)
        .await;
    respond(result.map(OnboardResponse::from))
}

// ── Profile ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub environment: Option<String>,
}

/// GET /profile/{identifier}?environment=
pub async fn get_profile(
    State(state): State<ApiState>,
    Path(identifier): Path<String>,
    Query(query): Query<ProfileQuery>,
) -> Response {
    let environment = query.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT);
    respond(state.catalog.profile(&identifier, environment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_state::StateStore;

    fn test_state() -> ApiState {
        let store = StateStore::open_in_memory().unwrap();
        store.seed(&["development", "staging", "production"]).unwrap();
        ApiState {
            catalog: Catalog::new(store),
        }
    }

    fn app_request(name: &str) -> ApplicationRequest {
        serde_json::from_value(serde_json::json!({
            "applicationName": name,
            "displayName": name,
            "type": "api",
            "description": "",
            "version": "0.1.0",
            "status": "active",
            "owner": "team",
            "maintainer": "team@example.com",
            "tags": []
        }))
        .unwrap()
    }

    fn infra_request(name: &str, environment: &str) -> InfrastructureRequest {
        serde_json::from_value(serde_json::json!({
            "applicationName": name,
            "environment": environment,
            "cloud": "aws",
            "region": "eu-west-1",
            "resourceGroup": "rg",
            "components": {}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn list_applications_empty() {
        let resp = list_applications(State(test_state())).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_and_get_application() {
        let state = test_state();

        let resp = create_application(State(state.clone()), Json(app_request("api"))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = get_application(State(state), Path("app-001".to_string())).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn duplicate_application_is_conflict() {
        let state = test_state();
        create_application(State(state.clone()), Json(app_request("api"))).await;

        let resp = create_application(State(state), Json(app_request("api"))).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn get_nonexistent_application() {
        let resp = get_application(State(test_state()), Path("nope".to_string())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_environment_is_bad_request() {
        let state = test_state();
        create_application(State(state.clone()), Json(app_request("api"))).await;

        let resp = create_infrastructure(State(state), Json(infra_request("api", "qa"))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn infrastructure_for_missing_application_is_not_found() {
        let resp =
            create_infrastructure(State(test_state()), Json(infra_request("ghost", "staging")))
                .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_environment_listing_is_not_found() {
        let resp = list_environment(State(test_state()), Path("qa".to_string())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn corrupt_collection_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("application_details.json"), "[1, 2").unwrap();
        let state = ApiState {
            catalog: Catalog::new(StateStore::open_dir(dir.path()).unwrap()),
        };

        let resp = list_applications(State(state)).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn profile_defaults_to_production() {
        let state = test_state();
        create_application(State(state.clone()), Json(app_request("api"))).await;

        let resp = get_profile(
            State(state),
            Path("api".to_string()),
            Query(ProfileQuery { environment: None }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn partial_success_response_shape() {
        let response = OnboardResponse::from(OnboardingResult::InfrastructureNotSaved {
            application_name: "api".to_string(),
            error: "error saving infrastructure_details: disk full".to_string(),
            results: OnboardingResults {
                devops: Outcome::Exists {
                    message: "DevOps details already exist".to_string(),
                },
                infrastructure: Vec::new(),
            },
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json["message"],
            "Partial success - DevOps saved but infrastructure save failed"
        );
        assert_eq!(json["error"], "error saving infrastructure_details: disk full");
        assert!(json.get("applicationName").is_none());
        assert_eq!(json["results"]["devops"]["status"], "exists");
    }
}
