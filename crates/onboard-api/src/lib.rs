//! onboard-api — REST API for the onboarding catalog.
//!
//! Provides axum route handlers over the registries in `onboard-registry`.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Service banner |
//! | GET | `/applications` | List all applications |
//! | POST | `/applications` | Register an application |
//! | GET | `/applications/{identifier}` | Get an application by id or name |
//! | GET | `/devops` | List DevOps records |
//! | POST | `/devops` | Attach DevOps details |
//! | GET | `/devops/{identifier}` | Get DevOps details |
//! | GET | `/infrastructure` | All environments with their records |
//! | POST | `/infrastructure` | Attach infrastructure for one environment |
//! | GET | `/infrastructure/app/{identifier}` | An application's infrastructure in every environment |
//! | GET | `/infrastructure/{environment}` | Records of one environment |
//! | GET | `/infrastructure/{environment}/{identifier}` | One record in one environment |
//! | POST | `/onboard/{application_name}` | DevOps + multi-environment infrastructure in one call |
//! | GET | `/profile/{identifier}?environment=` | Combined application profile |

pub mod handlers;

use axum::Router;
use axum::routing::{get, post};
use onboard_registry::Catalog;
use onboard_state::StateStore;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub catalog: Catalog,
}

/// Build the complete API router.
pub fn build_router(store: StateStore) -> Router {
    let state = ApiState {
        catalog: Catalog::new(store),
    };

    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/applications",
            get(handlers::list_applications).post(handlers::create_application),
        )
        .route("/applications/{identifier}", get(handlers::get_application))
        .route(
            "/devops",
            get(handlers::list_devops).post(handlers::create_devops),
        )
        .route("/devops/{identifier}", get(handlers::get_devops))
        .route(
            "/infrastructure",
            get(handlers::list_infrastructure).post(handlers::create_infrastructure),
        )
        .route(
            "/infrastructure/app/{identifier}",
            get(handlers::get_infrastructure_all_environments),
        )
        .route(
            "/infrastructure/{environment}",
            get(handlers::list_environment),
        )
        .route(
            "/infrastructure/{environment}/{identifier}",
            get(handlers::get_infrastructure),
        )
        .route("/onboard/{application_name}", post(handlers::onboard))
        .route("/profile/{identifier}", get(handlers::get_profile))
        .with_state(state)
}
