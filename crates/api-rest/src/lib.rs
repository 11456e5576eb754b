//! # API REST
//!
//! REST API implementation for medsafe.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for wire types and `medsafe-core` for all drug-data logic.

#![warn(rust_2018_idioms)]

pub mod error;

use api_shared::{
    CheckInteractionsRes, ErrorRes, GetPrecautionsRes, HealthRes, HealthService,
    IdentifyPillReq, IdentifyPillRes, Interaction, NamesReq, Precaution,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use medsafe_core::{
    DrugName, InteractionWarning, PillIdentification, PrecautionEntry, SafetyService,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Application state shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: SafetyService,
}

impl AppState {
    pub fn new(service: SafetyService) -> Self {
        Self { service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, check_interactions, get_precautions, identify_pill),
    components(schemas(
        HealthRes,
        NamesReq,
        Interaction,
        CheckInteractionsRes,
        Precaution,
        GetPrecautionsRes,
        IdentifyPillReq,
        IdentifyPillRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/medications/check-interactions", post(check_interactions))
        .route("/medications/get-precautions", post(get_precautions))
        .route("/medications/identify", post(identify_pill))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/medications/check-interactions",
    request_body = NamesReq,
    responses(
        (status = 200, description = "Interaction warnings; `error` is set when the check failed", body = CheckInteractionsRes),
        (status = 400, description = "Malformed body or too many names", body = CheckInteractionsRes)
    )
)]
/// Check a medication list for pairwise interactions
///
/// Names that cannot be resolved are left out of the check. Fewer than two resolvable drugs
/// yields an empty list.
#[axum::debug_handler]
async fn check_interactions(
    State(state): State<AppState>,
    payload: Result<Json<NamesReq>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => {
            return ApiError::from(rejection).into_envelope::<CheckInteractionsRes>();
        }
    };

    match state
        .service
        .check_interactions(&drug_names(req.names))
        .await
    {
        Ok(warnings) => Json(CheckInteractionsRes {
            interactions: warnings.into_iter().map(interaction).collect(),
            error: None,
        })
        .into_response(),
        Err(e) => ApiError::from(e).into_envelope::<CheckInteractionsRes>(),
    }
}

#[utoipa::path(
    post,
    path = "/medications/get-precautions",
    request_body = NamesReq,
    responses(
        (status = 200, description = "One precaution entry per requested name", body = GetPrecautionsRes),
        (status = 400, description = "Malformed body or too many names", body = GetPrecautionsRes)
    )
)]
/// Summarise labeling precautions per drug
///
/// Always returns one entry per requested name, in request order, using placeholder text when
/// no labeling is available.
#[axum::debug_handler]
async fn get_precautions(
    State(state): State<AppState>,
    payload: Result<Json<NamesReq>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => return ApiError::from(rejection).into_envelope::<GetPrecautionsRes>(),
    };

    match state.service.get_precautions(&drug_names(req.names)).await {
        Ok(entries) => Json(GetPrecautionsRes {
            data: entries.into_iter().map(precaution).collect(),
            error: None,
        })
        .into_response(),
        Err(e) => ApiError::from(e).into_envelope::<GetPrecautionsRes>(),
    }
}

#[utoipa::path(
    post,
    path = "/medications/identify",
    request_body = IdentifyPillReq,
    responses(
        (status = 200, description = "Pill attributes", body = IdentifyPillRes),
        (status = 400, description = "Malformed body", body = ErrorRes),
        (status = 404, description = "Name not recognised", body = ErrorRes),
        (status = 502, description = "Upstream failure", body = ErrorRes)
    )
)]
/// Identify a pill by drug name
#[axum::debug_handler]
async fn identify_pill(
    State(state): State<AppState>,
    payload: Result<Json<IdentifyPillReq>, JsonRejection>,
) -> Result<Json<IdentifyPillRes>, ApiError> {
    let Json(req) = payload?;
    let pill = state
        .service
        .identify_pill(&DrugName::from(req.name))
        .await?;
    Ok(Json(pill_res(pill)))
}

fn drug_names(names: Vec<String>) -> Vec<DrugName> {
    names.into_iter().map(DrugName::from).collect()
}

fn interaction(warning: InteractionWarning) -> Interaction {
    Interaction {
        description: warning.description,
        severity: warning.severity,
    }
}

fn precaution(entry: PrecautionEntry) -> Precaution {
    Precaution {
        name: entry.name.into_inner(),
        why: entry.why,
        precautions: entry.precautions,
    }
}

fn pill_res(pill: PillIdentification) -> IdentifyPillRes {
    IdentifyPillRes {
        id: pill.id.as_str().to_string(),
        name: pill.name.into_inner(),
        imprint: pill.imprint,
        color: pill.color,
        shape: pill.shape,
        visual_description: pill.visual_description,
    }
}
