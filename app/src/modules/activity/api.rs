use crate::modules::activity::service::{self, ActivityRegistry, ServiceError};
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use utoipa::{IntoParams, OpenApi, ToSchema};

#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    /// Participant emails in signup order
    pub participants: Vec<String>,
}

impl From<service::Activity> for Activity {
    fn from(value: service::Activity) -> Self {
        Self {
            description: value.description,
            schedule: value.schedule,
            max_participants: value.max_participants,
            participants: value.participants,
        }
    }
}

/// All activities keyed by name.
#[derive(Serialize, ToSchema)]
pub(crate) struct ActivityListing(BTreeMap<String, Activity>);

#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    pub detail: String,
}

#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct SignupParams {
    /// Email to register. Any string is accepted; when repeated, the last one wins.
    pub email: Option<String>,
}

impl SignupParams {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let email = pairs
            .into_iter()
            .filter(|(key, _)| key == "email")
            .map(|(_, value)| value)
            .last();
        Self { email }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum ApiError {
    #[error("Activity not found")]
    NotFound,
    #[error("Already signed up")]
    AlreadySignedUp,
    #[error("Activity is full")]
    Full,
    #[error("Missing query parameter: email")]
    MissingEmail,
    #[error("{0}")]
    BadRequest(String),
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        ApiError::BadRequest(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        ApiError::BadRequest(value.body_text())
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::Conflict => ApiError::AlreadySignedUp,
            ServiceError::Full => ApiError::Full,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::AlreadySignedUp | ApiError::Full | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MissingEmail => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = ErrorResponse {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[utoipa::path(
    get,
    path = "/activities",
    operation_id = "list-activities",
    description = "List every activity with its schedule, capacity and participants",
    summary = "List activities",
    responses(
        (status = 200, description = "Activities keyed by name", body = ActivityListing),
    ),
)]
async fn list_activities(State(registry): State<Arc<ActivityRegistry>>) -> Json<ActivityListing> {
    log::trace!("Activities API: listing activities");
    let activities = registry
        .list()
        .await
        .into_iter()
        .map(|(name, activity)| (name, Activity::from(activity)))
        .collect();
    Json(ActivityListing(activities))
}

#[utoipa::path(
    post,
    path = "/activities/{activity_name}/signup",
    operation_id = "sign-up",
    description = "Register an email for an activity. The activity name must match exactly.",
    summary = "Sign up for an activity",
    responses(
        (status = 200, description = "Signed up", body = MessageResponse),
        (status = 400, description = "Already signed up, activity full, or malformed request", body = ErrorResponse),
        (status = 404, description = "Activity not found", body = ErrorResponse),
        (status = 422, description = "Email parameter missing", body = ErrorResponse),
    ),
    params(
        ("activity_name" = String, Path, description = "Exact, case-sensitive activity name"),
        SignupParams
    )
)]
async fn sign_up(
    State(registry): State<Arc<ActivityRegistry>>,
    activity_name: Result<Path<String>, PathRejection>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(activity_name) = activity_name?;
    let Query(pairs) = query?;
    log::trace!("Activities API: signing up for [{activity_name}]");
    let email = SignupParams::from_pairs(pairs)
        .email
        .ok_or(ApiError::MissingEmail)?;
    match registry.sign_up(&activity_name, email).await {
        Ok(message) => {
            log::trace!("Activities API: signed up for [{activity_name}]");
            Ok(Json(MessageResponse { message }))
        }
        Err(e) => {
            log::trace!("Activities API: failed to sign up for [{activity_name}]: {e}");
            Err(ApiError::from(e))
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Activities", description = "Extracurricular activity signup API",),
    paths(list_activities, sign_up,),
    components(schemas(Activity, ActivityListing, MessageResponse, ErrorResponse,))
)]
pub(crate) struct Api;

impl Api {
    pub(crate) fn build_router(registry: Arc<ActivityRegistry>) -> Router {
        Router::new()
            .route("/activities", get(list_activities))
            .route("/activities/{activity_name}/signup", post(sign_up))
            .with_state(registry)
    }
}
