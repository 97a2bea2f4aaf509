use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use profile_explorer_lib::map::DETAIL_ZOOM;
use profile_explorer_lib::{
    DirectoryState, FormError, Geocoder, MapRenderer, MapView, Profile, ProfileDirectory,
    ProfileForm, ProfilePatch, ProfileStore,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Shared by every request: one directory session plus the map collaborators.
pub struct AppState<S: ProfileStore> {
    pub directory: Arc<ProfileDirectory<S>>,
    pub geocoder: Arc<dyn Geocoder>,
    pub renderer: Arc<dyn MapRenderer>,
}

impl<S: ProfileStore> AppState<S> {
    pub fn new(
        directory: Arc<ProfileDirectory<S>>,
        geocoder: Arc<dyn Geocoder>,
        renderer: Arc<dyn MapRenderer>,
    ) -> Self {
        Self {
            directory,
            geocoder,
            renderer,
        }
    }
}

impl<S: ProfileStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            geocoder: self.geocoder.clone(),
            renderer: self.renderer.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Profile not found")]
    ProfileNotFound,
    #[error(transparent)]
    InvalidForm(#[from] FormError),
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::ProfileNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidForm(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct MapQuery {
    pub zoom: Option<u8>,
}

#[derive(Serialize, Debug)]
pub struct MapResponse {
    #[serde(flatten)]
    pub view: MapView,
    pub url: String,
}

pub async fn get_directory<S: ProfileStore>(
    State(state): State<AppState<S>>,
) -> Json<DirectoryState> {
    Json(state.directory.snapshot())
}

pub async fn list_profiles<S: ProfileStore>(State(state): State<AppState<S>>) -> Json<Vec<Profile>> {
    Json(state.directory.profiles())
}

pub async fn list_filtered<S: ProfileStore>(
    State(state): State<AppState<S>>,
) -> Json<Vec<Profile>> {
    Json(state.directory.filtered_profiles())
}

#[instrument(skip(state))]
pub async fn search_profiles<S: ProfileStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<SearchRequest>,
) -> Json<Vec<Profile>> {
    event!(Level::INFO, "Processing Search Request");
    state.directory.search_profiles(&request.query);
    Json(state.directory.filtered_profiles())
}

#[instrument(skip(state, form))]
pub async fn add_profile<S: ProfileStore>(
    State(state): State<AppState<S>>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<DirectoryState>, ApiError> {
    event!(Level::INFO, "Processing Add Request");
    let profile = form.into_new_profile()?;
    state.directory.add_profile(profile).await;
    Ok(Json(state.directory.snapshot()))
}

pub async fn get_profile<S: ProfileStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    state
        .directory
        .find_profile(&id)
        .map(Json)
        .ok_or(ApiError::ProfileNotFound)
}

#[instrument(skip(state, patch))]
pub async fn update_profile<S: ProfileStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> Json<DirectoryState> {
    event!(Level::INFO, "Processing Update Request");
    state.directory.update_profile(&id, patch).await;
    Json(state.directory.snapshot())
}

#[instrument(skip(state))]
pub async fn delete_profile<S: ProfileStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Json<DirectoryState> {
    event!(Level::INFO, "Processing Delete Request");
    state.directory.delete_profile(&id).await;
    Json(state.directory.snapshot())
}

pub async fn profile_map<S: ProfileStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Query(query): Query<MapQuery>,
) -> Result<Json<MapResponse>, ApiError> {
    let profile = state
        .directory
        .find_profile(&id)
        .ok_or(ApiError::ProfileNotFound)?;

    let view = MapView::for_profile(&profile, query.zoom.unwrap_or(DETAIL_ZOOM));
    let url = state.renderer.render(&view);
    Ok(Json(MapResponse { view, url }))
}

#[instrument(skip(state))]
pub async fn geocode_profile<S: ProfileStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Json<DirectoryState> {
    event!(Level::INFO, "Processing Geocode Request");
    state
        .directory
        .geocode_profile(&id, state.geocoder.as_ref())
        .await;
    Json(state.directory.snapshot())
}

pub async fn clear_error<S: ProfileStore>(
    State(state): State<AppState<S>>,
) -> Json<DirectoryState> {
    state.directory.clear_error();
    Json(state.directory.snapshot())
}
