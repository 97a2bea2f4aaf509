use crate::api::{self, AppState};
use axum::http::{HeaderValue, Method};
use axum::{
    routing::{delete, get, post},
    Router,
};
use profile_explorer_lib::ProfileStore;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::{event, Level};

pub fn router<S: ProfileStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/directory", get(api::get_directory::<S>))
        .route("/directory/error", delete(api::clear_error::<S>))
        .route(
            "/profiles",
            get(api::list_profiles::<S>).post(api::add_profile::<S>),
        )
        .route("/profiles/filtered", get(api::list_filtered::<S>))
        .route("/profiles/search", post(api::search_profiles::<S>))
        .route(
            "/profiles/:id",
            get(api::get_profile::<S>)
                .patch(api::update_profile::<S>)
                .delete(api::delete_profile::<S>),
        )
        .route("/profiles/:id/map", get(api::profile_map::<S>))
        .route("/profiles/:id/geocode", post(api::geocode_profile::<S>))
        .with_state(state)
}

pub fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        // allow any headers
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_origin(origins))
}

pub async fn start_webserver(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    event!(Level::INFO, %addr, "API server listening");

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_err() {
                event!(Level::WARN, "Could not listen for Ctrl+C");
            }
        })
        .await?;

    event!(Level::INFO, "API server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_explorer_lib::{
        MockProfileStore, OsmLinkRenderer, ProfileDirectory, StaticGeocoder,
    };
    use std::sync::Arc;

    #[test]
    fn routes_do_not_conflict() {
        let state = AppState::new(
            Arc::new(ProfileDirectory::new(MockProfileStore::new())),
            Arc::new(StaticGeocoder::new()),
            Arc::new(OsmLinkRenderer::default()),
        );
        let _ = router(state);
    }

    #[test]
    fn cors_rejects_malformed_origins() {
        assert!(cors_layer(&["http://localhost:3000".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}
