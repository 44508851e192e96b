use anyhow::{Context, anyhow};
use axum::{
    Router,
    routing::{get, post},
};
use config::Config;
use database::db::create_connection;
use log::info;
use migration::{Migrator, MigratorTrait};
use routes::{auth::AccessClaims, course, enrollment, health, import, registration, root};
use state::AppState;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utils::shutdown::shutdown_signal;

mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;

    let db = create_connection(&config.database_url)
        .await
        .context("failed to connect to the database")?;
    Migrator::up(&db, None)
        .await
        .context("failed to run database migrations")?;

    let oauth2_resource_server = <OAuth2ResourceServer<AccessClaims>>::builder()
        .issuer_url(config.oidc_issuer_url.as_str())
        .build()
        .await
        .map_err(|err| anyhow!("failed to build OAuth2ResourceServer: {err:?}"))?;

    let protected = Router::new()
        .route(
            "/registration",
            get(registration::get_registration).put(registration::set_registration),
        )
        .route("/courses", get(course::get_courses))
        .route("/courses/import", post(import::import_courses))
        .route("/courses/{id}", get(course::get_course_by_id))
        .route("/enrollments", post(enrollment::enroll))
        .route("/enrollments/manual", post(enrollment::enroll_manual))
        .route("/enrollments/export", get(enrollment::export_enrollments))
        .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer()));

    let app = Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route("/openapi.json", get(doc::openapi_json))
        .merge(protected)
        .layer(CompressionLayer::new())
        .with_state(AppState::new(db, config.utc_offset, config.staff_roles));

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    info!("Running axum on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
