use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use server_api::{create_contact, delete_contact, list_contacts, ApiContext};
use shared::{
    domain::{Contact, ContactDraft, ContactId},
    error::{ApiError, ErrorCode},
    protocol::{CreateContactResponse, DeleteContactResponse, HealthStatus, CONTACTS_ROUTE},
};
use storage::Storage;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_database_url};

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

const MAX_BODY_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let cors = cors_layer(settings.frontend_url.as_deref())?;
    let app = build_router(Arc::new(AppState {
        api: ApiContext { storage },
    }))
    .layer(cors);

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, allowed_origin = ?settings.frontend_url, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/healthz", get(healthz))
        .route(
            CONTACTS_ROUTE,
            get(http_list_contacts).post(http_create_contact),
        )
        .route("/api/contacts/:id", delete(http_delete_contact))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(frontend_url: Option<&str>) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);
    match frontend_url {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin)
                .with_context(|| format!("invalid frontend origin '{origin}'"))?;
            Ok(cors.allow_origin(origin))
        }
        None => Ok(cors.allow_origin(Any)),
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::InvalidPayload => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::StorageUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::running())
}

async fn healthz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match state.api.storage.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(error) => {
            let error = format!("{error:#}");
            warn!(%error, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

async fn http_list_contacts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Contact>>> {
    let contacts = list_contacts(&state.api).await.map_err(reject)?;
    Ok(Json(contacts))
}

async fn http_create_contact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateContactResponse>)> {
    let Json(draft) = payload.map_err(|rejection| {
        (
            rejection.status(),
            Json(ApiError::new(
                ErrorCode::InvalidPayload,
                rejection.body_text(),
            )),
        )
    })?;
    let contact = create_contact(&state.api, draft).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(CreateContactResponse { contact })))
}

async fn http_delete_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteContactResponse>> {
    let outcome = delete_contact(&state.api, ContactId(id))
        .await
        .map_err(reject)?;
    Ok(Json(outcome))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
