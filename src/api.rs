use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    clients::{health::HealthChecker, mailer::Mailer, pdf::DocumentRenderer},
    config::Config,
    error::SubmissionError,
    models::{
        form::FormLayout,
        health::HealthStatus,
        response::{MessageResponse, SERVER_RUNNING_MESSAGE},
    },
    utils::{process_submission, send_test_email},
};

pub struct AppState {
    config: Arc<Config>,
    form: FormLayout,
    renderer: DocumentRenderer,
    mailer: Arc<dyn Mailer>,
    health_checker: HealthChecker,
}

impl AppState {
    pub fn new(config: Config, mailer: Arc<dyn Mailer>) -> Self {
        let config = Arc::new(config);

        Self {
            form: FormLayout::for_kind(config.form_kind),
            renderer: DocumentRenderer::default(),
            health_checker: HealthChecker::new(Arc::clone(&config), Arc::clone(&mailer)),
            config,
            mailer,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Result<Router, Error> {
    let cors = cors_layer(&state.config.cors_allowed_origin)?;

    Ok(Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/submit-form", post(submit_form))
        .route("/test-email", get(test_email))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(origin: &str) -> Result<CorsLayer, Error> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|_| anyhow!("Invalid CORS origin: {}", origin))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]))
}

pub async fn run_api_server(config: Config, mailer: Arc<dyn Mailer>) -> Result<(), Error> {
    let port = config.port;
    let state = Arc::new(AppState::new(config, mailer));

    info!(
        form_kind = state.config.form_kind.as_str(),
        form_title = state.form.title(),
        allowed_origin = %state.config.cors_allowed_origin,
        "Form submission service configured"
    );

    let app = build_router(state)?;

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Form submission server started");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn home() -> Json<MessageResponse> {
    Json(MessageResponse::new(SERVER_RUNNING_MESSAGE))
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_checker.check_all().await;

    let status_code = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<MessageResponse>, SubmissionError> {
    let response = process_submission(
        &body,
        &state.config,
        &state.form,
        &state.renderer,
        state.mailer.as_ref(),
    )
    .await?;

    Ok(Json(response))
}

async fn test_email(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, SubmissionError> {
    let response = send_test_email(&state.config, state.mailer.as_ref()).await?;

    Ok(Json(response))
}
