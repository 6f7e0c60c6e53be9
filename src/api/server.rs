//! HTTP server: routes, handlers, and graceful shutdown

use super::{error::ApiError, views};
use crate::config::ServerConfig;
use crate::error::AvaliacaoError;
use crate::export::{self, EXPORT_FILENAME, XLSX_CONTENT_TYPE};
use crate::storage::FeedbackStore;
use crate::types::{ChartData, NewFeedback};
use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Per-request context handed to every handler
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn FeedbackStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn FeedbackStore>) -> Self {
        Self { store }
    }
}

/// Build router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_handler).post(submit_handler))
        .route("/confirmacao", get(confirmation_handler))
        .route("/exportar_excel", get(export_handler))
        .route("/grafico_dados", get(chart_data_handler))
        .route("/relatorios", get(report_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// HTTP server
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ServerConfig, store: Arc<dyn FeedbackStore>) -> Self {
        Self {
            config,
            state: AppState::new(store),
        }
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = build_router(self.state);

        let listener = TcpListener::bind(self.config.addr).await?;
        info!("Feedback server listening on http://{}", self.config.addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Submitted form fields; every field may be missing
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackForm {
    pub respondent_name: Option<String>,
    pub attendant_name: Option<String>,
    pub rating: Option<String>,
    pub comment: Option<String>,
}

impl FeedbackForm {
    /// Blank optional fields become absent; the rating must parse as an integer
    pub fn into_feedback(self) -> Result<NewFeedback, AvaliacaoError> {
        let rating = self
            .rating
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .parse::<i64>()
            .map_err(|_| {
                AvaliacaoError::Validation("rating must be a whole number from 1 to 5".to_string())
            })?;

        Ok(NewFeedback {
            respondent_name: non_blank(self.respondent_name),
            attendant_name: self.attendant_name.unwrap_or_default(),
            rating,
            comment: non_blank(self.comment),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub atendente: Option<String>,
}

async fn form_handler() -> Html<String> {
    Html(views::form_page(None))
}

async fn submit_handler(
    State(state): State<AppState>,
    form: Result<Form<FeedbackForm>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let Form(form) = form?;
    let feedback = form.into_feedback()?;
    let id = state.store.insert(&feedback).await?;

    info!("Feedback {} recorded for {}", id, feedback.attendant_name);
    Ok(Redirect::to("/confirmacao"))
}

async fn confirmation_handler() -> Html<String> {
    Html(views::confirmation_page())
}

async fn report_handler(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Html<String>, ApiError> {
    let filter = query.atendente.unwrap_or_default();
    let records = state.store.filter_by_attendant(&filter).await?;

    debug!("Report for '{}': {} records", filter, records.len());
    Ok(Html(views::report_page(&filter, &records)))
}

async fn chart_data_handler(State(state): State<AppState>) -> Result<Json<ChartData>, ApiError> {
    let averages = state.store.average_by_attendant().await?;
    Ok(Json(ChartData::from(averages)))
}

async fn export_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.store.export_all().await?;
    let count = records.len();

    let bytes = tokio::task::spawn_blocking(move || export::render_xlsx(&records))
        .await
        .map_err(|e| AvaliacaoError::Export(format!("Export task failed: {}", e)))??;

    info!("Exported {} records ({} bytes)", count, bytes.len());

    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILENAME);
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Health check handler
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    records: usize,
}

async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let records = state.store.count().await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        records,
    }))
}
