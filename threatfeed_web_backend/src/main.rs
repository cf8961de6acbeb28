mod page;
mod routes;
mod session;

use std::{path::PathBuf, sync::Arc};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde_json::json;
use session::SessionStore;
use thiserror::Error;
use threatfeed_core::{boot::boot_system, Connection, ConnectionErr};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the dashboard database.
    db_dir: PathBuf,

    #[arg(short, long, default_value = "0.0.0.0:8080")]
    bind: String,

    /// Seed the database from this directory before serving.
    #[arg(long)]
    boot: Option<PathBuf>,
}

#[derive(Error, Debug)]
pub enum AppErr {
    #[error(transparent)]
    ConnectionErr(#[from] ConnectionErr),
    #[error("Login required.")]
    UnauthorizedErr,
    #[error("Invalid {field}: \"{value}\".")]
    InvalidFieldErr { field: &'static str, value: String },
    #[error("Database task failed: {0}")]
    TaskErr(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppErr {
    fn into_response(self) -> Response {
        let status = match &self {
            AppErr::ConnectionErr(_) | AppErr::TaskErr(_) => {
                error!("request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppErr::UnauthorizedErr => StatusCode::UNAUTHORIZED,
            AppErr::InvalidFieldErr { .. } => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_dir: Arc<PathBuf>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(db_dir: PathBuf) -> Self {
        Self {
            db_dir: Arc::new(db_dir),
            sessions: SessionStore::default(),
        }
    }

    /// Runs `query` against a fresh connection on the blocking pool so
    /// SQLite work stays off the async workers.
    pub async fn with_connection<T, F>(&self, query: F) -> Result<T, AppErr>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, ConnectionErr> + Send + 'static,
    {
        let db_dir = self.db_dir.clone();
        let result = tokio::task::spawn_blocking(move || {
            let connection = Connection::new(db_dir.as_path())?;
            query(&connection)
        })
        .await?;
        Ok(result?)
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async {}))
        .route("/login", get(routes::login_form).post(routes::login))
        .route("/logout", post(routes::logout))
        .route("/", get(routes::dashboard))
        .route("/incidents", post(routes::log_incident))
        .route("/api/incidents", get(routes::incidents))
        .route("/api/metrics", get(routes::metrics))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
pub async fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env).init();

    let args = Args::parse();

    if let Some(data_dir) = &args.boot {
        match boot_system(&args.db_dir, data_dir) {
            Ok(report) => info!("boot finished for {} sources", report.sources.len()),
            Err(err) => {
                error!("boot failed: {}", err);
                std::process::exit(1);
            }
        }
    }

    let listener = match tokio::net::TcpListener::bind(&args.bind).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {}: {}", args.bind, err);
            std::process::exit(1);
        }
    };
    info!("serving dashboard on {}", args.bind);

    if let Err(err) = axum::serve(listener, app(AppState::new(args.db_dir))).await {
        error!("server error: {}", err);
    }
}
