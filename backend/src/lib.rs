//! # Attendance Tracker Backend
//!
//! HTTP server for logging office attendance and measuring it against
//! targets. Layered the usual way:
//!
//! - **storage**: SQLite persistence behind traits
//! - **domain**: services holding the business rules
//! - **io**: REST endpoints translating HTTP to service calls
//!
//! Period arithmetic itself lives in the `shared` crate.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    AttendanceService, Clock, ExportService, HolidayService, SummaryService, SystemClock,
    TargetService, UserService,
};
use crate::io::rest;
use crate::storage::{
    AttendanceRepository, AttendanceStorage, DbConnection, HolidayRepository, TargetRepository,
    TargetStorage, UserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub attendance_service: AttendanceService,
    pub holiday_service: HolidayService,
    pub summary_service: SummaryService,
    pub target_service: TargetService,
    pub export_service: ExportService,
}

pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url).await?;
    Ok(initialize_backend_with(db, Arc::new(SystemClock), config))
}

/// Wire services over an existing connection and clock
pub fn initialize_backend_with(db: DbConnection, clock: Arc<dyn Clock>, config: &AppConfig) -> AppState {
    info!("Setting up domain services");
    let logs: Arc<dyn AttendanceStorage> = Arc::new(AttendanceRepository::new(db.clone()));
    let targets: Arc<dyn TargetStorage> = Arc::new(TargetRepository::new(db.clone()));

    let holiday_service = HolidayService::new(
        Arc::new(HolidayRepository::new(db.clone())),
        config.default_region.clone(),
    );
    let user_service = UserService::new(
        Arc::new(UserRepository::new(db)),
        clock.clone(),
        config.default_target_percentage,
    );
    let attendance_service = AttendanceService::new(logs.clone(), clock.clone());
    let summary_service = SummaryService::new(logs.clone(), holiday_service.clone(), clock.clone());
    let target_service = TargetService::new(targets.clone(), summary_service.clone(), clock.clone());
    let export_service = ExportService::new(logs, targets, holiday_service.clone(), clock);

    AppState {
        user_service,
        attendance_service,
        holiday_service,
        summary_service,
        target_service,
        export_service,
    }
}

pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/users", rest::user_apis::router())
        .nest("/attendance", rest::attendance_apis::router())
        .nest("/holidays", rest::holiday_apis::router())
        .nest("/targets", rest::target_apis::router())
        .nest("/export", rest::export_apis::router());

    Ok(Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}

async fn health() -> &'static str {
    "OK"
}
