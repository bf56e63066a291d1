//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::ChatService;
use crate::config::Settings;
use crate::infrastructure::access::HttpAccessClient;
use crate::infrastructure::database::{self, TxManager};
use crate::infrastructure::persistence::PgChatPersistence;
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging, AdmissionGate};
use crate::presentation::stream::RoomHub;
use crate::shared::deadline::DeadlineGuard;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub chat_service: Arc<ChatService>,
    pub hub: Arc<RoomHub>,
    pub admission: Arc<AdmissionGate>,
    pub deadline: Arc<DeadlineGuard>,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        // Create database pool and bring the schema up to date
        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        database::run_migrations(&db).await?;
        tracing::info!("Database migrations applied");

        // Wire the dispatcher: access client, transactional persistence, hub
        let access = Arc::new(HttpAccessClient::new(&settings.access)?);
        let persistence = Arc::new(PgChatPersistence::new(TxManager::new(db.clone())));
        let hub = Arc::new(RoomHub::new(settings.hub.mailbox_capacity));
        let chat_service = Arc::new(ChatService::new(access, persistence, hub.clone()));

        let admission = Arc::new(AdmissionGate::new(
            settings.admission.capacity,
            Duration::from_millis(settings.admission.refill_interval_ms),
        ));
        let deadline = Arc::new(DeadlineGuard::new(Duration::from_millis(
            settings.deadline.request_timeout_ms,
        )));

        // Create app state
        let state = AppState {
            db,
            chat_service,
            hub,
            admission,
            deadline,
            settings: Arc::new(settings.clone()),
        };

        // Build router with middleware
        let router = routes::create_router(state)
            .layer(logging::create_trace_layer())
            .layer(cors::create_cors_layer(&settings.cors));

        // Bind to address
        let addr: SocketAddr = settings.server_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
