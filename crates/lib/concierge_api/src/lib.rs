//! # concierge_api
//!
//! HTTP API library for Concierge: session gate, Notion workspace proxy,
//! inquiry intake and public site configuration.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use concierge_core::cache::ResponseCache;
use concierge_core::mail::{DynMailClient, HttpMailClient};
use concierge_core::notion::{HttpNotionConnector, NotionConnector, NotionError};
use concierge_core::session::{JwtSessionCodec, SessionCodec};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ApiConfig;
use crate::handlers::{health, inquiry, notion, session, site, workspace};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Session token codec.
    pub sessions: Arc<dyn SessionCodec>,
    /// Builds Notion clients for a given integration key.
    pub notion: Arc<dyn NotionConnector>,
    /// Transactional mail; `None` when not configured.
    pub mailer: Option<DynMailClient>,
    /// Cached proxy reads, revalidated by mutations.
    pub cache: Arc<RwLock<ResponseCache>>,
}

impl AppState {
    /// Wire production collaborators from configuration.
    pub fn from_config(config: ApiConfig) -> Result<Self, NotionError> {
        let mailer: Option<DynMailClient> = match config.mail.api_key.as_deref() {
            Some(key) => match HttpMailClient::new(&config.mail.base_url, key, &config.mail.from) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    warn!(error = %e, "mail client disabled");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            sessions: Arc::new(JwtSessionCodec::new(config.session_secret.clone())),
            notion: Arc::new(HttpNotionConnector::new(&config.notion_base_url)?),
            mailer,
            cache: Arc::new(RwLock::new(ResponseCache::new())),
            config,
        })
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes
    let public = Router::new()
        .route(routes::API_HEALTH, get(health::health_handler))
        .route(routes::API_SITE_CONFIG, get(site::site_config_handler))
        .route(routes::API_INQUIRY, post(inquiry::submit_inquiry_handler))
        .route(
            routes::API_AUTH_SESSION,
            get(session::session_status_handler)
                .post(session::create_session_handler)
                .delete(session::delete_session_handler),
        )
        .route(routes::API_AUTH_LOGOUT, post(session::delete_session_handler));

    // Workspace routes; the session gate below covers their prefixes.
    let protected = Router::new()
        .route(routes::WORKSPACE, get(workspace::workspace_handler))
        .route(
            routes::NOTION_DATABASES,
            get(notion::list_databases_handler).post(notion::create_database_handler),
        )
        .route(
            routes::NOTION_DATABASE,
            get(notion::get_database_handler)
                .patch(notion::update_database_handler)
                .delete(notion::archive_database_handler),
        )
        .route(
            routes::NOTION_DATABASE_DUPLICATE,
            post(notion::duplicate_database_handler),
        )
        .route(
            routes::NOTION_DATABASE_CHILDREN,
            get(notion::database_children_handler),
        )
        .route(
            routes::NOTION_PAGES,
            get(notion::list_pages_handler).post(notion::create_page_handler),
        )
        .route(
            routes::NOTION_PAGE,
            get(notion::get_page_handler)
                .patch(notion::update_page_handler)
                .delete(notion::archive_page_handler),
        )
        .route(routes::NOTION_PAGE_DUPLICATE, post(notion::duplicate_page_handler))
        .route(routes::NOTION_PAGE_CHILDREN, get(notion::page_children_handler))
        .route(routes::NOTION_SEARCH, post(notion::search_handler));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session::session_gate,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
