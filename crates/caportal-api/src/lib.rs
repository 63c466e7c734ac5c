//! REST façade over an easy-rsa certificate authority
//!
//! Exposes the certificate registry as JSON resources with hypermedia
//! affordances. The service never writes the registry itself: mutations go
//! through the external toolchain and the response is always whatever the
//! next ledger read shows.

pub mod handlers;
pub mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use caportal_easyrsa::CaToolchain;
use caportal_registry::Registry;

/// Application state shared across handlers
pub struct AppState {
    pub registry: Registry,
    pub toolchain: Arc<dyn CaToolchain>,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CA Portal API",
        version = "0.1.0",
        description = "REST facade over an easy-rsa certificate authority",
    ),
    paths(
        handlers::list_certificates,
        handlers::issue_server,
        handlers::issue_client,
        handlers::renew_certificate,
        handlers::revoke_certificate,
        handlers::create_ca,
        handlers::health_check,
    ),
    components(schemas(
        caportal_registry::CertificateCollection,
        caportal_registry::CertificateRecord,
        caportal_registry::CertStatus,
        caportal_registry::ActionDescriptor,
        caportal_registry::RegistryUnavailable,
        models::ErrorResponse,
        models::IssueRequest,
        models::RevokeRequest,
        models::CreateCaRequest,
        models::CaProfileParam,
        models::HealthResponse,
    )),
    tags(
        (name = "certificates", description = "Certificate listing and lifecycle endpoints"),
        (name = "ca", description = "CA material endpoints"),
        (name = "system", description = "System health and info endpoints")
    )
)]
struct ApiDoc;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Enable CORS (for development dashboards)
    pub enable_cors: bool,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            enable_cors: true,
        }
    }
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(
        config: ApiServerConfig,
        registry: Registry,
        toolchain: Arc<dyn CaToolchain>,
    ) -> Self {
        let state = Arc::new(AppState {
            registry,
            toolchain,
        });
        Self { config, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let api_doc = ApiDoc::openapi();

        let api_router = Router::new()
            .route("/certificates", get(handlers::list_certificates))
            .route(
                "/certificates/{name}",
                patch(handlers::renew_certificate).delete(handlers::revoke_certificate),
            )
            .route("/servers/{name}", post(handlers::issue_server))
            .route("/clients/{name}", post(handlers::issue_client))
            .route("/ca-certs", post(handlers::create_ca))
            .route("/api/health", get(handlers::health_check))
            .with_state(self.state.clone());

        let mut router = Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", api_doc))
            .merge(api_router)
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_headers(Any)
                .allow_origin(Any);
            router = router.layer(cors);
        }

        router
    }

    /// Start the API server
    pub async fn start(self) -> Result<(), anyhow::Error> {
        let router = self.build_router();

        info!("Starting API server on {}", self.config.bind_addr);
        info!(
            "OpenAPI spec: http://{}/api/openapi.json",
            self.config.bind_addr
        );
        info!("Swagger UI: http://{}/swagger-ui", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        axum::serve(listener, router)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        Ok(())
    }
}
