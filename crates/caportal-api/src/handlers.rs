//! HTTP handlers for the certificate API
//!
//! Mutating handlers delegate to the external toolchain and then re-run the
//! read path: the index file, not the subprocess result, is what the
//! response reflects.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, error, info, warn};

use caportal_registry::{CertificateCollection, Registry, RegistryError, RegistryUnavailable};

use crate::models::*;
use crate::AppState;

/// Runs the read path and maps its outcome onto the wire.
fn collection_response(registry: &Registry, success: StatusCode) -> Response {
    match registry.read() {
        Ok(report) => (success, Json(CertificateCollection::from_report(report))).into_response(),
        Err(RegistryError::Unavailable(err)) => {
            debug!(error = %err, "certificate index not present");
            (StatusCode::NOT_FOUND, Json(RegistryUnavailable::no_ca())).into_response()
        }
        Err(err) => {
            error!(error = %err, "failed to read certificate index");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                    code: Some("REGISTRY_READ_FAILED".to_string()),
                }),
            )
                .into_response()
        }
    }
}

/// List every certificate the CA has issued, in issuance order
#[utoipa::path(
    get,
    path = "/certificates",
    responses(
        (status = 200, description = "Certificate collection", body = caportal_registry::CertificateCollection),
        (status = 404, description = "No CA has been created yet", body = caportal_registry::RegistryUnavailable),
        (status = 500, description = "Registry could not be read", body = ErrorResponse)
    ),
    tag = "certificates"
)]
pub async fn list_certificates(State(state): State<Arc<AppState>>) -> Response {
    debug!("listing certificates");
    collection_response(&state.registry, StatusCode::OK)
}

/// Issue a server certificate
#[utoipa::path(
    post,
    path = "/servers/{name}",
    params(
        ("name" = String, Path, description = "Subject common name")
    ),
    request_body(content = IssueRequest, description = "Optional key passphrase"),
    responses(
        (status = 200, description = "Refreshed certificate collection", body = caportal_registry::CertificateCollection),
        (status = 404, description = "No CA has been created yet", body = caportal_registry::RegistryUnavailable),
        (status = 500, description = "Registry could not be read", body = ErrorResponse)
    ),
    tag = "certificates"
)]
pub async fn issue_server(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Option<Json<IssueRequest>>,
) -> Response {
    info!(name = %name, "issuing server certificate");
    let password = body.and_then(|Json(body)| body.password);
    if let Err(err) = state.toolchain.issue_server(&name, password).await {
        warn!(error = %err, name = %name, "toolchain invocation failed");
    }
    collection_response(&state.registry, StatusCode::OK)
}

/// Issue a client certificate
#[utoipa::path(
    post,
    path = "/clients/{name}",
    params(
        ("name" = String, Path, description = "Subject common name")
    ),
    request_body(content = IssueRequest, description = "Optional key passphrase"),
    responses(
        (status = 200, description = "Refreshed certificate collection", body = caportal_registry::CertificateCollection),
        (status = 404, description = "No CA has been created yet", body = caportal_registry::RegistryUnavailable),
        (status = 500, description = "Registry could not be read", body = ErrorResponse)
    ),
    tag = "certificates"
)]
pub async fn issue_client(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Option<Json<IssueRequest>>,
) -> Response {
    info!(name = %name, "issuing client certificate");
    let password = body.and_then(|Json(body)| body.password);
    if let Err(err) = state.toolchain.issue_client(&name, password).await {
        warn!(error = %err, name = %name, "toolchain invocation failed");
    }
    collection_response(&state.registry, StatusCode::OK)
}

/// Renew a certificate in place
#[utoipa::path(
    patch,
    path = "/certificates/{name}",
    params(
        ("name" = String, Path, description = "Subject common name")
    ),
    responses(
        (status = 200, description = "Refreshed certificate collection", body = caportal_registry::CertificateCollection),
        (status = 404, description = "No CA has been created yet", body = caportal_registry::RegistryUnavailable),
        (status = 500, description = "Registry could not be read", body = ErrorResponse)
    ),
    tag = "certificates"
)]
pub async fn renew_certificate(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    info!(name = %name, "renewing certificate");
    if let Err(err) = state.toolchain.renew(&name).await {
        warn!(error = %err, name = %name, "toolchain invocation failed");
    }
    collection_response(&state.registry, StatusCode::OK)
}

/// Revoke a certificate
#[utoipa::path(
    delete,
    path = "/certificates/{name}",
    params(
        ("name" = String, Path, description = "Subject common name")
    ),
    request_body(content = RevokeRequest, description = "Optional revocation reason"),
    responses(
        (status = 200, description = "Refreshed certificate collection", body = caportal_registry::CertificateCollection),
        (status = 404, description = "No CA has been created yet", body = caportal_registry::RegistryUnavailable),
        (status = 500, description = "Registry could not be read", body = ErrorResponse)
    ),
    tag = "certificates"
)]
pub async fn revoke_certificate(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Option<Json<RevokeRequest>>,
) -> Response {
    info!(name = %name, "revoking certificate");
    let reason = body.and_then(|Json(body)| body.reason);
    if let Err(err) = state.toolchain.revoke(&name, reason).await {
        warn!(error = %err, name = %name, "toolchain invocation failed");
    }
    collection_response(&state.registry, StatusCode::OK)
}

/// Create the CA certificate and key
#[utoipa::path(
    post,
    path = "/ca-certs",
    request_body(content = CreateCaRequest, description = "Optional profile and passphrase"),
    responses(
        (status = 201, description = "Refreshed certificate collection", body = caportal_registry::CertificateCollection),
        (status = 404, description = "CA material still absent", body = caportal_registry::RegistryUnavailable),
        (status = 500, description = "Registry could not be read", body = ErrorResponse)
    ),
    tag = "ca"
)]
pub async fn create_ca(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateCaRequest>>,
) -> Response {
    let request = body.map(|Json(body)| body).unwrap_or_default();
    let profile = request.profile.map(Into::into).unwrap_or_default();
    info!(profile = ?profile, "creating CA certificate");
    if let Err(err) = state.toolchain.create_ca(profile, request.password).await {
        warn!(error = %err, "toolchain invocation failed");
    }
    collection_response(&state.registry, StatusCode::CREATED)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
