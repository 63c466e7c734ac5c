//! The `CaToolchain` trait: every operation the CA performs on our behalf

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from invoking the toolchain binary.
///
/// None of these mean the registry changed or didn't: the index file is the
/// source of truth either way.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// The binary could not be spawned
    #[error("failed to launch CA toolchain: {0}")]
    Spawn(#[from] std::io::Error),
    /// The invocation outlived its deadline. Transient: the registry is
    /// re-read afterward regardless.
    #[error("CA toolchain invocation timed out after {0:?}")]
    TimedOut(Duration),
}

/// Variable set used when building the CA certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaProfile {
    #[default]
    Common,
    Org,
}

impl CaProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaProfile::Common => "common",
            CaProfile::Org => "org",
        }
    }
}

/// Operations delegated to the external CA toolchain.
///
/// Implementations perform the actual key generation and signing; callers
/// learn the outcome by re-reading the index file, never from the return
/// value alone. A `None` password maps to the toolchain's `nopass` argument.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CaToolchain: Send + Sync {
    /// Build the CA certificate and key (`build-ca`).
    async fn create_ca(
        &self,
        profile: CaProfile,
        password: Option<String>,
    ) -> Result<(), ToolchainError>;

    /// Issue a server certificate (`build-server-full`).
    async fn issue_server(
        &self,
        name: &str,
        password: Option<String>,
    ) -> Result<(), ToolchainError>;

    /// Issue a client certificate (`build-client-full`).
    async fn issue_client(
        &self,
        name: &str,
        password: Option<String>,
    ) -> Result<(), ToolchainError>;

    /// Reissue a certificate in place (`renew`).
    async fn renew(&self, name: &str) -> Result<(), ToolchainError>;

    /// Terminate a certificate (`revoke`), with an optional reason that ends
    /// up in the index file's revocation field.
    async fn revoke(&self, name: &str, reason: Option<String>) -> Result<(), ToolchainError>;
}
