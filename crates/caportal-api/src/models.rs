//! Wire models owned by the API layer
//!
//! The certificate representations themselves live in `caportal-registry`;
//! these are the request bodies and service-level responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use caportal_easyrsa::CaProfile;

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Optional body for certificate issuance
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct IssueRequest {
    /// Passphrase for the generated key; omitted means none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Optional body for revocation
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RevokeRequest {
    /// Reason recorded alongside the revocation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// CA variable-set profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaProfileParam {
    /// Shared infrastructure CA
    Common,
    /// Per-organization CA
    Org,
}

impl From<CaProfileParam> for CaProfile {
    fn from(value: CaProfileParam) -> Self {
        match value {
            CaProfileParam::Common => CaProfile::Common,
            CaProfileParam::Org => CaProfile::Org,
        }
    }
}

/// Optional body for CA creation
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateCaRequest {
    /// Variable set to build the CA from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<CaProfileParam>,
    /// Passphrase for the CA key; omitted means none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}
