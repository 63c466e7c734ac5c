//! Certificate lifecycle model
//!
//! A record's state is decided entirely by which grammar variant its index
//! line matched: the presence of a revocation timestamp is the authoritative
//! discriminator, never the optional reason.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::ledger::LedgerEntry;
use crate::links::{actions_for, ActionDescriptor};

/// Certificate lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CertStatus {
    /// Live; may be renewed or revoked
    Valid,
    /// Terminal; kept forever as a historical entry
    Revoked,
}

/// One certificate entry reconstructed from the index file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// Subject common name
    pub name: String,
    /// Hex serial assigned at issuance
    pub serial: String,
    /// Issuance timestamp, kept in the index file's native encoding
    pub created_at: String,
    /// Lifecycle state
    pub status: CertStatus,
    /// Revocation timestamp, present only for revoked entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<String>,
    /// Optional reason recorded alongside the revocation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_reason: Option<String>,
    /// Lifecycle transitions currently legal on this entry
    pub actions: Vec<ActionDescriptor>,
}

impl From<LedgerEntry> for CertificateRecord {
    fn from(entry: LedgerEntry) -> Self {
        match entry {
            LedgerEntry::Valid {
                created,
                serial,
                name,
            } => {
                let actions = actions_for(CertStatus::Valid, &name);
                CertificateRecord {
                    name,
                    serial,
                    created_at: created,
                    status: CertStatus::Valid,
                    revoked_at: None,
                    revocation_reason: None,
                    actions,
                }
            }
            LedgerEntry::Revoked {
                created,
                revoked,
                reason,
                serial,
                name,
            } => {
                let actions = actions_for(CertStatus::Revoked, &name);
                CertificateRecord {
                    name,
                    serial,
                    created_at: created,
                    status: CertStatus::Revoked,
                    revoked_at: Some(revoked),
                    revocation_reason: reason,
                    actions,
                }
            }
        }
    }
}
