//! Outward-facing resource representations

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::ledger::ParseReport;
use crate::links::{create_ca_action, ActionDescriptor};
use crate::record::CertificateRecord;

/// The certificate collection, in issuance (file) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CertificateCollection {
    /// Certificates, oldest first
    pub certificates: Vec<CertificateRecord>,
    /// Total count
    pub total: usize,
}

impl CertificateCollection {
    /// Assembles the collection from a parse pass, preserving entry order.
    pub fn from_report(report: ParseReport) -> Self {
        let certificates: Vec<CertificateRecord> = report
            .entries
            .into_iter()
            .map(CertificateRecord::from)
            .collect();
        let total = certificates.len();
        Self {
            certificates,
            total,
        }
    }
}

/// Body returned while no CA registry exists. Carries the single affordance
/// that satisfies the missing precondition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RegistryUnavailable {
    /// Human-readable description of the missing precondition
    pub error: String,
    /// How to remedy it
    pub actions: Vec<ActionDescriptor>,
}

impl RegistryUnavailable {
    pub fn no_ca() -> Self {
        Self {
            error: "no CA certificate found".to_string(),
            actions: vec![create_ca_action()],
        }
    }
}
