//! Hypermedia affordance derivation
//!
//! Affordances are a pure function of a record's lifecycle state; they never
//! consult anything beyond the record itself. Paths are keyed by subject
//! name, so historical entries sharing a name resolve to the same path.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::record::CertStatus;

/// A follow-up action currently legal on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ActionDescriptor {
    /// Relation name of the action
    pub relation: String,
    /// HTTP verb (or named operation) the client should use
    pub action: String,
    /// Target path
    pub path: String,
}

impl ActionDescriptor {
    pub fn new(
        relation: impl Into<String>,
        action: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            relation: relation.into(),
            action: action.into(),
            path: path.into(),
        }
    }
}

/// Actions legal on a certificate in the given state.
pub fn actions_for(status: CertStatus, name: &str) -> Vec<ActionDescriptor> {
    match status {
        CertStatus::Valid => vec![
            ActionDescriptor::new("renew", "PATCH", format!("/certificates/{name}")),
            ActionDescriptor::new("revoke", "DELETE", format!("/certificates/{name}")),
        ],
        // Terminal state: no transition leaves it.
        CertStatus::Revoked => Vec::new(),
    }
}

/// The one affordance offered while no CA registry exists yet. This is the
/// only action not derived from a record.
pub fn create_ca_action() -> ActionDescriptor {
    ActionDescriptor::new("create", "create-ca", "/ca-certs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_certificates_offer_renew_and_revoke() {
        let actions = actions_for(CertStatus::Valid, "alice");
        assert_eq!(
            actions,
            vec![
                ActionDescriptor::new("renew", "PATCH", "/certificates/alice"),
                ActionDescriptor::new("revoke", "DELETE", "/certificates/alice"),
            ]
        );
    }

    #[test]
    fn revoked_certificates_offer_nothing() {
        assert!(actions_for(CertStatus::Revoked, "bob").is_empty());
    }

    #[test]
    fn reissued_certificates_share_a_path() {
        // Identity is name-addressed: two generations of the same subject
        // point at the same resource path.
        let first = actions_for(CertStatus::Valid, "alice");
        let second = actions_for(CertStatus::Valid, "alice");
        assert_eq!(first[0].path, second[0].path);
    }

    #[test]
    fn create_ca_action_points_at_ca_collection() {
        let action = create_ca_action();
        assert_eq!(action.relation, "create");
        assert_eq!(action.action, "create-ca");
        assert_eq!(action.path, "/ca-certs");
    }
}
