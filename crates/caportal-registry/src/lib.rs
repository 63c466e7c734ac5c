//! Certificate registry model for an easy-rsa backed CA
//!
//! Reconstructs certificate lifecycle state from the CA's append-only index
//! file and derives the hypermedia actions a client may legally take next.
//! The registry is read-only from this side: the external toolchain is the
//! only writer, and every read reparses the file from scratch.

pub mod ledger;
pub mod links;
pub mod record;
pub mod registry;
pub mod resource;

pub use ledger::{parse_ledger, LedgerEntry, MalformedLinePolicy, ParseReport};
pub use links::{actions_for, create_ca_action, ActionDescriptor};
pub use record::{CertStatus, CertificateRecord};
pub use registry::{Registry, RegistryError};
pub use resource::{CertificateCollection, RegistryUnavailable};
