//! Collaborator interface to the external easy-rsa toolchain
//!
//! The toolchain is the only writer of the CA's on-disk state. Its exit
//! status is advisory at best: after any invocation the caller re-reads the
//! index file to learn what actually happened, so failures here are logged
//! rather than trusted.

pub mod easyrsa;
pub mod toolchain;

pub use easyrsa::{EasyRsa, EasyRsaConfig};
pub use toolchain::{CaProfile, CaToolchain, ToolchainError};

#[cfg(any(test, feature = "mock"))]
pub use toolchain::MockCaToolchain;
