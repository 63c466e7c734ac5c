//! Read path over the CA's index file
//!
//! A `Registry` holds nothing but the path and the malformed-line policy.
//! Every read reopens and reparses the file, so the result always reflects
//! the toolchain's latest write.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::ledger::{parse_ledger, MalformedLinePolicy, ParseReport};

/// Errors from the registry read path
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The index file does not exist or cannot be opened, most commonly
    /// because no CA has been created yet. Recoverable: callers advise
    /// creating a CA first.
    #[error("certificate registry unavailable: {0}")]
    Unavailable(#[source] io::Error),
    /// The index file exists but reading it failed
    #[error("failed to read certificate registry: {0}")]
    Io(#[from] io::Error),
}

/// Read-only handle on the CA's index file.
#[derive(Debug, Clone)]
pub struct Registry {
    index_path: PathBuf,
    policy: MalformedLinePolicy,
}

impl Registry {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            policy: MalformedLinePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MalformedLinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Reads and parses the index file from scratch.
    pub fn read(&self) -> Result<ParseReport, RegistryError> {
        let contents = std::fs::read_to_string(&self.index_path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                RegistryError::Unavailable(err)
            }
            _ => RegistryError::Io(err),
        })?;
        debug!(
            path = %self.index_path.display(),
            bytes = contents.len(),
            "read certificate index"
        );
        Ok(parse_ledger(&contents, self.policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_index_is_unavailable_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new(dir.path().join("index.txt"));
        match registry.read() {
            Err(RegistryError::Unavailable(_)) => {}
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn reads_reflect_latest_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.txt");
        let registry = Registry::new(&path);

        fs::write(&path, "V\t250101000000Z\t01\tunknown /CN=alice\n").unwrap();
        assert_eq!(registry.read().unwrap().entries.len(), 1);

        // The toolchain appends a revocation; the next read must see it.
        fs::write(
            &path,
            "R\t250101000000Z\t250201000000Z\t01\tunknown /CN=alice\n\
             V\t250102000000Z\t02\tunknown /CN=alice\n",
        )
        .unwrap();
        let report = registry.read().unwrap();
        assert_eq!(report.entries.len(), 2);
    }

    #[test]
    fn policy_is_applied_to_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.txt");
        fs::write(
            &path,
            "V\t250101000000Z\t01\tunknown /CN=alice\n\
             garbage\n\
             V\t250103000000Z\t03\tunknown /CN=carol\n",
        )
        .unwrap();

        let truncating = Registry::new(&path).with_policy(MalformedLinePolicy::Truncate);
        assert_eq!(truncating.read().unwrap().entries.len(), 1);

        let skipping = Registry::new(&path).with_policy(MalformedLinePolicy::Skip);
        assert_eq!(skipping.read().unwrap().entries.len(), 2);
    }
}
