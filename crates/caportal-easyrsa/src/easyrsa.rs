//! Shells out to the easy-rsa entry script

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::toolchain::{CaProfile, CaToolchain, ToolchainError};

/// Configuration for the easy-rsa invocation.
#[derive(Debug, Clone)]
pub struct EasyRsaConfig {
    /// Path to the easy-rsa entry script
    pub binary: PathBuf,
    /// Directory the script runs in; its `pki/` tree lives beneath it
    pub working_dir: PathBuf,
    /// Upper bound on a single invocation
    pub timeout: Duration,
}

impl Default for EasyRsaConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("/usr/share/easy-rsa/easyrsa"),
            working_dir: PathBuf::from("."),
            timeout: Duration::from_secs(60),
        }
    }
}

/// `CaToolchain` backed by the real easy-rsa script.
#[derive(Debug, Clone)]
pub struct EasyRsa {
    config: EasyRsaConfig,
}

impl EasyRsa {
    pub fn new(config: EasyRsaConfig) -> Self {
        Self { config }
    }

    async fn run(&self, args: Vec<String>) -> Result<(), ToolchainError> {
        debug!(binary = %self.config.binary.display(), ?args, "invoking easy-rsa");

        let mut child = Command::new(&self.config.binary)
            .args(&args)
            .current_dir(&self.config.working_dir)
            .env("EASYRSA_BATCH", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let status = match timeout(self.config.timeout, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                child.start_kill().ok();
                return Err(ToolchainError::TimedOut(self.config.timeout));
            }
        };

        // The index file, not the exit status, tells callers what happened;
        // a failure here is only worth a log line.
        if !status.success() {
            warn!(?args, code = status.code(), "easy-rsa exited non-zero");
        }
        Ok(())
    }
}

fn password_arg(password: Option<String>) -> String {
    password.unwrap_or_else(|| "nopass".to_string())
}

fn create_ca_args(profile: CaProfile, password: Option<String>) -> Vec<String> {
    vec![
        format!("--vars=vars.{}", profile.as_str()),
        "build-ca".to_string(),
        password_arg(password),
    ]
}

fn issue_args(subcommand: &str, name: &str, password: Option<String>) -> Vec<String> {
    vec![
        subcommand.to_string(),
        name.to_string(),
        password_arg(password),
    ]
}

fn renew_args(name: &str) -> Vec<String> {
    vec!["renew".to_string(), name.to_string(), "nopass".to_string()]
}

fn revoke_args(name: &str, reason: Option<String>) -> Vec<String> {
    let mut args = vec!["revoke".to_string(), name.to_string()];
    if let Some(reason) = reason {
        args.push(reason);
    }
    args
}

#[async_trait]
impl CaToolchain for EasyRsa {
    async fn create_ca(
        &self,
        profile: CaProfile,
        password: Option<String>,
    ) -> Result<(), ToolchainError> {
        self.run(create_ca_args(profile, password)).await
    }

    async fn issue_server(
        &self,
        name: &str,
        password: Option<String>,
    ) -> Result<(), ToolchainError> {
        self.run(issue_args("build-server-full", name, password))
            .await
    }

    async fn issue_client(
        &self,
        name: &str,
        password: Option<String>,
    ) -> Result<(), ToolchainError> {
        self.run(issue_args("build-client-full", name, password))
            .await
    }

    async fn renew(&self, name: &str) -> Result<(), ToolchainError> {
        self.run(renew_args(name)).await
    }

    async fn revoke(&self, name: &str, reason: Option<String>) -> Result<(), ToolchainError> {
        self.run(revoke_args(name, reason)).await
    }
}
