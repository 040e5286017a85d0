//! `pactload broker`: pacts from a pact broker.
//!
//! Settings come from an optional YAML config file; flags override the
//! individual fields. Values may hold `${...}` placeholders either way.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use pactload_broker::AuthConfig;
use pactload_core::ProviderName;
use pactload_loader::{load_config_at, BrokerLoaderConfig, PactBrokerLoader, PactLoader};

use super::report;

/// Arguments for `pactload broker`.
#[derive(Args, Debug)]
pub struct BrokerArgs {
    /// Provider to load pacts for.
    #[arg(long)]
    pub provider: String,

    /// Loader config file (YAML).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<String>,

    #[arg(long)]
    pub scheme: Option<String>,

    /// Tag expression; repeatable. Replaces the configured tags.
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Consumer inclusion expression; repeatable. Replaces the configured list.
    #[arg(long = "consumer")]
    pub consumers: Vec<String>,

    #[arg(long)]
    pub auth_scheme: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long)]
    pub token: Option<String>,

    /// Succeed even when no pacts are found.
    #[arg(long)]
    pub allow_empty: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl BrokerArgs {
    pub fn run(self) -> Result<()> {
        let config = self.build_config()?;
        let fail_if_empty = config.fail_if_no_pacts_found;
        let provider = ProviderName::from(self.provider.as_str());

        let mut loader = PactBrokerLoader::new(config);
        let pacts = loader
            .load(&provider)
            .with_context(|| format!("failed to load pacts for provider '{provider}'"))?;

        if pacts.is_empty() && fail_if_empty {
            bail!(
                "no pacts found for provider '{provider}' in {} (pass --allow-empty to accept)",
                loader.description()
            );
        }
        report::print(&loader.description(), &pacts, self.json)
    }

    fn build_config(&self) -> Result<BrokerLoaderConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_at(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => BrokerLoaderConfig::default(),
        };

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = &self.port {
            config.port = port.clone();
        }
        if let Some(scheme) = &self.scheme {
            config.scheme = scheme.clone();
        }
        if !self.tags.is_empty() {
            config.tags = self.tags.clone();
        }
        if !self.consumers.is_empty() {
            config.consumers = self.consumers.clone();
        }
        if self.allow_empty {
            config.fail_if_no_pacts_found = false;
        }
        if let Some(auth) = self.auth_overrides(config.authentication.take()) {
            config.authentication = Some(auth);
        }
        Ok(config)
    }

    /// Apply any auth flags on top of the configured authentication.
    fn auth_overrides(&self, configured: Option<AuthConfig>) -> Option<AuthConfig> {
        let any_flag = self.auth_scheme.is_some()
            || self.username.is_some()
            || self.password.is_some()
            || self.token.is_some();
        if !any_flag {
            return configured;
        }
        let mut auth = configured.unwrap_or_default();
        if let Some(scheme) = &self.auth_scheme {
            auth.scheme = Some(scheme.clone());
        }
        if let Some(username) = &self.username {
            auth.username = username.clone();
        }
        if let Some(password) = &self.password {
            auth.password = password.clone();
        }
        if let Some(token) = &self.token {
            auth.token = token.clone();
        }
        Some(auth)
    }
}
