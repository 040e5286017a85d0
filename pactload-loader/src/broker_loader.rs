//! Pact broker loader.
//!
//! ## `load`: per-tag pipeline
//!
//! 1. Expand the configured tag expressions (none configured → one untagged pass).
//! 2. Per tag: resolve the endpoint, build a client, fetch consumers.
//! 3. Fail with [`LoadError::NoPactsFound`] if nothing was fetched and
//!    `fail_if_no_pacts_found` is set.
//! 4. Apply the consumer inclusion filter.
//! 5. Download each consumer's pact and record it in the registry.
//!
//! With explicit tags, a tag that finds no pacts is skipped so the remaining
//! tags still contribute. The untagged pass has nothing to fall back on and
//! propagates the failure.

use std::sync::Arc;
use std::time::Duration;

use pactload_broker::{
    display_url_for_provider, fetch_consumers, BrokerClient, BrokerEndpoint, HalTransport,
    UreqTransport, LATEST,
};
use pactload_core::{
    parse_expression, parse_list_expression, PactDocument, PactRegistry, ProviderName,
    ValueResolver,
};

use crate::config::{resolver_or_default, BrokerLoaderConfig};
use crate::error::LoadError;
use crate::filter::filter_consumers;
use crate::source::PactSource;
use crate::PactLoader;

/// Loads pacts for a provider from a pact broker.
pub struct PactBrokerLoader {
    config: BrokerLoaderConfig,
    transport: Arc<dyn HalTransport>,
    value_resolver: Option<Box<dyn ValueResolver>>,
    pact_source: PactSource,
}

impl PactBrokerLoader {
    /// Loader using a `ureq` transport, honouring `timeout_secs`.
    pub fn new(config: BrokerLoaderConfig) -> Self {
        let transport = match config.timeout_secs {
            Some(secs) => UreqTransport::with_timeout(Duration::from_secs(secs)),
            None => UreqTransport::new(),
        };
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(config: BrokerLoaderConfig, transport: Arc<dyn HalTransport>) -> Self {
        let pact_source = PactSource::Broker {
            scheme: config.scheme.clone(),
            host: config.host.clone(),
            port: config.port.clone(),
            pacts: PactRegistry::new(),
        };
        Self {
            config,
            transport,
            value_resolver: None,
            pact_source,
        }
    }

    pub fn config(&self) -> &BrokerLoaderConfig {
        &self.config
    }

    pub fn is_fail_if_no_pacts_found(&self) -> bool {
        self.config.fail_if_no_pacts_found
    }

    pub fn set_fail_if_no_pacts_found(&mut self, fail: bool) {
        self.config.fail_if_no_pacts_found = fail;
    }

    /// Explicit resolver if one was set, else the configured one by name.
    fn with_resolver<T>(&self, f: impl FnOnce(&dyn ValueResolver) -> T) -> T {
        match &self.value_resolver {
            Some(resolver) => f(resolver.as_ref()),
            None => {
                let resolver = resolver_or_default(self.config.value_resolver.as_deref());
                f(resolver.as_ref())
            }
        }
    }

    /// Concrete tags to query; `None` is the untagged pass.
    fn effective_tags(&self, resolver: &dyn ValueResolver) -> Vec<Option<String>> {
        if self.config.tags.is_empty() {
            return vec![None];
        }
        self.config
            .tags
            .iter()
            .flat_map(|expr| parse_list_expression(expr, resolver))
            .map(Some)
            .collect()
    }

    /// Run the pipeline for every tag, returning the pacts in processing
    /// order together with the registry entries they produced.
    pub fn resolve_pacts(
        &self,
        provider: &ProviderName,
        resolver: &dyn ValueResolver,
    ) -> Result<(Vec<PactDocument>, PactRegistry), LoadError> {
        let mut registry = PactRegistry::new();
        let pacts = self.collect_pacts(provider, resolver, &mut registry)?;
        Ok((pacts, registry))
    }

    /// Every pact is recorded in `registry` as soon as it is downloaded, so
    /// on error `registry` still holds what earlier tags and consumers loaded.
    fn collect_pacts(
        &self,
        provider: &ProviderName,
        resolver: &dyn ValueResolver,
        registry: &mut PactRegistry,
    ) -> Result<Vec<PactDocument>, LoadError> {
        let tolerate_empty_tags = !self.config.tags.is_empty();
        let mut pacts = Vec::new();

        for tag in self.effective_tags(resolver) {
            match self.load_for_tag(provider, tag.as_deref(), resolver, registry, &mut pacts) {
                Ok(()) => {}
                Err(e @ LoadError::NoPactsFound { .. }) if tolerate_empty_tags => {
                    tracing::warn!("{e}; continuing with remaining tags");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            "loaded {} pact(s) for provider '{provider}' from {} consumer(s)",
            pacts.len(),
            registry.len()
        );
        Ok(pacts)
    }

    fn load_for_tag(
        &self,
        provider: &ProviderName,
        tag: Option<&str>,
        resolver: &dyn ValueResolver,
        registry: &mut PactRegistry,
        pacts: &mut Vec<PactDocument>,
    ) -> Result<(), LoadError> {
        tracing::debug!(
            "Loading pacts from pact broker for provider {provider} and tag {}",
            tag.unwrap_or(LATEST)
        );
        let endpoint = BrokerEndpoint::resolve(
            &self.config.scheme,
            &self.config.host,
            &self.config.port,
            resolver,
        )?;
        let client = BrokerClient::build(
            endpoint.url()?,
            self.config.authentication.as_ref(),
            resolver,
            self.transport.clone(),
        )?;

        let consumers = fetch_consumers(&client, provider, tag)?;
        if self.config.fail_if_no_pacts_found && consumers.is_empty() {
            return Err(LoadError::NoPactsFound {
                provider: provider.clone(),
                tag: tag.unwrap_or(LATEST).to_string(),
                url: display_url_for_provider(&client, provider, tag),
            });
        }

        for consumer in filter_consumers(consumers, &self.config.consumers, resolver) {
            let pact = client.load_pact(&consumer.pact_href, &consumer.credentials)?;
            registry.record(consumer.name, pact.clone());
            pacts.push(pact);
        }
        Ok(())
    }
}

impl PactLoader for PactBrokerLoader {
    fn description(&self) -> String {
        self.with_resolver(|resolver| {
            let scheme = parse_expression(&self.config.scheme, resolver);
            let host = parse_expression(&self.config.host, resolver);
            let port = parse_expression(&self.config.port, resolver);
            if port.is_empty() {
                format!("Pact Broker({scheme}://{host})")
            } else {
                format!("Pact Broker({scheme}://{host}:{port})")
            }
        })
    }

    /// Pacts downloaded before a failure stay in [`PactLoader::pact_source`].
    fn load(&mut self, provider: &ProviderName) -> Result<Vec<PactDocument>, LoadError> {
        let mut registry = PactRegistry::new();
        let result =
            self.with_resolver(|resolver| self.collect_pacts(provider, resolver, &mut registry));
        if let PactSource::Broker { pacts: source, .. } = &mut self.pact_source {
            source.merge(registry);
        }
        result
    }

    fn pact_source(&self) -> &PactSource {
        &self.pact_source
    }

    fn set_value_resolver(&mut self, resolver: Box<dyn ValueResolver>) {
        self.value_resolver = Some(resolver);
    }
}

impl std::fmt::Debug for PactBrokerLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PactBrokerLoader")
            .field("config", &self.config)
            .field("explicit_resolver", &self.value_resolver.is_some())
            .finish_non_exhaustive()
    }
}
