use crate::{Client, ConfigurationError, Result, Transport};
use graphql_util_config::{GraphQLUtilConfig, TargetConfig};
use std::collections::btree_map::{BTreeMap, Entry};

/// Configured clients keyed by target name.
///
/// Each target can be configured once; a second attempt is rejected before any
/// file or network access and leaves the existing client in place.
#[derive(Debug, Default)]
pub struct Targets {
    clients: BTreeMap<String, Client>,
}

impl Targets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures every target of a loaded configuration over HTTP.
    #[tracing::instrument(skip(config), fields(targets = config.target_count()))]
    pub fn from_config(config: &GraphQLUtilConfig) -> Result<Self> {
        let mut targets = Self::new();
        for (name, target) in config.targets() {
            targets.configure(name, target)?;
        }
        Ok(targets)
    }

    /// Configures target `name` over HTTP.
    pub fn configure(&mut self, name: impl Into<String>, config: &TargetConfig) -> Result<&Client> {
        self.insert_with(name.into(), || Client::configure(config))
    }

    /// Configures target `name` with a custom transport.
    pub fn configure_with_transport(
        &mut self,
        name: impl Into<String>,
        config: &TargetConfig,
        transport: impl Transport + 'static,
    ) -> Result<&Client> {
        self.insert_with(name.into(), || {
            Client::configure_with_transport(config, transport)
        })
    }

    fn insert_with(&mut self, name: String, build: impl FnOnce() -> Result<Client>) -> Result<&Client> {
        match self.clients.entry(name) {
            Entry::Occupied(entry) => {
                tracing::warn!(name = %entry.key(), "Target already configured");
                Err(ConfigurationError::AlreadyConfigured {
                    target: entry.key().clone(),
                }
                .into())
            }
            Entry::Vacant(entry) => {
                tracing::info!(name = %entry.key(), "Configuring target");
                let client = build()?;
                Ok(entry.insert(client))
            }
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Client> {
        self.clients.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clients.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
