//! Wiring: configuration, session storage, store and mailer for one run.

use anyhow::Context;
use sd_api_client::{
    ApiClient, ClientConfig, EmailJsMailer, FileStore, KeyValueStore, LogMailer, LogRedirect,
    MailerConfig, NotificationMailer, RememberMe, VaultConfig,
};
use sd_store::{Store, StoreContext, StoreHandle};
use shared_bus::InMemoryEventBus;
use std::sync::Arc;
use tracing::debug;

use crate::cli::GlobalArgs;

/// Everything a command needs.
pub struct Console {
    pub store: StoreHandle,
    pub api: Arc<ApiClient>,
    pub mailer: Arc<dyn NotificationMailer>,
    pub json: bool,
}

impl Console {
    /// Build from environment defaults with the command-line flags on top.
    pub fn connect(global: &GlobalArgs) -> anyhow::Result<Self> {
        let mut config = ClientConfig::from_env()?;
        if let Some(base_url) = &global.base_url {
            config.base_url = base_url.clone();
        }
        config.validate()?;

        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::in_dir(&global.data_dir));
        let vault = RememberMe::new(Arc::clone(&storage), &VaultConfig::from_env())
            .context("remember-me vault")?;

        let mailer_config = MailerConfig::from_env();
        let mailer: Arc<dyn NotificationMailer> = if mailer_config.is_configured() {
            Arc::new(EmailJsMailer::new(mailer_config)?)
        } else {
            debug!("EmailJS not configured, notifications will only be logged");
            Arc::new(LogMailer)
        };

        Self::assemble(config, storage, mailer, Some(vault), global.json)
    }

    /// Build from explicit parts.
    pub fn assemble(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStore>,
        mailer: Arc<dyn NotificationMailer>,
        vault: Option<RememberMe>,
        json: bool,
    ) -> anyhow::Result<Self> {
        let bus = Arc::new(InMemoryEventBus::new());
        let api = Arc::new(
            ApiClient::new(&config, storage)?
                .with_redirect(Arc::new(LogRedirect))
                .with_events(bus.clone()),
        );

        let mut context = StoreContext::new(Arc::clone(&api));
        if let Some(vault) = vault {
            context = context.with_remember_me(vault);
        }
        let store = Store::spawn(context, bus);

        Ok(Self {
            store,
            api,
            mailer,
            json,
        })
    }
}
